use crate::{
    data::ResponseData,
    error::Error,
    matcher::Matcher,
    registry::InteractionRegistry,
};
use std::{collections::HashMap, sync::Arc};

/// The declared shape an incoming request has to satisfy.
#[derive(Debug, Clone)]
pub struct RequestPattern {
    pub method: String,
    pub path: Matcher,
    pub query: HashMap<String, Matcher>,
    pub headers: HashMap<String, Matcher>,
    pub body: Option<Matcher>,
}

/// The response served for a matched interaction. The body is kept as a
/// matcher tree and unwrapped to a concrete value when serving.
#[derive(Debug, Clone)]
pub struct ResponseTemplate {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Option<Matcher>,
}

impl ResponseTemplate {
    /// Produces the concrete response served to the client under test.
    pub fn unwrap_concrete(&self) -> ResponseData {
        let body = match &self.body {
            Some(matcher) => matcher.unwrap_example().to_string(),
            None => String::new(),
        };

        ResponseData {
            status_code: self.status,
            headers: self.headers.clone(),
            body,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InteractionStatus {
    Declared,
    Matched,
    Unmatched,
}

/// One declared provider-state + request-pattern + response-template triple.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub(crate) provider_state: String,
    pub(crate) description: String,
    pub(crate) request: RequestPattern,
    pub(crate) response: ResponseTemplate,
    pub(crate) status: InteractionStatus,
}

impl Interaction {
    pub fn provider_state(&self) -> &str {
        &self.provider_state
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn request(&self) -> &RequestPattern {
        &self.request
    }

    pub fn response(&self) -> &ResponseTemplate {
        &self.response
    }

    pub fn status(&self) -> InteractionStatus {
        self.status
    }

    /// "provider state / description", the identity used in diagnostics.
    pub fn identity(&self) -> String {
        format!("{} / {}", self.provider_state, self.description)
    }
}

/// Immutable fluent builder for the request half of an interaction. Every
/// step consumes the builder; a finished `Interaction` only exists once the
/// terminal `register` call on the response half succeeds.
#[derive(Debug)]
pub struct InteractionBuilder {
    registry: Arc<InteractionRegistry>,
    provider_state: String,
    description: String,
    method: String,
    path: Matcher,
    query: HashMap<String, Matcher>,
    headers: HashMap<String, Matcher>,
    body: Option<Matcher>,
}

impl InteractionBuilder {
    pub(crate) fn new<S: Into<String>>(
        registry: Arc<InteractionRegistry>,
        provider_state: S,
    ) -> Self {
        Self {
            registry,
            provider_state: provider_state.into(),
            description: String::new(),
            method: String::from("GET"),
            path: Matcher::from("/"),
            query: HashMap::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn upon_receiving<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_request<S: Into<String>, M: Into<Matcher>>(mut self, method: S, path: M) -> Self {
        self.method = method.into();
        self.path = path.into();
        self
    }

    pub fn with_query<S: Into<String>, M: Into<Matcher>>(mut self, name: S, matcher: M) -> Self {
        self.query.insert(name.into(), matcher.into());
        self
    }

    pub fn with_header<S: Into<String>, M: Into<Matcher>>(mut self, name: S, matcher: M) -> Self {
        self.headers.insert(name.into(), matcher.into());
        self
    }

    pub fn with_body<M: Into<Matcher>>(mut self, body: M) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn will_respond_with(self, status: u16) -> ResponseBuilder {
        ResponseBuilder {
            request: self,
            status,
            headers: HashMap::new(),
            body: None,
        }
    }
}

/// The response half of the fluent builder.
#[derive(Debug)]
pub struct ResponseBuilder {
    request: InteractionBuilder,
    status: u16,
    headers: HashMap<String, String>,
    body: Option<Matcher>,
}

impl ResponseBuilder {
    pub fn with_response_header<S1: Into<String>, S2: Into<String>>(
        mut self,
        name: S1,
        value: S2,
    ) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_response_body<M: Into<Matcher>>(mut self, body: M) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Finishes the interaction and appends it to the session registry.
    /// Fails with `DuplicateInteraction` if the (provider state, description)
    /// pair is already registered.
    pub fn register(self) -> Result<(), Error> {
        let ResponseBuilder {
            request,
            status,
            headers,
            body,
        } = self;

        let interaction = Interaction {
            provider_state: request.provider_state,
            description: request.description,
            request: RequestPattern {
                method: request.method,
                path: request.path,
                query: request.query,
                headers: request.headers,
                body: request.body,
            },
            response: ResponseTemplate {
                status,
                headers,
                body,
            },
            status: InteractionStatus::Declared,
        };

        request.registry.register(interaction)
    }
}
