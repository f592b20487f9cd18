use crate::data::chat_template::ChatTemplateResponse;
use crate::error::Error;
use reqwest::{self};
type ReqwestClient = reqwest::blocking::Client;

const DEFAULT_DOMAIN_NAME: &str = "http://localhost:8080";

/// Consumer values the toolbar accepts; everything else is rejected before
/// it ever reaches the producer.
pub const ALLOWED_CONSUMERS: [&str; 3] = ["fullserve", "veripark", "salesforce"];

/// Builder used to build a ChatTemplateClient instance
#[derive(Debug, Clone, Default)]
pub struct ChatTemplateClientBuilder {
    domain_name: Option<String>,
    http_client: Option<ReqwestClient>,
}

impl ChatTemplateClientBuilder {
    /// Create a new ChatTemplateClientBuilder instance.
    pub fn new() -> Self {
        Self {
            domain_name: None,
            http_client: None,
        }
    }

    /// Use the given domain_name when building a ChatTemplateClient instance.
    ///
    /// # Arguments
    /// `domain_name` - a domain name to use when calling the API.
    ///
    /// # Returns
    /// This builder.
    pub fn with_domain_name<T: Into<String>>(mut self, domain_name: T) -> Self {
        self.domain_name = Some(domain_name.into());
        self
    }

    /// Use the given blocking reqwest client when building a ChatTemplateClient instance.
    ///
    /// # Arguments
    /// `client` - a pre-configured blocking reqwest client.
    ///
    /// # Returns
    /// This builder.
    pub fn with_http_client(mut self, client: ReqwestClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Consume the builder and create a ChatTemplateClient instance using all of the previously
    /// configured values or their defaults.
    ///
    /// # Returns
    /// A ChatTemplateClient instance.
    pub fn build(mut self) -> ChatTemplateClient {
        ChatTemplateClient {
            http: self.http_client.take().unwrap_or_default(),
            domain_name: self
                .domain_name
                .take()
                .unwrap_or_else(|| String::from(DEFAULT_DOMAIN_NAME)),
        }
    }
}

/// Struct that represents a client of the BCD chat template API.
#[derive(Default, Debug, Clone)]
pub struct ChatTemplateClient {
    http: ReqwestClient,
    domain_name: String,
}

impl ChatTemplateClient {
    /// Create a ChatTemplateClient with the default reqwest client.
    ///
    /// # Returns
    /// A ChatTemplateClient.
    pub fn new() -> Self {
        ChatTemplateClient {
            http: ReqwestClient::new(),
            domain_name: String::from(DEFAULT_DOMAIN_NAME),
        }
    }

    /// Gets the chat templates configured for the given consumer.
    ///
    /// # Arguments
    /// `consumer` - the consumer whose templates should be fetched, e.g. "fullserve".
    ///
    /// # Returns
    /// The chat template response, with one entry per configured template.
    pub fn get_chat_templates<T: AsRef<str>>(
        &self,
        consumer: T,
    ) -> Result<ChatTemplateResponse, Error> {
        let url = self.construct_chat_template_url(consumer.as_ref());

        let response = self
            .http
            .get(&url)
            .header("Content-Type", "application/json")
            .send()?;

        match response.status().as_u16() {
            200 => Ok(response.json()?),
            404 => Err(Error::ConsumerNotFound(consumer.as_ref().into())),
            status => Err(Error::UnexpectedStatus(status)),
        }
    }

    /// Whether the toolbar recognizes the given consumer value.
    pub fn is_allowed_consumer<T: AsRef<str>>(consumer: T) -> bool {
        ALLOWED_CONSUMERS.contains(&consumer.as_ref())
    }

    fn construct_chat_template_url(&self, consumer: &str) -> String {
        format!(
            "{}/actions/bcd/chat-template?consumer={}",
            self.domain_name, consumer
        )
    }
}
