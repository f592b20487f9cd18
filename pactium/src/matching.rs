use crate::{data::RequestData, interaction::RequestPattern, matcher::Matcher};
use serde_json::Value;
use std::collections::HashMap;

/// Evaluates whether a realized request satisfies a declared request
/// pattern. Query parameters and headers use subset semantics: everything
/// the pattern names must be present and satisfied, anything extra on the
/// actual request is tolerated.
pub fn request_matches(pattern: &RequestPattern, request: &RequestData) -> bool {
    if !pattern.method.eq_ignore_ascii_case(&request.method) {
        return false;
    }

    if !pattern.path.evaluate(&Value::String(request.path.clone())) {
        return false;
    }

    if !subset_matches(&pattern.query, &request.query, false) {
        return false;
    }

    // header names are compared case-insensitively
    if !subset_matches(&pattern.headers, &request.headers, true) {
        return false;
    }

    match &pattern.body {
        Some(body_matcher) => body_matcher.evaluate(&parse_body(&request.body)),
        None => true,
    }
}

fn subset_matches(
    expected: &HashMap<String, Matcher>,
    actual: &HashMap<String, String>,
    case_insensitive_keys: bool,
) -> bool {
    expected.iter().all(|(name, matcher)| {
        let value = if case_insensitive_keys {
            actual
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        } else {
            actual.get(name)
        };

        match value {
            Some(value) => matcher.evaluate(&Value::String(value.clone())),
            None => false,
        }
    })
}

/// Request bodies are matched structurally when they parse as JSON;
/// anything else is matched as a plain string value.
fn parse_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.into()))
}

/// Splits a raw query string into a map, percent-decoding keys and values.
/// Later duplicates overwrite earlier ones.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        })
        .map(|(key, value)| {
            (
                urlencoding::decode(key).map(|k| k.into_owned()).unwrap_or_else(|_| key.into()),
                urlencoding::decode(value).map(|v| v.into_owned()).unwrap_or_else(|_| value.into()),
            )
        })
        .collect()
}
