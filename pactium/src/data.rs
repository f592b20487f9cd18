use std::collections::HashMap;

/// A request as it actually arrived on the wire, reduced to the parts the
/// matching engine inspects.
#[derive(Debug, Clone)]
pub struct RequestData {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// A concrete response produced by unwrapping a response template.
#[derive(Debug, Clone)]
pub struct ResponseData {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}
