mod chat_template_client;
mod error;

pub mod data;

pub use chat_template_client::{ChatTemplateClient, ChatTemplateClientBuilder};
pub use error::Error;
