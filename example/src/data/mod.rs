pub mod chat_template;
