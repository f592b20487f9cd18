use std::{fmt::Display, io};

#[derive(Debug)]
pub enum Error {
    ConsumerNotFound(String),
    UnexpectedStatus(u16),
    ReqwestError(reqwest::Error),
    IoError(io::Error),
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::ReqwestError(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IoError(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ConsumerNotFound(consumer) => {
                write!(f, "Consumer \"{}\" not found", consumer)
            }
            Error::UnexpectedStatus(status) => {
                write!(f, "The chat template API returned status {}", status)
            }
            Error::ReqwestError(e) => write!(f, "{}", e.to_string()),
            Error::IoError(e) => write!(f, "{}", e.to_string()),
        }
    }
}
