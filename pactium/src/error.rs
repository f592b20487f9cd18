use hyper::http;
use std::{fmt::Display, io, path::PathBuf, sync};

#[derive(Debug)]
pub enum Error {
    BindError(io::Error),
    DuplicateInteraction {
        provider_state: String,
        description: String,
    },
    IncompleteInteractions(Vec<String>),
    MalformedContract {
        path: PathBuf,
        detail: String,
    },
    InvalidTermExample {
        pattern: String,
        example: String,
    },
    InvalidTermPattern(regex::Error),
    IoError(io::Error),
    JsonError(serde_json::Error),
    PoisonedLock,
    InvalidHeaderName,
    InvalidHeaderValue,
    HyperError(hyper::Error),
    HttpError(http::Error),
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::BindError(e) => write!(f, "Couldn't bind the mock server socket: {}", e),
            Error::DuplicateInteraction {
                provider_state,
                description,
            } => write!(
                f,
                "An interaction with provider state \"{}\" and description \"{}\" is already registered",
                provider_state, description
            ),
            Error::IncompleteInteractions(unmatched) => write!(
                f,
                "The following interactions were registered but never matched: {}",
                unmatched.join(", ")
            ),
            Error::MalformedContract { path, detail } => write!(
                f,
                "The contract document {} is malformed: {}",
                path.display(),
                detail
            ),
            Error::InvalidTermExample { pattern, example } => write!(
                f,
                "The term example \"{}\" doesn't match its own pattern \"{}\"",
                example, pattern
            ),
            Error::InvalidTermPattern(e) => write!(f, "Invalid term pattern: {}", e),
            Error::IoError(e) => write!(f, "IoError: {}", e),
            Error::JsonError(e) => write!(f, "Json error: {}", e),
            Error::PoisonedLock => write!(f, "The lock was poisoned"),
            Error::InvalidHeaderName => write!(f, "Invalid header name"),
            Error::InvalidHeaderValue => write!(f, "Invalid header value"),
            Error::HyperError(e) => write!(f, "Hyper error: {}", e),
            Error::HttpError(e) => write!(f, "Http Error: {}", e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IoError(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::JsonError(e)
    }
}

impl<T> From<sync::PoisonError<T>> for Error {
    fn from(_: sync::PoisonError<T>) -> Self {
        Error::PoisonedLock
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Error::InvalidTermPattern(e)
    }
}

impl From<hyper::header::InvalidHeaderName> for Error {
    fn from(_: hyper::header::InvalidHeaderName) -> Self {
        Error::InvalidHeaderName
    }
}

impl From<hyper::header::InvalidHeaderValue> for Error {
    fn from(_: hyper::header::InvalidHeaderValue) -> Self {
        Error::InvalidHeaderValue
    }
}

impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Self {
        Error::HyperError(e)
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Error::HttpError(e)
    }
}
