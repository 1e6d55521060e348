use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// Input rejected before any request leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("ticket id is empty")]
    EmptyTicketId,
    #[error("note content is empty")]
    EmptyNote,
}

impl ValidationError {
    /// Notice shown to the technician.
    pub fn notice(&self) -> &'static str {
        match self {
            ValidationError::EmptyTicketId => "Ticket Number was NOT found. Try again.",
            ValidationError::EmptyNote => "Note content cannot be empty.",
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {path} failed: {detail}")]
    Network { path: String, detail: String },
    #[error("{path} responded with {status}{}", describe_server_message(.server_message))]
    Status {
        path: String,
        status: u16,
        server_message: Option<String>,
    },
    #[error("invalid response from {path}: {detail}")]
    Decode { path: String, detail: String },
    #[error("path segment '{segment}' cannot be addressed")]
    Unaddressable { segment: String },
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            TransportError::Status { server_message, .. } => server_message.as_deref(),
            _ => None,
        }
    }
}

fn describe_server_message(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {message}"),
        None => String::new(),
    }
}
