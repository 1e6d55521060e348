use std::fmt;

use serde::Deserialize;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketId(String);

impl TicketId {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTicketId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status token forwarded verbatim; the server decides what is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusValue(String);

impl StatusValue {
    pub const CLOSED: &'static str = "Closed";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn closed() -> Self {
        Self::new(Self::CLOSED)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteContent(String);

impl NoteContent {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyNote);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerResponse {
    pub message: String,
}

/// Page an action was triggered from; refreshed after a confirmed success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewLocation {
    Dashboard,
    Ticket(TicketId),
}

impl ViewLocation {
    pub fn path(&self) -> String {
        match self {
            ViewLocation::Dashboard => "/dashboard".to_string(),
            ViewLocation::Ticket(id) => format!("/ticket/{id}"),
        }
    }
}
