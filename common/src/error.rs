//! Error types shared by the dashboard.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors raised while talking to the device service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// No access token has been issued yet
    #[error("not signed in")]
    Unauthenticated,

    /// The service rejected the access token
    #[error("access token rejected")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success response
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("invalid service URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Raised by the device table pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The column is declared sortable but the pipeline has no comparator for it.
    #[error("unsupported device sorting criteria: {0}")]
    UnsupportedSortColumn(String),
}

/// A device type tag outside the known set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown device type: {0}")]
pub struct UnknownDeviceType(pub String);

/// Per-field messages of a rejected device form.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("invalid device form: {}", .fields.keys().copied().collect::<Vec<_>>().join(", "))]
pub struct ValidationErrors {
    pub fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        // first failing rule wins
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
