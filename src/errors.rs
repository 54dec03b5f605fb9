use thiserror::Error;

/// Errors raised by a [`crate::sheets::SheetSource`] implementation.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Transport failure talking to the spreadsheet service.
    #[error("http error: {0}")]
    Http(String),

    /// The service answered with a non-success status code.
    #[error("spreadsheet service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Response payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Worksheet is missing from the spreadsheet.
    #[error("worksheet not found: {0}")]
    NotFound(String),

    /// No usable credentials, or the credentials were rejected.
    #[error("authentication failed: {0}")]
    Auth(String),
}

/// Errors raised by the pricing engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    /// A standard margin of -100% leaves no cost basis to strip the margin from.
    #[error("standard margin of {0}% cannot be stripped from the base price")]
    DegenerateMargin(f64),

    /// Quantities start at one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}

/// Errors surfaced by the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Wrapper around spreadsheet collaborator failures.
    #[error("upstream error: {0}")]
    Upstream(#[from] SheetError),

    /// Wrapper around pricing failures.
    #[error("pricing error: {0}")]
    Pricing(#[from] PricingError),
}
