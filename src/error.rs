//! Error types for the library catalog.
//!
//! Every failure the lending core can report is a variant of [`CatalogError`].
//! Errors are synchronous and never leave a partially applied mutation behind.

use thiserror::Error;

use crate::entities::{BookId, PatronId};

/// Main error type for catalog operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    // Registration collisions
    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("ISBN already registered: {isbn}")]
    DuplicateIsbn { isbn: String },

    // Lookups
    #[error("Patron not found: {0}")]
    PatronNotFound(PatronId),

    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    // Loan eligibility
    #[error("Patron {0} is inactive")]
    InactivePatron(PatronId),

    #[error("Patron {patron_id} has reached the loan limit of {limit}")]
    LoanLimitReached { patron_id: PatronId, limit: usize },

    // Book state machine
    #[error("Book {0} is already borrowed")]
    AlreadyBorrowed(BookId),

    #[error("Book {0} is not borrowed")]
    NotBorrowed(BookId),

    // Patron loan bookkeeping
    #[error("Patron {patron_id} already holds book {book_id}")]
    DuplicateLoan { patron_id: PatronId, book_id: BookId },

    #[error("Patron {patron_id} does not hold book {book_id}")]
    LoanNotFound { patron_id: PatronId, book_id: BookId },

    // Configuration defects
    #[error("Unknown patron category: {0}")]
    UnknownPatronCategory(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Stable error code for presentation layers.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::DuplicateEmail { .. } => "duplicate_email",
            CatalogError::DuplicateIsbn { .. } => "duplicate_isbn",
            CatalogError::PatronNotFound(_) => "patron_not_found",
            CatalogError::BookNotFound(_) => "book_not_found",
            CatalogError::InactivePatron(_) => "inactive_patron",
            CatalogError::LoanLimitReached { .. } => "loan_limit_reached",
            CatalogError::AlreadyBorrowed(_) => "already_borrowed",
            CatalogError::NotBorrowed(_) => "not_borrowed",
            CatalogError::DuplicateLoan { .. } => "duplicate_loan",
            CatalogError::LoanNotFound { .. } => "loan_not_found",
            CatalogError::UnknownPatronCategory(_) => "unknown_patron_category",
            CatalogError::InvalidId(_) => "invalid_id",
            CatalogError::Config(_) => "config",
        }
    }

    /// Configuration defects are programmer errors, not business outcomes.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CatalogError::UnknownPatronCategory(_) | CatalogError::Config(_)
        )
    }
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
