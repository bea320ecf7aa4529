// Library Catalog - Lending Core
// Books, patrons and the catalog service that coordinates loans between them.

pub mod catalog;
pub mod config;
pub mod entities;
pub mod error;
pub mod registry;

// Re-export commonly used types
pub use catalog::{CatalogService, CatalogStatistics, OverdueLoan, SharedCatalog};
pub use config::{CatalogConfig, LoanPolicy, DEFAULT_BOOK_CATEGORY, DEFAULT_OVERDUE_THRESHOLD_DAYS};
pub use entities::{
    Book, BookId, BookInfo, BookPatch, Loan, Patron, PatronCategory, PatronId, PatronInfo,
};
pub use error::{CatalogError, Result};
pub use registry::{BookRegistry, PatronRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
