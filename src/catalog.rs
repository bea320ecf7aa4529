// 🏛️ Catalog Service - Coordinates books and patrons
//
// Owns both registries and the operation counter. Enforces the cross-entity
// rules the entities cannot see on their own:
// - email / ISBN uniqueness
// - patron activity and loan limits
// - referential symmetry: book.borrowed_by == p  <=>  book ∈ patron(p).borrowed
//
// Lend and return validate every precondition on BOTH entities before
// mutating either one, so a failed operation never leaves half a loan behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::config::CatalogConfig;
use crate::entities::{
    Book, BookId, BookInfo, BookPatch, Patron, PatronCategory, PatronId, PatronInfo,
};
use crate::error::{CatalogError, Result};
use crate::registry::{BookRegistry, PatronRegistry};

// ============================================================================
// REPORT TYPES
// ============================================================================

/// Aggregate counters for the whole catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStatistics {
    pub total_patrons: usize,
    pub total_books: usize,
    pub available_books: usize,
    pub borrowed_books: usize,
    /// Successful registrations, loans, returns and updates so far
    pub operations: u64,
}

/// An overdue book together with its borrower, if the borrower still resolves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueLoan {
    pub book: BookInfo,
    pub patron: Option<PatronInfo>,
}

// ============================================================================
// CATALOG SERVICE
// ============================================================================

#[derive(Debug, Clone)]
pub struct CatalogService {
    config: CatalogConfig,
    books: BookRegistry,
    patrons: PatronRegistry,
    operations: u64,
}

/// Log a business-rule rejection and hand the error back
fn rejected(err: CatalogError) -> CatalogError {
    warn!(kind = err.kind(), "{}", err);
    err
}

impl CatalogService {
    /// Create an empty catalog with default configuration
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        CatalogService {
            config,
            books: BookRegistry::new(),
            patrons: PatronRegistry::new(),
            operations: 0,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    /// Register a patron. Email must be unique (exact match).
    pub fn register_patron(
        &mut self,
        name: &str,
        email: &str,
        category: PatronCategory,
    ) -> Result<&Patron> {
        if self.patrons.find_by_email(email).is_some() {
            return Err(rejected(CatalogError::DuplicateEmail {
                email: email.to_string(),
            }));
        }

        let patron = Patron::new(name.to_string(), email.to_string(), category);
        let id = patron.id();
        let inserted = self.patrons.register(patron);
        debug_assert!(inserted, "fresh patron id collided");
        self.operations += 1;

        debug!(patron_id = %id, category = %category, "Registered patron");
        self.patrons.find_by_id(id).ok_or(CatalogError::PatronNotFound(id))
    }

    /// Register a patron from a category name; unknown categories are refused
    /// before anything is stored.
    pub fn register_patron_named(
        &mut self,
        name: &str,
        email: &str,
        category: &str,
    ) -> Result<&Patron> {
        let category: PatronCategory = category.parse()?;
        self.register_patron(name, email, category)
    }

    /// Register a book. ISBN must be unique (exact match). A missing category
    /// falls back to the configured default.
    pub fn register_book(
        &mut self,
        title: &str,
        author: &str,
        isbn: &str,
        publication_year: Option<i32>,
        category: Option<&str>,
    ) -> Result<&Book> {
        if self.books.find_by_isbn(isbn).is_some() {
            return Err(rejected(CatalogError::DuplicateIsbn {
                isbn: isbn.to_string(),
            }));
        }

        let category = category
            .unwrap_or(&self.config.default_book_category)
            .to_string();
        let book = Book::new(
            title.to_string(),
            author.to_string(),
            isbn.to_string(),
            publication_year,
            category,
        );
        let id = book.id();
        let inserted = self.books.register(book);
        debug_assert!(inserted, "fresh book id collided");
        self.operations += 1;

        debug!(book_id = %id, isbn, "Registered book");
        self.books.find_by_id(id).ok_or(CatalogError::BookNotFound(id))
    }

    // ========================================================================
    // LENDING
    // ========================================================================

    /// Lend a book to a patron, stamped with the current time
    pub fn lend_book(&mut self, patron_id: PatronId, book_id: BookId) -> Result<()> {
        self.lend_book_at(patron_id, book_id, Utc::now())
    }

    /// Lend a book to a patron with an explicit loan timestamp
    pub fn lend_book_at(
        &mut self,
        patron_id: PatronId,
        book_id: BookId,
        at: DateTime<Utc>,
    ) -> Result<()> {
        // Validate everything up front; nothing below may fail afterwards.
        {
            let patron = self
                .patrons
                .find_by_id(patron_id)
                .ok_or_else(|| rejected(CatalogError::PatronNotFound(patron_id)))?;
            let book = self
                .books
                .find_by_id(book_id)
                .ok_or_else(|| rejected(CatalogError::BookNotFound(book_id)))?;

            if !patron.is_active() {
                return Err(rejected(CatalogError::InactivePatron(patron_id)));
            }
            if !patron.can_borrow_more() {
                return Err(rejected(CatalogError::LoanLimitReached {
                    patron_id,
                    limit: patron.category().loan_limit(),
                }));
            }
            if !book.is_available() {
                return Err(rejected(CatalogError::AlreadyBorrowed(book_id)));
            }
            if patron.has_loan(book_id) {
                return Err(rejected(CatalogError::DuplicateLoan { patron_id, book_id }));
            }
        }

        self.books
            .find_by_id_mut(book_id)
            .ok_or(CatalogError::BookNotFound(book_id))?
            .lend(patron_id, at)?;
        self.patrons
            .find_by_id_mut(patron_id)
            .ok_or(CatalogError::PatronNotFound(patron_id))?
            .record_loan(book_id)?;
        self.operations += 1;

        info!(%patron_id, %book_id, "Book lent");
        Ok(())
    }

    /// Return a borrowed book
    pub fn return_book(&mut self, patron_id: PatronId, book_id: BookId) -> Result<()> {
        {
            let patron = self
                .patrons
                .find_by_id(patron_id)
                .ok_or_else(|| rejected(CatalogError::PatronNotFound(patron_id)))?;
            let book = self
                .books
                .find_by_id(book_id)
                .ok_or_else(|| rejected(CatalogError::BookNotFound(book_id)))?;

            if book.is_available() {
                return Err(rejected(CatalogError::NotBorrowed(book_id)));
            }
            // Covers a book held by someone else as well, by symmetry
            if !patron.has_loan(book_id) || book.borrowed_by() != Some(patron_id) {
                return Err(rejected(CatalogError::LoanNotFound { patron_id, book_id }));
            }
        }

        self.books
            .find_by_id_mut(book_id)
            .ok_or(CatalogError::BookNotFound(book_id))?
            .return_loan()?;
        self.patrons
            .find_by_id_mut(patron_id)
            .ok_or(CatalogError::PatronNotFound(patron_id))?
            .record_return(book_id)?;
        self.operations += 1;

        info!(%patron_id, %book_id, "Book returned");
        Ok(())
    }

    // ========================================================================
    // MAINTENANCE
    // ========================================================================

    /// Apply a partial update to a book's descriptive attributes
    pub fn update_book(&mut self, book_id: BookId, patch: &BookPatch) -> Result<&Book> {
        let book = self
            .books
            .find_by_id_mut(book_id)
            .ok_or_else(|| rejected(CatalogError::BookNotFound(book_id)))?;

        if book.update(patch) {
            debug!(%book_id, "Updated book");
        }
        self.operations += 1;

        self.books
            .find_by_id(book_id)
            .ok_or(CatalogError::BookNotFound(book_id))
    }

    /// Block further loans for a patron; current loans stay in place
    pub fn deactivate_patron(&mut self, patron_id: PatronId) -> Result<()> {
        self.patrons
            .find_by_id_mut(patron_id)
            .ok_or_else(|| rejected(CatalogError::PatronNotFound(patron_id)))?
            .deactivate();
        self.operations += 1;

        debug!(%patron_id, "Deactivated patron");
        Ok(())
    }

    pub fn activate_patron(&mut self, patron_id: PatronId) -> Result<()> {
        self.patrons
            .find_by_id_mut(patron_id)
            .ok_or_else(|| rejected(CatalogError::PatronNotFound(patron_id)))?
            .activate();
        self.operations += 1;

        debug!(%patron_id, "Activated patron");
        Ok(())
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn book(&self, book_id: BookId) -> Option<&Book> {
        self.books.find_by_id(book_id)
    }

    pub fn patron(&self, patron_id: PatronId) -> Option<&Patron> {
        self.patrons.find_by_id(patron_id)
    }

    pub fn find_book_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.books.find_by_isbn(isbn)
    }

    pub fn find_patron_by_email(&self, email: &str) -> Option<&Patron> {
        self.patrons.find_by_email(email)
    }

    /// All books in registration order
    pub fn books(&self) -> Vec<&Book> {
        self.books.all_books().collect()
    }

    /// All patrons in registration order
    pub fn patrons(&self) -> Vec<&Patron> {
        self.patrons.all_patrons().collect()
    }

    /// Books currently held by a patron, in loan order
    pub fn loans_of(&self, patron_id: PatronId) -> Result<Vec<&Book>> {
        let patron = self
            .patrons
            .find_by_id(patron_id)
            .ok_or(CatalogError::PatronNotFound(patron_id))?;

        Ok(patron
            .borrowed_books()
            .iter()
            .filter_map(|id| self.books.find_by_id(*id))
            .collect())
    }

    /// Case-insensitive substring search over title, author and category,
    /// in registration order
    pub fn search_books(&self, term: &str) -> Vec<&Book> {
        let term_lower = term.to_lowercase();
        self.books
            .all_books()
            .filter(|book| book.matches(&term_lower))
            .collect()
    }

    pub fn statistics(&self) -> CatalogStatistics {
        let total_books = self.books.count();
        let available_books = self.books.available_count();

        CatalogStatistics {
            total_patrons: self.patrons.count(),
            total_books,
            available_books,
            borrowed_books: total_books - available_books,
            operations: self.operations,
        }
    }

    /// Overdue loans using the configured threshold
    pub fn overdue_loans(&self, now: DateTime<Utc>) -> Vec<OverdueLoan> {
        self.overdue_loans_with_threshold(now, self.config.overdue_threshold_days)
    }

    /// Overdue loans using an explicit threshold in days
    pub fn overdue_loans_with_threshold(
        &self,
        now: DateTime<Utc>,
        threshold_days: i64,
    ) -> Vec<OverdueLoan> {
        self.books
            .all_books()
            .filter(|book| book.is_overdue(now, threshold_days))
            .map(|book| OverdueLoan {
                book: book.info(),
                patron: book
                    .borrowed_by()
                    .and_then(|id| self.patrons.find_by_id(id))
                    .map(Patron::info),
            })
            .collect()
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SHARED CATALOG
// ============================================================================

/// Thread-safe handle: every operation runs under one lock, so the
/// check-then-mutate sequences of lend/return cannot interleave.
#[derive(Debug, Clone, Default)]
pub struct SharedCatalog {
    inner: Arc<Mutex<CatalogService>>,
}

impl SharedCatalog {
    pub fn new(catalog: CatalogService) -> Self {
        SharedCatalog {
            inner: Arc::new(Mutex::new(catalog)),
        }
    }

    /// Run `f` with exclusive access to the catalog
    pub fn with<R>(&self, f: impl FnOnce(&mut CatalogService) -> R) -> R {
        // Operations validate before mutating, so state is consistent even
        // if a previous holder panicked.
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    pub fn lend_book(&self, patron_id: PatronId, book_id: BookId) -> Result<()> {
        self.with(|catalog| catalog.lend_book(patron_id, book_id))
    }

    pub fn return_book(&self, patron_id: PatronId, book_id: BookId) -> Result<()> {
        self.with(|catalog| catalog.return_book(patron_id, book_id))
    }

    pub fn statistics(&self) -> CatalogStatistics {
        self.with(|catalog| catalog.statistics())
    }
}

// ============================================================================
// TESTS
// ============================================================================
