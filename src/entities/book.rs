// 📕 Book Entity - Stable identity with a two-state lending lifecycle
//
// "The UUID is IDENTITY (never changes), the loan is STATE (comes and goes)"
//
// States:
// - Available: no loan recorded
// - Borrowed: exactly one loan (patron + timestamp) recorded
//
// The only legal transitions are lend (Available → Borrowed) and
// return (Borrowed → Available). A call in the wrong state fails and
// leaves the book untouched.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::id::{BookId, PatronId};
use crate::error::{CatalogError, Result};

// ============================================================================
// LOAN RECORD
// ============================================================================

/// Who holds the book and since when. Borrower and timestamp travel together,
/// so one can never be set without the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub patron_id: PatronId,
    pub borrowed_at: DateTime<Utc>,
}

// ============================================================================
// BOOK PATCH
// ============================================================================

/// Partial update of the descriptive attributes of a book.
///
/// `None` and empty strings leave the attribute unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl BookPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

// ============================================================================
// BOOK SNAPSHOT
// ============================================================================

/// Flat, read-only snapshot of a book for reports and presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInfo {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: Option<i32>,
    pub category: String,
    pub available: bool,
    pub borrowed_by: Option<PatronId>,
    pub borrowed_at: Option<DateTime<Utc>>,
    pub registered_at: DateTime<Utc>,
}

// ============================================================================
// BOOK ENTITY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    // ========================================================================
    // IDENTITY (never changes)
    // ========================================================================
    id: BookId,
    isbn: String,
    registered_at: DateTime<Utc>,

    // ========================================================================
    // VALUES (editable through update)
    // ========================================================================
    title: String,
    author: String,
    publication_year: Option<i32>,
    category: String,

    // ========================================================================
    // STATE (changes only through lend / return_loan)
    // ========================================================================
    loan: Option<Loan>,
}

impl Book {
    /// Create a new available book with a fresh UUID
    pub fn new(
        title: String,
        author: String,
        isbn: String,
        publication_year: Option<i32>,
        category: String,
    ) -> Self {
        Book {
            id: BookId::new(),
            isbn,
            registered_at: Utc::now(),
            title,
            author,
            publication_year,
            category,
            loan: None,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn publication_year(&self) -> Option<i32> {
        self.publication_year
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn loan(&self) -> Option<&Loan> {
        self.loan.as_ref()
    }

    /// True when no loan is recorded
    pub fn is_available(&self) -> bool {
        self.loan.is_none()
    }

    pub fn borrowed_by(&self) -> Option<PatronId> {
        self.loan.as_ref().map(|loan| loan.patron_id)
    }

    pub fn borrowed_at(&self) -> Option<DateTime<Utc>> {
        self.loan.as_ref().map(|loan| loan.borrowed_at)
    }

    /// Available → Borrowed
    pub fn lend(&mut self, patron_id: PatronId, at: DateTime<Utc>) -> Result<()> {
        if self.loan.is_some() {
            return Err(CatalogError::AlreadyBorrowed(self.id));
        }
        self.loan = Some(Loan {
            patron_id,
            borrowed_at: at,
        });
        Ok(())
    }

    /// Borrowed → Available, handing back the closed loan
    pub fn return_loan(&mut self) -> Result<Loan> {
        self.loan.take().ok_or(CatalogError::NotBorrowed(self.id))
    }

    /// Overdue iff strictly more than `threshold_days` have elapsed since the loan.
    /// A threshold too large to represent as a duration is never exceeded.
    pub fn is_overdue(&self, now: DateTime<Utc>, threshold_days: i64) -> bool {
        match (&self.loan, Duration::try_days(threshold_days)) {
            (Some(loan), Some(threshold)) => {
                now.signed_duration_since(loan.borrowed_at) > threshold
            }
            _ => false,
        }
    }

    /// Whole days elapsed since the loan started (None when available)
    pub fn days_borrowed(&self, now: DateTime<Utc>) -> Option<i64> {
        self.loan
            .as_ref()
            .map(|loan| now.signed_duration_since(loan.borrowed_at).num_days())
    }

    /// Apply the non-empty fields of a patch. Returns true if anything changed.
    pub fn update(&mut self, patch: &BookPatch) -> bool {
        let mut changed = false;

        if let Some(title) = patch.title.as_deref().filter(|t| !t.is_empty()) {
            self.title = title.to_string();
            changed = true;
        }
        if let Some(author) = patch.author.as_deref().filter(|a| !a.is_empty()) {
            self.author = author.to_string();
            changed = true;
        }
        if let Some(category) = patch.category.as_deref().filter(|c| !c.is_empty()) {
            self.category = category.to_string();
            changed = true;
        }

        changed
    }

    /// Case-insensitive substring match on title, author or category.
    /// `term_lower` must already be lowercased.
    pub fn matches(&self, term_lower: &str) -> bool {
        self.title.to_lowercase().contains(term_lower)
            || self.author.to_lowercase().contains(term_lower)
            || self.category.to_lowercase().contains(term_lower)
    }

    /// Read-only snapshot
    pub fn info(&self) -> BookInfo {
        BookInfo {
            id: self.id,
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: self.isbn.clone(),
            publication_year: self.publication_year,
            category: self.category.clone(),
            available: self.is_available(),
            borrowed_by: self.borrowed_by(),
            borrowed_at: self.borrowed_at(),
            registered_at: self.registered_at,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_book() -> Book {
        Book::new(
            "El Principito".to_string(),
            "Antoine de Saint-Exupéry".to_string(),
            "978-84-376-0494-7".to_string(),
            Some(1943),
            "Literatura Infantil".to_string(),
        )
    }

    #[test]
    fn test_book_creation() {
        let book = create_test_book();

        assert_eq!(book.title(), "El Principito");
        assert_eq!(book.author(), "Antoine de Saint-Exupéry");
        assert_eq!(book.isbn(), "978-84-376-0494-7");
        assert_eq!(book.publication_year(), Some(1943));
        assert_eq!(book.category(), "Literatura Infantil");
        assert!(book.is_available());
        assert!(book.borrowed_by().is_none());
        assert!(book.borrowed_at().is_none());
    }

    #[test]
    fn test_book_lend() {
        let mut book = create_test_book();
        let patron_id = PatronId::new();
        let at = Utc::now();

        book.lend(patron_id, at).unwrap();

        assert!(!book.is_available());
        assert_eq!(book.borrowed_by(), Some(patron_id));
        assert_eq!(book.borrowed_at(), Some(at));
    }

    #[test]
    fn test_book_lend_twice_fails_without_side_effects() {
        let mut book = create_test_book();
        let first = PatronId::new();
        let at = Utc::now();
        book.lend(first, at).unwrap();

        let result = book.lend(PatronId::new(), at + Duration::hours(1));

        assert_eq!(result, Err(CatalogError::AlreadyBorrowed(book.id())));
        assert_eq!(book.borrowed_by(), Some(first));
        assert_eq!(book.borrowed_at(), Some(at));
    }

    #[test]
    fn test_book_return() {
        let mut book = create_test_book();
        let patron_id = PatronId::new();
        book.lend(patron_id, Utc::now()).unwrap();

        let loan = book.return_loan().unwrap();

        assert_eq!(loan.patron_id, patron_id);
        assert!(book.is_available());
        assert!(book.borrowed_by().is_none());
        assert!(book.borrowed_at().is_none());
    }

    #[test]
    fn test_book_return_when_available_fails() {
        let mut book = create_test_book();

        let result = book.return_loan();

        assert_eq!(result, Err(CatalogError::NotBorrowed(book.id())));
        assert!(book.is_available());
    }

    #[test]
    fn test_available_book_is_never_overdue() {
        let book = create_test_book();
        let far_future = Utc::now() + Duration::days(365);
        assert!(!book.is_overdue(far_future, 15));
    }

    #[test]
    fn test_overdue_threshold_is_exclusive() {
        let mut book = create_test_book();
        let borrowed_at = Utc::now();
        book.lend(PatronId::new(), borrowed_at).unwrap();

        assert!(!book.is_overdue(borrowed_at + Duration::days(14), 15));
        assert!(!book.is_overdue(borrowed_at + Duration::days(15), 15));
        assert!(book.is_overdue(borrowed_at + Duration::days(15) + Duration::milliseconds(1), 15));
        assert!(book.is_overdue(borrowed_at + Duration::days(16), 15));
    }

    #[test]
    fn test_overdue_custom_threshold() {
        let mut book = create_test_book();
        let borrowed_at = Utc::now();
        book.lend(PatronId::new(), borrowed_at).unwrap();

        assert!(book.is_overdue(borrowed_at + Duration::days(8), 7));
        assert!(!book.is_overdue(borrowed_at + Duration::days(8), 30));
    }

    #[test]
    fn test_unrepresentable_threshold_is_never_overdue() {
        let mut book = create_test_book();
        let borrowed_at = Utc::now() - Duration::days(10_000);
        book.lend(PatronId::new(), borrowed_at).unwrap();

        assert!(!book.is_overdue(Utc::now(), i64::MAX));
        assert!(book.is_overdue(Utc::now(), 15));
    }

    #[test]
    fn test_days_borrowed() {
        let mut book = create_test_book();
        assert_eq!(book.days_borrowed(Utc::now()), None);

        let borrowed_at = Utc::now();
        book.lend(PatronId::new(), borrowed_at).unwrap();
        assert_eq!(book.days_borrowed(borrowed_at + Duration::hours(50)), Some(2));
    }

    #[test]
    fn test_book_update_partial() {
        let mut book = create_test_book();

        let changed = book.update(&BookPatch::default().category("Literatura Clásica"));

        assert!(changed);
        assert_eq!(book.category(), "Literatura Clásica");
        assert_eq!(book.title(), "El Principito");
        assert_eq!(book.author(), "Antoine de Saint-Exupéry");
    }

    #[test]
    fn test_book_update_ignores_empty_strings() {
        let mut book = create_test_book();

        let changed = book.update(&BookPatch::default().title("").author(""));

        assert!(!changed);
        assert_eq!(book.title(), "El Principito");
        assert_eq!(book.author(), "Antoine de Saint-Exupéry");
    }

    #[test]
    fn test_book_update_does_not_touch_loan() {
        let mut book = create_test_book();
        let patron_id = PatronId::new();
        book.lend(patron_id, Utc::now()).unwrap();

        book.update(&BookPatch::default().title("The Little Prince"));

        assert_eq!(book.title(), "The Little Prince");
        assert_eq!(book.borrowed_by(), Some(patron_id));
    }

    #[test]
    fn test_book_matches_is_case_insensitive() {
        let book = create_test_book();

        assert!(book.matches("principito"));
        assert!(book.matches("saint-exupéry"));
        assert!(book.matches("infantil"));
        assert!(!book.matches("978"));
    }

    #[test]
    fn test_book_info_snapshot() {
        let mut book = create_test_book();
        let patron_id = PatronId::new();
        let at = Utc::now();
        book.lend(patron_id, at).unwrap();

        let info = book.info();

        assert_eq!(info.id, book.id());
        assert_eq!(info.isbn, "978-84-376-0494-7");
        assert!(!info.available);
        assert_eq!(info.borrowed_by, Some(patron_id));
        assert_eq!(info.borrowed_at, Some(at));
        assert_eq!(info.registered_at, book.registered_at());
    }

    #[test]
    fn test_book_info_serializes_flat() {
        let book = create_test_book();
        let value = serde_json::to_value(book.info()).unwrap();

        assert_eq!(value["title"], "El Principito");
        assert_eq!(value["available"], true);
        assert!(value["borrowed_by"].is_null());
        assert!(value["borrowed_at"].is_null());
    }
}
