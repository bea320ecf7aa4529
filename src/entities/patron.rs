// 🙋 Patron Entity - Stable identity with loan bookkeeping
//
// "Email is unique, UUID is IDENTITY, the borrowed set is STATE"
//
// The borrowed set mirrors the Book side of every loan. It never holds the
// same book twice. The loan limit itself is enforced by the catalog before
// record_loan is called.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::id::{BookId, PatronId};
use crate::config::LoanPolicy;
use crate::error::{CatalogError, Result};

// ============================================================================
// PATRON CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatronCategory {
    /// Students (smallest loan allowance)
    #[default]
    Student,

    /// Teaching faculty
    Faculty,

    /// Library and administrative staff
    Staff,
}

impl PatronCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatronCategory::Student => "student",
            PatronCategory::Faculty => "faculty",
            PatronCategory::Staff => "staff",
        }
    }

    /// Maximum number of books this category may hold at once
    pub fn loan_limit(&self) -> usize {
        match self {
            PatronCategory::Student => LoanPolicy::STUDENT_LIMIT,
            PatronCategory::Faculty => LoanPolicy::FACULTY_LIMIT,
            PatronCategory::Staff => LoanPolicy::STAFF_LIMIT,
        }
    }
}

impl fmt::Display for PatronCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatronCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(PatronCategory::Student),
            "faculty" => Ok(PatronCategory::Faculty),
            "staff" => Ok(PatronCategory::Staff),
            _ => Err(CatalogError::UnknownPatronCategory(s.to_string())),
        }
    }
}

// ============================================================================
// PATRON SNAPSHOT
// ============================================================================

/// Flat, read-only snapshot of a patron for reports and presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatronInfo {
    pub id: PatronId,
    pub name: String,
    pub email: String,
    pub category: PatronCategory,
    pub borrowed_books: Vec<BookId>,
    pub registered_at: DateTime<Utc>,
    pub active: bool,
}

// ============================================================================
// PATRON ENTITY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patron {
    id: PatronId,
    name: String,
    email: String,
    category: PatronCategory,
    registered_at: DateTime<Utc>,
    active: bool,

    /// Books currently held, no duplicates
    borrowed_books: Vec<BookId>,
}

impl Patron {
    /// Create a new active patron with no loans
    pub fn new(name: String, email: String, category: PatronCategory) -> Self {
        Patron {
            id: PatronId::new(),
            name,
            email,
            category,
            registered_at: Utc::now(),
            active: true,
            borrowed_books: Vec::new(),
        }
    }

    pub fn id(&self) -> PatronId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn category(&self) -> PatronCategory {
        self.category
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn borrowed_books(&self) -> &[BookId] {
        &self.borrowed_books
    }

    pub fn loan_count(&self) -> usize {
        self.borrowed_books.len()
    }

    pub fn has_loan(&self, book_id: BookId) -> bool {
        self.borrowed_books.contains(&book_id)
    }

    /// Add a book to the borrowed set (limit is checked by the caller)
    pub fn record_loan(&mut self, book_id: BookId) -> Result<()> {
        if self.has_loan(book_id) {
            return Err(CatalogError::DuplicateLoan {
                patron_id: self.id,
                book_id,
            });
        }
        self.borrowed_books.push(book_id);
        Ok(())
    }

    /// Remove a book from the borrowed set
    pub fn record_return(&mut self, book_id: BookId) -> Result<()> {
        let position = self
            .borrowed_books
            .iter()
            .position(|id| *id == book_id)
            .ok_or(CatalogError::LoanNotFound {
                patron_id: self.id,
                book_id,
            })?;
        self.borrowed_books.remove(position);
        Ok(())
    }

    /// True while the borrowed count is below the category limit
    pub fn can_borrow_more(&self) -> bool {
        self.loan_count() < self.category.loan_limit()
    }

    /// Existing loans are unaffected
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Read-only snapshot
    pub fn info(&self) -> PatronInfo {
        PatronInfo {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            category: self.category,
            borrowed_books: self.borrowed_books.clone(),
            registered_at: self.registered_at,
            active: self.active,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
