// Entity Models - Book and Patron
//
// Each entity has:
// - Stable identity (UUID newtype) that NEVER changes
// - Entity-local invariants enforced by its own methods
// - A flat snapshot (`info()`) for read-only consumers
//
// Cross-entity rules live in the catalog service, not here.

pub mod book;
pub mod id;
pub mod patron;

pub use book::{Book, BookInfo, BookPatch, Loan};
pub use id::{BookId, PatronId};
pub use patron::{Patron, PatronCategory, PatronInfo};
