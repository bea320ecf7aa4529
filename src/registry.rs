// 📇 Registries - Insertion-ordered, key-unique entity stores
//
// Each registry keeps entities in registration order (so search results are
// stable) plus an id → position index for O(1) lookups. Entities are never
// removed, so positions never shift.

use std::collections::HashMap;
use std::hash::Hash;

use crate::entities::{Book, BookId, Patron, PatronId};

// ============================================================================
// ORDERED STORE
// ============================================================================

#[derive(Debug, Clone)]
struct OrderedStore<K, V> {
    items: Vec<V>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Copy, V> OrderedStore<K, V> {
    fn new() -> Self {
        OrderedStore {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns false (and stores nothing) if the key is already present
    fn insert(&mut self, key: K, value: V) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.items.len());
        self.items.push(value);
        true
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).and_then(|&pos| self.items.get(pos))
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.index.get(key) {
            Some(&pos) => self.items.get_mut(pos),
            None => None,
        }
    }

    fn iter(&self) -> std::slice::Iter<'_, V> {
        self.items.iter()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

// ============================================================================
// BOOK REGISTRY
// ============================================================================

#[derive(Debug, Clone)]
pub struct BookRegistry {
    books: OrderedStore<BookId, Book>,
}

impl BookRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        BookRegistry {
            books: OrderedStore::new(),
        }
    }

    /// Register a book. Returns false if its id is already taken.
    #[must_use]
    pub fn register(&mut self, book: Book) -> bool {
        self.books.insert(book.id(), book)
    }

    pub fn find_by_id(&self, id: BookId) -> Option<&Book> {
        self.books.get(&id)
    }

    pub fn find_by_id_mut(&mut self, id: BookId) -> Option<&mut Book> {
        self.books.get_mut(&id)
    }

    /// Exact, case-sensitive ISBN match
    pub fn find_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.isbn() == isbn)
    }

    /// All books in registration order
    pub fn all_books(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    pub fn count(&self) -> usize {
        self.books.len()
    }

    pub fn available_count(&self) -> usize {
        self.books.iter().filter(|book| book.is_available()).count()
    }
}

impl Default for BookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// PATRON REGISTRY
// ============================================================================

#[derive(Debug, Clone)]
pub struct PatronRegistry {
    patrons: OrderedStore<PatronId, Patron>,
}

impl PatronRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        PatronRegistry {
            patrons: OrderedStore::new(),
        }
    }

    /// Register a patron. Returns false if its id is already taken.
    #[must_use]
    pub fn register(&mut self, patron: Patron) -> bool {
        self.patrons.insert(patron.id(), patron)
    }

    pub fn find_by_id(&self, id: PatronId) -> Option<&Patron> {
        self.patrons.get(&id)
    }

    pub fn find_by_id_mut(&mut self, id: PatronId) -> Option<&mut Patron> {
        self.patrons.get_mut(&id)
    }

    /// Exact, case-sensitive email match
    pub fn find_by_email(&self, email: &str) -> Option<&Patron> {
        self.patrons.iter().find(|patron| patron.email() == email)
    }

    /// All patrons in registration order
    pub fn all_patrons(&self) -> impl Iterator<Item = &Patron> {
        self.patrons.iter()
    }

    pub fn count(&self) -> usize {
        self.patrons.len()
    }
}

impl Default for PatronRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
