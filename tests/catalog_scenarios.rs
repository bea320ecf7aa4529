//! End-to-end lending scenarios against the public catalog API.

use chrono::{Duration, Utc};
use library_catalog::{BookPatch, CatalogError, CatalogService, PatronCategory};

#[test]
fn lend_and_return_updates_available_count() {
    let mut catalog = CatalogService::new();
    let ana = catalog
        .register_patron("Ana", "ana@email.com", PatronCategory::Student)
        .unwrap()
        .id();
    let x = catalog
        .register_book("X", "Some Author", "111", None, None)
        .unwrap()
        .id();

    catalog.lend_book(ana, x).unwrap();
    assert_eq!(catalog.statistics().available_books, 0);
    assert_eq!(catalog.statistics().borrowed_books, 1);

    catalog.return_book(ana, x).unwrap();
    assert_eq!(catalog.statistics().available_books, 1);
    assert_eq!(catalog.statistics().borrowed_books, 0);
}

#[test]
fn student_cannot_exceed_three_loans() {
    let mut catalog = CatalogService::new();
    let student = catalog
        .register_patron("Ana", "ana@email.com", PatronCategory::Student)
        .unwrap()
        .id();
    let books: Vec<_> = ["1", "2", "3", "4"]
        .iter()
        .map(|isbn| catalog.register_book("Book", "Author", isbn, None, None).unwrap().id())
        .collect();

    for book_id in &books[..3] {
        catalog.lend_book(student, *book_id).unwrap();
    }
    assert!(!catalog.patron(student).unwrap().can_borrow_more());

    let result = catalog.lend_book(student, books[3]);
    assert!(matches!(result, Err(CatalogError::LoanLimitReached { limit: 3, .. })));
    assert!(catalog.book(books[3]).unwrap().is_available());
}

#[test]
fn faculty_and_staff_have_larger_allowances() {
    let mut catalog = CatalogService::new();
    let faculty = catalog
        .register_patron("Carlos", "carlos@email.com", PatronCategory::Faculty)
        .unwrap()
        .id();
    let staff = catalog
        .register_patron("Lucía", "lucia@email.com", PatronCategory::Staff)
        .unwrap()
        .id();
    let books: Vec<_> = (0..16)
        .map(|i| {
            catalog
                .register_book("Book", "Author", &format!("isbn-{i}"), None, None)
                .unwrap()
                .id()
        })
        .collect();

    let faculty_ok = books[..6]
        .iter()
        .filter(|id| catalog.lend_book(faculty, **id).is_ok())
        .count();
    let staff_ok = books[6..]
        .iter()
        .filter(|id| catalog.lend_book(staff, **id).is_ok())
        .count();

    assert_eq!(faculty_ok, 5);
    assert_eq!(staff_ok, 10);
}

#[test]
fn search_by_category_only() {
    let mut catalog = CatalogService::new();
    catalog
        .register_book("Dune", "Frank Herbert", "1", Some(1965), Some("Science Fiction"))
        .unwrap();
    let poetry = catalog
        .register_book("Leaves of Grass", "Walt Whitman", "2", Some(1855), Some("Poetry"))
        .unwrap()
        .id();

    let results = catalog.search_books("poet");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id(), poetry);
}

#[test]
fn duplicate_email_keeps_single_registration() {
    let mut catalog = CatalogService::new();
    catalog
        .register_patron("Ana", "ana@email.com", PatronCategory::Student)
        .unwrap();

    let result = catalog.register_patron("Ana Bis", "ana@email.com", PatronCategory::Faculty);

    assert!(matches!(result, Err(CatalogError::DuplicateEmail { .. })));
    assert_eq!(catalog.statistics().total_patrons, 1);
    assert_eq!(catalog.patrons().len(), 1);
}

#[test]
fn overdue_report_includes_borrower_snapshot() {
    let mut catalog = CatalogService::new();
    let ana = catalog
        .register_patron("Ana", "ana@email.com", PatronCategory::Student)
        .unwrap()
        .id();
    let book_id = catalog
        .register_book("X", "Y", "111", None, None)
        .unwrap()
        .id();
    let borrowed_at = Utc::now() - Duration::days(30);
    catalog.lend_book_at(ana, book_id, borrowed_at).unwrap();

    let overdue = catalog.overdue_loans(Utc::now());

    assert_eq!(overdue.len(), 1);
    let entry = &overdue[0];
    assert_eq!(entry.book.borrowed_at, Some(borrowed_at));
    let patron = entry.patron.as_ref().unwrap();
    assert_eq!(patron.email, "ana@email.com");
    assert_eq!(patron.borrowed_books, vec![book_id]);

    let json = serde_json::to_value(&overdue).unwrap();
    assert_eq!(json[0]["patron"]["category"], "student");
}

#[test]
fn failed_operations_do_not_count() {
    let mut catalog = CatalogService::new();
    let ana = catalog
        .register_patron("Ana", "ana@email.com", PatronCategory::Student)
        .unwrap()
        .id();
    let book_id = catalog
        .register_book("X", "Y", "111", None, None)
        .unwrap()
        .id();
    let before = catalog.statistics().operations;

    assert!(catalog.return_book(ana, book_id).is_err());
    assert!(catalog.register_book("X", "Y", "111", None, None).is_err());
    assert!(catalog.register_patron_named("B", "b@email.com", "alumni").is_err());

    assert_eq!(catalog.statistics().operations, before);
}

#[test]
fn updating_a_borrowed_book_keeps_the_loan() {
    let mut catalog = CatalogService::new();
    let ana = catalog
        .register_patron("Ana", "ana@email.com", PatronCategory::Student)
        .unwrap()
        .id();
    let book_id = catalog
        .register_book("X", "Y", "111", None, None)
        .unwrap()
        .id();
    catalog.lend_book(ana, book_id).unwrap();

    catalog
        .update_book(book_id, &BookPatch::default().title("X, Revised"))
        .unwrap();

    let info = catalog.book(book_id).unwrap().info();
    assert_eq!(info.title, "X, Revised");
    assert_eq!(info.borrowed_by, Some(ana));
    assert!(!info.available);
}
