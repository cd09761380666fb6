use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use library_ils::db;
use library_ils::domain::{
    BookRepository, BorrowingFilter, BorrowingStatus, DomainError, LoanPolicy, MemberRepository,
};
use library_ils::infrastructure::{
    SeaOrmBookRepository, SeaOrmBorrowingRepository, SeaOrmMemberRepository,
};
use library_ils::models::{Book, BookInput, Member, MemberInput};
use library_ils::services::CirculationService;
use sea_orm::DatabaseConnection;

struct Fixture {
    books: Arc<dyn BookRepository>,
    members: Arc<dyn MemberRepository>,
    circulation: CirculationService,
}

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn fixture(policy: LoanPolicy) -> Fixture {
    let db = setup_test_db().await;
    let books: Arc<dyn BookRepository> = Arc::new(SeaOrmBookRepository::new(db.clone()));
    let members: Arc<dyn MemberRepository> = Arc::new(SeaOrmMemberRepository::new(db.clone()));
    let borrowings = Arc::new(SeaOrmBorrowingRepository::new(db));

    Fixture {
        books,
        members: members.clone(),
        circulation: CirculationService::new(borrowings, members, policy),
    }
}

async fn add_book(f: &Fixture, title: &str, isbn: &str, copies: i32) -> Book {
    f.books
        .create(BookInput {
            title: title.to_string(),
            author: "Test Author".to_string(),
            isbn: isbn.to_string(),
            publication_year: Some(2001),
            copies_total: copies,
            copies_available: None,
        })
        .await
        .expect("Failed to create book")
}

async fn add_member(f: &Fixture, name: &str) -> Member {
    f.members
        .create(MemberInput {
            name: name.to_string(),
            contact: format!("{}@example.org", name.to_lowercase()),
        })
        .await
        .expect("Failed to create member")
}

async fn available(f: &Fixture, book_id: i32) -> i32 {
    f.books
        .find_by_id(book_id)
        .await
        .expect("Failed to load book")
        .expect("Book missing")
        .copies_available
}

#[tokio::test]
async fn test_last_copy_scenario() {
    let f = fixture(LoanPolicy::default()).await;
    let book = add_book(&f, "Dune", "9780441013593", 1).await;
    let alice = add_member(&f, "Alice").await;
    let bob = add_member(&f, "Bob").await;

    assert_eq!(book.copies_available, 1);

    let loan = f.circulation.borrow(book.id, alice.id).await.unwrap();
    assert_eq!(loan.book_title, "Dune");
    assert_eq!(loan.member_name, "Alice");
    assert!(loan.due_date.is_none());
    assert!(loan.return_date.is_none());
    assert_eq!(available(&f, book.id).await, 0);

    let refused = f.circulation.borrow(book.id, bob.id).await;
    assert!(matches!(refused, Err(DomainError::Conflict(_))));
    assert_eq!(available(&f, book.id).await, 0);

    let returned = f.circulation.return_borrowing(loan.id).await.unwrap();
    assert!(returned.return_date.is_some());
    assert_eq!(returned.fine, 0.0);
    assert_eq!(available(&f, book.id).await, 1);
}

#[tokio::test]
async fn test_borrow_unknown_book_or_member() {
    let f = fixture(LoanPolicy::default()).await;
    let book = add_book(&f, "Foundation", "9780553293357", 2).await;
    let member = add_member(&f, "Carol").await;

    let err = f.circulation.borrow(999, member.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(ref what) if what == "book 999"));

    let err = f.circulation.borrow(book.id, 999).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(ref what) if what == "member 999"));

    let err = f.circulation.borrow(0, member.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    // No mutation on failure
    assert_eq!(available(&f, book.id).await, 2);
    let all = f
        .circulation
        .list(BorrowingFilter {
            status: BorrowingStatus::All,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_double_return_is_conflict() {
    let f = fixture(LoanPolicy::default()).await;
    let book = add_book(&f, "The Hobbit", "9780547928227", 2).await;
    let member = add_member(&f, "Dave").await;

    let loan = f.circulation.borrow(book.id, member.id).await.unwrap();
    f.circulation.return_borrowing(loan.id).await.unwrap();
    assert_eq!(available(&f, book.id).await, 2);

    let again = f.circulation.return_borrowing(loan.id).await;
    assert!(matches!(again, Err(DomainError::Conflict(_))));
    assert_eq!(available(&f, book.id).await, 2);

    let missing = f.circulation.return_borrowing(4242).await;
    assert!(matches!(missing, Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn test_fines_follow_whole_days_late() {
    let f = fixture(LoanPolicy::with_due_dates(14, 0.5)).await;
    let book = add_book(&f, "Dune", "9780441013593", 3).await;
    let member = add_member(&f, "Erin").await;
    let issued = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();

    // Returned on the due date
    let on_time = f
        .circulation
        .borrow_at(book.id, member.id, issued)
        .await
        .unwrap();
    assert_eq!(on_time.due_date.as_deref(), Some("2024-03-15T10:00:00Z"));
    let closed = f
        .circulation
        .return_borrowing_at(on_time.id, issued + Duration::days(14))
        .await
        .unwrap();
    assert_eq!(closed.fine, 0.0);

    // Returned early
    let early = f
        .circulation
        .borrow_at(book.id, member.id, issued)
        .await
        .unwrap();
    let closed = f
        .circulation
        .return_borrowing_at(early.id, issued + Duration::days(3))
        .await
        .unwrap();
    assert_eq!(closed.fine, 0.0);

    // Three whole days and a few hours late
    let late = f
        .circulation
        .borrow_at(book.id, member.id, issued)
        .await
        .unwrap();
    let closed = f
        .circulation
        .return_borrowing_at(late.id, issued + Duration::days(17) + Duration::hours(5))
        .await
        .unwrap();
    assert_eq!(closed.fine, 1.5);
    assert_eq!(available(&f, book.id).await, 3);
}

#[tokio::test]
async fn test_overdue_report() {
    let f = fixture(LoanPolicy::with_due_dates(7, 1.0)).await;
    let book = add_book(&f, "Foundation", "9780553293357", 3).await;
    let member = add_member(&f, "Frank").await;
    let now = Utc::now();

    let overdue = f
        .circulation
        .borrow_at(book.id, member.id, now - Duration::days(10))
        .await
        .unwrap();
    f.circulation
        .borrow_at(book.id, member.id, now - Duration::days(2))
        .await
        .unwrap();

    let report = f.circulation.overdue_report(now).await.unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].id, overdue.id);

    f.circulation
        .return_borrowing_at(overdue.id, now)
        .await
        .unwrap();
    assert!(f.circulation.overdue_report(now).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_overdue_report_empty_without_due_dates() {
    let f = fixture(LoanPolicy::default()).await;
    let book = add_book(&f, "Dune", "9780441013593", 1).await;
    let member = add_member(&f, "Grace").await;

    f.circulation
        .borrow_at(book.id, member.id, Utc::now() - Duration::days(365))
        .await
        .unwrap();

    assert!(f.circulation.overdue_report(Utc::now()).await.unwrap().is_empty());
    assert_eq!(f.circulation.borrowed_report().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_member_history_includes_returned() {
    let f = fixture(LoanPolicy::default()).await;
    let dune = add_book(&f, "Dune", "9780441013593", 1).await;
    let hobbit = add_book(&f, "The Hobbit", "9780547928227", 1).await;
    let member = add_member(&f, "Heidi").await;
    let other = add_member(&f, "Ivan").await;

    let first = f.circulation.borrow(dune.id, member.id).await.unwrap();
    f.circulation.return_borrowing(first.id).await.unwrap();
    f.circulation.borrow(hobbit.id, member.id).await.unwrap();
    f.circulation.borrow(dune.id, other.id).await.unwrap();

    let history = f.circulation.member_history(member.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|b| b.member_id == member.id));
    assert_eq!(history.iter().filter(|b| b.is_active()).count(), 1);

    let active_only = f
        .circulation
        .list(BorrowingFilter {
            member_id: Some(member.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(active_only.len(), 1);
    assert_eq!(active_only[0].book_title, "The Hobbit");

    let missing = f.circulation.member_history(999).await;
    assert!(matches!(missing, Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_book_removes_borrowings() {
    let f = fixture(LoanPolicy::default()).await;
    let book = add_book(&f, "Dune", "9780441013593", 2).await;
    let member = add_member(&f, "Judy").await;

    let loan = f.circulation.borrow(book.id, member.id).await.unwrap();
    f.books.delete(book.id).await.unwrap();

    assert!(f.books.find_by_id(book.id).await.unwrap().is_none());
    assert!(matches!(
        f.circulation.get(loan.id).await,
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        f.books.delete(book.id).await,
        Err(DomainError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_member_restocks_outstanding_copies() {
    let f = fixture(LoanPolicy::default()).await;
    let book = add_book(&f, "The Left Hand of Darkness", "9780441478125", 2).await;
    let member = add_member(&f, "Mallory").await;

    let loan = f.circulation.borrow(book.id, member.id).await.unwrap();
    assert_eq!(available(&f, book.id).await, 1);

    f.members.delete(member.id).await.unwrap();

    assert!(f.members.find_by_id(member.id).await.unwrap().is_none());
    assert!(matches!(
        f.circulation.get(loan.id).await,
        Err(DomainError::NotFound(_))
    ));
    assert_eq!(available(&f, book.id).await, 2);
}

#[tokio::test]
async fn test_available_stays_within_bounds() {
    let f = fixture(LoanPolicy::default()).await;
    let book = add_book(&f, "Foundation", "9780553293357", 3).await;
    let member = add_member(&f, "Niaj").await;

    let mut open = Vec::new();
    for _ in 0..5 {
        if let Ok(loan) = f.circulation.borrow(book.id, member.id).await {
            open.push(loan.id);
        }
        let n = available(&f, book.id).await;
        assert!((0..=3).contains(&n));
    }
    assert_eq!(open.len(), 3);

    for id in open {
        f.circulation.return_borrowing(id).await.unwrap();
        let n = available(&f, book.id).await;
        assert!((0..=3).contains(&n));
    }
    assert_eq!(available(&f, book.id).await, 3);
}

#[tokio::test]
async fn test_isbn_search_is_substring_and_case_insensitive() {
    let f = fixture(LoanPolicy::default()).await;
    add_book(&f, "Proof Copy", "080442957X", 1).await;
    add_book(&f, "Dune", "9780441013593", 1).await;
    add_book(&f, "Foundation", "9780553293357", 1).await;

    let found = f.books.search("2957x").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Proof Copy");

    let by_isbn = f.books.find_by_isbn("0441013").await.unwrap();
    assert_eq!(by_isbn.title, "Dune");

    // Both 978... books contain "978"
    assert!(matches!(
        f.books.find_by_isbn("978").await,
        Err(DomainError::Conflict(_))
    ));
    assert!(matches!(
        f.books.find_by_isbn("000000").await,
        Err(DomainError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_update_book_keeps_available_within_total() {
    let f = fixture(LoanPolicy::default()).await;
    let book = add_book(&f, "Dune", "9780441013593", 3).await;

    let updated = f
        .books
        .update(
            book.id,
            BookInput {
                title: "Dune (Deluxe)".to_string(),
                author: "Frank Herbert".to_string(),
                isbn: book.isbn.clone(),
                publication_year: Some(2019),
                copies_total: 2,
                copies_available: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Dune (Deluxe)");
    assert_eq!(updated.copies_total, 2);
    assert_eq!(updated.copies_available, 2);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let f = fixture(LoanPolicy::default()).await;
    add_book(&f, "Dune", "9780441013593", 1).await;
    add_book(&f, "Foundation", "9780553293357", 1).await;
    add_book(&f, "100% Wolf", "9780734410948", 1).await;
    add_book(&f, "snake_case Primer", "9781234567897", 1).await;
    add_member(&f, "Alice").await;

    assert!(f.books.search("9%3").await.unwrap().is_empty());
    assert!(f.books.search("978_44").await.unwrap().is_empty());

    let percent = f.books.search("0%").await.unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].title, "100% Wolf");

    let underscore = f.books.search("_").await.unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].title, "snake_case Primer");

    assert!(f.members.search("_").await.unwrap().is_empty());
    assert!(f.members.search("%").await.unwrap().is_empty());
    assert!(matches!(
        f.books.find_by_isbn("9%3").await,
        Err(DomainError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    let f = fixture(LoanPolicy::default()).await;
    add_book(&f, "Émile Zola Reader", "9780140449495", 1).await;
    add_book(&f, "Dune", "9780441013593", 1).await;
    add_member(&f, "Zoë").await;
    add_member(&f, "Bob").await;

    for term in ["émile", "ÉMILE", "Émile"] {
        let found = f.books.search(term).await.unwrap();
        assert_eq!(found.len(), 1, "search {:?}", term);
        assert_eq!(found[0].title, "Émile Zola Reader");
    }

    let members = f.members.search("ZOË").await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name, "Zoë");
}

#[tokio::test]
async fn test_out_of_range_loan_period_is_an_error() {
    let f = fixture(LoanPolicy::with_due_dates(i64::MAX / 100_000, 1.0)).await;
    let book = add_book(&f, "Dune", "9780441013593", 1).await;
    let member = add_member(&f, "Alice").await;

    let err = f.circulation.borrow(book.id, member.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Internal(_)));
    assert_eq!(available(&f, book.id).await, 1);
    assert!(f.circulation.borrowed_report().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_without_count_keeps_outstanding_loans() {
    let f = fixture(LoanPolicy::default()).await;
    let book = add_book(&f, "Dune", "9780441013593", 3).await;
    let member = add_member(&f, "Alice").await;
    f.circulation.borrow(book.id, member.id).await.unwrap();

    let edit = |copies_total| BookInput {
        title: "Dune (Revised)".to_string(),
        author: "Frank Herbert".to_string(),
        isbn: book.isbn.clone(),
        publication_year: Some(1965),
        copies_total,
        copies_available: None,
    };

    let updated = f.books.update(book.id, edit(3)).await.unwrap();
    assert_eq!(updated.copies_available, 2);

    let updated = f.books.update(book.id, edit(1)).await.unwrap();
    assert_eq!(updated.copies_total, 1);
    assert_eq!(updated.copies_available, 1);

    assert!(matches!(
        f.books.update(999, edit(1)).await,
        Err(DomainError::NotFound(_))
    ));
}
