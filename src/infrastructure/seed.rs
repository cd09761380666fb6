use sea_orm::*;

use crate::models::{book, member};
use crate::utils::search::fold;
use crate::utils::time::now_db_timestamp;

/// Insert a handful of books and members when the catalog is empty.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    if book::Entity::find().count(db).await? > 0 {
        tracing::info!("Catalog already has books, skipping demo seed");
        return Ok(());
    }

    let now = now_db_timestamp();

    let books = [
        ("Dune", "Frank Herbert", "9780441013593", 1965, 3),
        ("Foundation", "Isaac Asimov", "9780553293357", 1951, 2),
        ("The Hobbit", "J.R.R. Tolkien", "9780547928227", 1937, 1),
        ("The Left Hand of Darkness", "Ursula K. Le Guin", "9780441478125", 1969, 2),
    ];

    for (title, author, isbn, year, copies) in books {
        let book = book::ActiveModel {
            title: Set(title.to_owned()),
            author: Set(author.to_owned()),
            isbn: Set(isbn.to_owned()),
            publication_year: Set(Some(year)),
            copies_total: Set(copies),
            copies_available: Set(copies),
            title_key: Set(fold(title)),
            author_key: Set(fold(author)),
            isbn_key: Set(fold(isbn)),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        book.insert(db).await?;
    }

    let members = [
        ("Ada Lovelace", "ada@example.org"),
        ("Alan Turing", "+44 20 7946 0000"),
    ];

    for (name, contact) in members {
        let member = member::ActiveModel {
            name: Set(name.to_owned()),
            contact: Set(contact.to_owned()),
            name_key: Set(fold(name)),
            contact_key: Set(fold(contact)),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        member.insert(db).await?;
    }

    Ok(())
}
