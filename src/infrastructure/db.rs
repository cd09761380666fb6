use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL DEFAULT '',
            isbn TEXT NOT NULL DEFAULT '',
            publication_year INTEGER,
            copies_total INTEGER NOT NULL DEFAULT 1 CHECK (copies_total >= 0),
            copies_available INTEGER NOT NULL DEFAULT 1,
            title_key TEXT NOT NULL DEFAULT '',
            author_key TEXT NOT NULL DEFAULT '',
            isbn_key TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            CHECK (copies_available >= 0 AND copies_available <= copies_total)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            contact TEXT NOT NULL DEFAULT '',
            name_key TEXT NOT NULL DEFAULT '',
            contact_key TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        // No ON DELETE CASCADE: repositories remove borrowings first
        r#"
        CREATE TABLE IF NOT EXISTS borrowings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL,
            member_id INTEGER NOT NULL,
            issue_date TEXT NOT NULL,
            due_date TEXT,
            return_date TEXT,
            fine REAL NOT NULL DEFAULT 0,
            FOREIGN KEY (book_id) REFERENCES books(id),
            FOREIGN KEY (member_id) REFERENCES members(id)
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_borrowings_book_id ON borrowings(book_id)",
        "CREATE INDEX IF NOT EXISTS idx_borrowings_member_id ON borrowings(member_id)",
        "CREATE INDEX IF NOT EXISTS idx_books_isbn_key ON books(isbn_key)",
    ];

    for sql in statements {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            sql.to_owned(),
        ))
        .await?;
    }

    tracing::debug!("Database schema is up to date");
    Ok(())
}
