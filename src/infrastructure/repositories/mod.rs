//! Repository implementations using SeaORM

pub mod book_repository;
pub mod borrowing_repository;
pub mod member_repository;

pub use book_repository::SeaOrmBookRepository;
pub use borrowing_repository::SeaOrmBorrowingRepository;
pub use member_repository::SeaOrmMemberRepository;

use sea_orm::sea_query::{Expr, IntoColumnRef, LikeExpr, SimpleExpr};

use crate::utils::search::contains_pattern;

/// Substring match of `term` against a lowercased key column
pub(crate) fn key_contains<C: IntoColumnRef>(key_column: C, term: &str) -> SimpleExpr {
    Expr::col(key_column).like(LikeExpr::new(contains_pattern(term)).escape('\\'))
}
