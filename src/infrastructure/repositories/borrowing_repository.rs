//! SeaORM implementation of BorrowingRepository
//!
//! Copy counts are only ever changed with conditional UPDATE statements so
//! two requests racing for the last copy cannot both win.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait, sea_query::Expr,
};

use crate::domain::{
    BorrowingFilter, BorrowingRepository, BorrowingStatus, DomainError, NewBorrowing,
};
use crate::models::BorrowingDetail;
use crate::models::book::{self, Entity as BookEntity};
use crate::models::borrowing::{self, ActiveModel, Column, Entity as BorrowingEntity};
use crate::models::member::{self, Entity as MemberEntity};

/// SeaORM-based implementation of BorrowingRepository
pub struct SeaOrmBorrowingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBorrowingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Decrement `copies_available` if at least one copy is on the shelf.
///
/// Returns `false` when nothing was left to take.
pub(crate) async fn take_copy<C: ConnectionTrait>(
    conn: &C,
    book_id: i32,
    now: &str,
) -> Result<bool, DomainError> {
    let result = BookEntity::update_many()
        .col_expr(
            book::Column::CopiesAvailable,
            Expr::col(book::Column::CopiesAvailable).sub(1),
        )
        .col_expr(book::Column::UpdatedAt, Expr::value(now.to_string()))
        .filter(book::Column::Id.eq(book_id))
        .filter(book::Column::CopiesAvailable.gt(0))
        .exec(conn)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Increment `copies_available`, never past `copies_total`.
///
/// Returns `false` when the count was already at the total.
pub(crate) async fn restock_copy<C: ConnectionTrait>(
    conn: &C,
    book_id: i32,
) -> Result<bool, DomainError> {
    let result = BookEntity::update_many()
        .col_expr(
            book::Column::CopiesAvailable,
            Expr::col(book::Column::CopiesAvailable).add(1),
        )
        .filter(book::Column::Id.eq(book_id))
        .filter(Expr::col(book::Column::CopiesAvailable).lt(Expr::col(book::Column::CopiesTotal)))
        .exec(conn)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Attach the book title and member name to a single borrowing row
async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    borrowing: borrowing::Model,
) -> Result<BorrowingDetail, DomainError> {
    let book_title = BookEntity::find_by_id(borrowing.book_id)
        .one(conn)
        .await?
        .map(|b| b.title)
        .unwrap_or_else(|| "Unknown".to_string());

    let member_name = MemberEntity::find_by_id(borrowing.member_id)
        .one(conn)
        .await?
        .map(|m| m.name)
        .unwrap_or_else(|| "Unknown".to_string());

    Ok(BorrowingDetail::from_parts(
        borrowing,
        book_title,
        member_name,
    ))
}

#[async_trait]
impl BorrowingRepository for SeaOrmBorrowingRepository {
    async fn find_all(&self, filter: BorrowingFilter) -> Result<Vec<BorrowingDetail>, DomainError> {
        let mut condition = Condition::all();

        match filter.status {
            BorrowingStatus::Active => condition = condition.add(Column::ReturnDate.is_null()),
            BorrowingStatus::Returned => {
                condition = condition.add(Column::ReturnDate.is_not_null())
            }
            BorrowingStatus::All => {}
        }

        if let Some(member_id) = filter.member_id {
            condition = condition.add(Column::MemberId.eq(member_id));
        }

        if let Some(book_id) = filter.book_id {
            condition = condition.add(Column::BookId.eq(book_id));
        }

        if let Some(due_before) = filter.due_before {
            condition = condition.add(Column::DueDate.lt(due_before));
        }

        let borrowings_with_books = BorrowingEntity::find()
            .filter(condition)
            .order_by_desc(Column::IssueDate)
            .order_by_desc(Column::Id)
            .find_also_related(BookEntity)
            .all(&self.db)
            .await?;

        // Fetch member names in one query
        let member_ids: Vec<i32> = borrowings_with_books
            .iter()
            .map(|(b, _)| b.member_id)
            .collect();

        let mut member_names: HashMap<i32, String> = HashMap::new();

        if !member_ids.is_empty() {
            let members = MemberEntity::find()
                .filter(member::Column::Id.is_in(member_ids))
                .all(&self.db)
                .await?;

            for m in members {
                member_names.insert(m.id, m.name);
            }
        }

        let result = borrowings_with_books
            .into_iter()
            .map(|(borrowing, book)| {
                let book_title = book
                    .map(|b| b.title)
                    .unwrap_or_else(|| "Unknown".to_string());
                let member_name = member_names
                    .get(&borrowing.member_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string());

                BorrowingDetail::from_parts(borrowing, book_title, member_name)
            })
            .collect();

        Ok(result)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<BorrowingDetail>, DomainError> {
        match BorrowingEntity::find_by_id(id).one(&self.db).await? {
            Some(borrowing) => Ok(Some(load_detail(&self.db, borrowing).await?)),
            None => Ok(None),
        }
    }

    async fn open(&self, new: NewBorrowing) -> Result<BorrowingDetail, DomainError> {
        let txn = self.db.begin().await?;

        // Write first so the transaction holds the write lock before any read.
        // Dropping the transaction on an early return rolls it back.
        if !take_copy(&txn, new.book_id, &new.issue_date).await? {
            if BookEntity::find_by_id(new.book_id).one(&txn).await?.is_none() {
                return Err(DomainError::not_found(format!("book {}", new.book_id)));
            }
            if MemberEntity::find_by_id(new.member_id).one(&txn).await?.is_none() {
                return Err(DomainError::not_found(format!("member {}", new.member_id)));
            }
            return Err(DomainError::conflict(format!(
                "no copies available for book {}",
                new.book_id
            )));
        }

        let member = MemberEntity::find_by_id(new.member_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("member {}", new.member_id)))?;

        let book = BookEntity::find_by_id(new.book_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("book {} vanished", new.book_id)))?;

        let borrowing = ActiveModel {
            book_id: Set(book.id),
            member_id: Set(member.id),
            issue_date: Set(new.issue_date),
            due_date: Set(new.due_date),
            return_date: Set(None),
            fine: Set(0.0),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(BorrowingDetail::from_parts(borrowing, book.title, member.name))
    }

    async fn close(
        &self,
        id: i32,
        return_date: String,
        fine: f64,
    ) -> Result<BorrowingDetail, DomainError> {
        let txn = self.db.begin().await?;

        let closed = BorrowingEntity::update_many()
            .col_expr(Column::ReturnDate, Expr::value(return_date))
            .col_expr(Column::Fine, Expr::value(fine))
            .filter(Column::Id.eq(id))
            .filter(Column::ReturnDate.is_null())
            .exec(&txn)
            .await?;

        if closed.rows_affected == 0 {
            return match BorrowingEntity::find_by_id(id).one(&txn).await? {
                Some(_) => Err(DomainError::conflict(format!(
                    "borrowing {} was already returned",
                    id
                ))),
                None => Err(DomainError::not_found(format!("borrowing {}", id))),
            };
        }

        let updated = BorrowingEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("borrowing {} vanished", id)))?;

        if !restock_copy(&txn, updated.book_id).await? {
            tracing::warn!(
                "Book {} already had every copy available; count left unchanged",
                updated.book_id
            );
        }

        let detail = load_detail(&txn, updated).await?;
        txn.commit().await?;

        Ok(detail)
    }
}
