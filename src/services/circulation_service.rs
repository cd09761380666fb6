//! Circulation Service - borrow/return rules on top of the repositories
//!
//! The repositories keep copy counts and borrowing rows consistent; this layer
//! decides due dates and fines and validates identifiers.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    BorrowingFilter, BorrowingRepository, BorrowingStatus, DomainError, LoanPolicy,
    MemberRepository, NewBorrowing,
};
use crate::models::BorrowingDetail;
use crate::utils::time::{parse_db_timestamp, to_db_timestamp};

#[derive(Clone)]
pub struct CirculationService {
    borrowings: Arc<dyn BorrowingRepository>,
    members: Arc<dyn MemberRepository>,
    policy: LoanPolicy,
}

fn ensure_id(kind: &str, id: i32) -> Result<(), DomainError> {
    if id <= 0 {
        return Err(DomainError::validation(format!("invalid {} id: {}", kind, id)));
    }
    Ok(())
}

impl CirculationService {
    pub fn new(
        borrowings: Arc<dyn BorrowingRepository>,
        members: Arc<dyn MemberRepository>,
        policy: LoanPolicy,
    ) -> Self {
        Self {
            borrowings,
            members,
            policy,
        }
    }

    pub fn policy(&self) -> LoanPolicy {
        self.policy
    }

    /// Lend one copy of `book_id` to `member_id`
    pub async fn borrow(&self, book_id: i32, member_id: i32) -> Result<BorrowingDetail, DomainError> {
        self.borrow_at(book_id, member_id, Utc::now()).await
    }

    pub async fn borrow_at(
        &self,
        book_id: i32,
        member_id: i32,
        now: DateTime<Utc>,
    ) -> Result<BorrowingDetail, DomainError> {
        ensure_id("book", book_id)?;
        ensure_id("member", member_id)?;

        let new = NewBorrowing {
            book_id,
            member_id,
            issue_date: to_db_timestamp(now),
            due_date: self.policy.due_date(now)?.map(to_db_timestamp),
        };

        match self.borrowings.open(new).await {
            Ok(detail) => {
                tracing::info!(
                    "Borrowing {} opened: book {} -> member {} (due {})",
                    detail.id,
                    book_id,
                    member_id,
                    detail.due_date.as_deref().unwrap_or("untracked")
                );
                Ok(detail)
            }
            Err(e) => {
                tracing::warn!("Borrow of book {} by member {} refused: {}", book_id, member_id, e);
                Err(e)
            }
        }
    }

    /// Close an active borrowing and compute its fine
    pub async fn return_borrowing(&self, id: i32) -> Result<BorrowingDetail, DomainError> {
        self.return_borrowing_at(id, Utc::now()).await
    }

    pub async fn return_borrowing_at(
        &self,
        id: i32,
        now: DateTime<Utc>,
    ) -> Result<BorrowingDetail, DomainError> {
        ensure_id("borrowing", id)?;

        let current = self.get(id).await?;
        if !current.is_active() {
            tracing::warn!("Return of borrowing {} refused: already returned", id);
            return Err(DomainError::conflict(format!(
                "borrowing {} was already returned",
                id
            )));
        }

        let due = current
            .due_date
            .as_deref()
            .map(parse_db_timestamp)
            .transpose()?;
        let fine = self.policy.fine_for(due, now);

        let detail = self
            .borrowings
            .close(id, to_db_timestamp(now), fine)
            .await?;

        if fine > 0.0 {
            tracing::info!(
                "Borrowing {} returned late by {}, fine {:.2}",
                id,
                detail.member_name,
                fine
            );
        } else {
            tracing::info!("Borrowing {} returned", id);
        }

        Ok(detail)
    }

    pub async fn list(&self, filter: BorrowingFilter) -> Result<Vec<BorrowingDetail>, DomainError> {
        self.borrowings.find_all(filter).await
    }

    pub async fn get(&self, id: i32) -> Result<BorrowingDetail, DomainError> {
        ensure_id("borrowing", id)?;

        self.borrowings
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("borrowing {}", id)))
    }

    /// Every book currently out
    pub async fn borrowed_report(&self) -> Result<Vec<BorrowingDetail>, DomainError> {
        self.list(BorrowingFilter::default()).await
    }

    /// Active borrowings past their due date at `now`
    pub async fn overdue_report(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<BorrowingDetail>, DomainError> {
        if !self.policy.tracks_due_dates() {
            return Ok(Vec::new());
        }

        self.list(BorrowingFilter {
            status: BorrowingStatus::Active,
            due_before: Some(to_db_timestamp(now)),
            ..Default::default()
        })
        .await
    }

    /// All borrowings of one member, returned ones included
    pub async fn member_history(&self, member_id: i32) -> Result<Vec<BorrowingDetail>, DomainError> {
        ensure_id("member", member_id)?;

        if self.members.find_by_id(member_id).await?.is_none() {
            return Err(DomainError::not_found(format!("member {}", member_id)));
        }

        self.list(BorrowingFilter {
            status: BorrowingStatus::All,
            member_id: Some(member_id),
            ..Default::default()
        })
        .await
    }
}
