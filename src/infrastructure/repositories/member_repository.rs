//! SeaORM implementation of MemberRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};

use crate::domain::{DomainError, MemberRepository};
use crate::models::borrowing::{self, Entity as BorrowingEntity};
use crate::models::member::{ActiveModel, Column, Entity as MemberEntity};
use crate::models::{Member, MemberInput};
use crate::utils::search::fold;
use crate::utils::time::now_db_timestamp;

use super::borrowing_repository::restock_copy;
use super::key_contains;

/// SeaORM-based implementation of MemberRepository
pub struct SeaOrmMemberRepository {
    db: DatabaseConnection,
}

impl SeaOrmMemberRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemberRepository for SeaOrmMemberRepository {
    async fn find_all(&self) -> Result<Vec<Member>, DomainError> {
        let members = MemberEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(members.into_iter().map(Member::from).collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Member>, DomainError> {
        let cond = Condition::any()
            .add(key_contains(Column::NameKey, query))
            .add(key_contains(Column::ContactKey, query));

        let members = MemberEntity::find()
            .filter(cond)
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(members.into_iter().map(Member::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Member>, DomainError> {
        let member = MemberEntity::find_by_id(id).one(&self.db).await?;
        Ok(member.map(Member::from))
    }

    async fn create(&self, input: MemberInput) -> Result<Member, DomainError> {
        let now = now_db_timestamp();

        let member = ActiveModel {
            name_key: Set(fold(&input.name)),
            contact_key: Set(fold(&input.contact)),
            name: Set(input.name),
            contact: Set(input.contact),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = member.insert(&self.db).await?;
        Ok(Member::from(result))
    }

    async fn update(&self, id: i32, input: MemberInput) -> Result<Member, DomainError> {
        let existing = MemberEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("member {}", id)))?;

        let mut active: ActiveModel = existing.into();
        active.name_key = Set(fold(&input.name));
        active.contact_key = Set(fold(&input.contact));
        active.name = Set(input.name);
        active.contact = Set(input.contact);
        active.updated_at = Set(now_db_timestamp());

        let result = active.update(&self.db).await?;
        Ok(Member::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        // Touching the row takes the write lock and checks existence
        let touched = MemberEntity::update_many()
            .col_expr(Column::UpdatedAt, Expr::value(now_db_timestamp()))
            .filter(Column::Id.eq(id))
            .exec(&txn)
            .await?;

        if touched.rows_affected == 0 {
            return Err(DomainError::not_found(format!("member {}", id)));
        }

        // Copies still out with this member go back on the shelf
        let outstanding = BorrowingEntity::find()
            .filter(borrowing::Column::MemberId.eq(id))
            .filter(borrowing::Column::ReturnDate.is_null())
            .all(&txn)
            .await?;

        for loan in &outstanding {
            restock_copy(&txn, loan.book_id).await?;
        }

        let removed = BorrowingEntity::delete_many()
            .filter(borrowing::Column::MemberId.eq(id))
            .exec(&txn)
            .await?;

        MemberEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            "Deleted member {} and {} borrowing record(s), {} copy(ies) restocked",
            id,
            removed.rows_affected,
            outstanding.len()
        );
        Ok(())
    }
}
