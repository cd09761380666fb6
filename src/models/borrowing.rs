use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "borrowings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub book_id: i32,
    pub member_id: i32,
    pub issue_date: String,
    pub due_date: Option<String>,
    pub return_date: Option<String>, // NULL while the book is out
    pub fine: f64,
}

// No database-level cascade: deleting a book or member removes its
// borrowings explicitly first.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Book,
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Member,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Borrowing joined with the book title and member name, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BorrowingDetail {
    pub id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub member_id: i32,
    pub member_name: String,
    pub issue_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    pub fine: f64,
}

impl BorrowingDetail {
    pub fn from_parts(
        borrowing: Model,
        book_title: impl Into<String>,
        member_name: impl Into<String>,
    ) -> Self {
        Self {
            id: borrowing.id,
            book_id: borrowing.book_id,
            book_title: book_title.into(),
            member_id: borrowing.member_id,
            member_name: member_name.into(),
            issue_date: borrowing.issue_date,
            due_date: borrowing.due_date,
            return_date: borrowing.return_date,
            fine: borrowing.fine,
        }
    }

    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BorrowRequest {
    pub book_id: i32,
    pub member_id: i32,
}
