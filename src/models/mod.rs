pub mod book;
pub mod borrowing;
pub mod member;

pub use book::{Book, BookDraft, BookInput};
pub use borrowing::{BorrowRequest, BorrowingDetail};
pub use member::{Member, MemberInput};
