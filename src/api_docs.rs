use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::list_books,
        api::books::search_books,
        api::books::get_book_by_isbn,
        api::books::create_book,
        api::books::get_book,
        api::books::update_book,
        api::books::delete_book,
        api::members::list_members,
        api::members::search_members,
        api::members::create_member,
        api::members::get_member,
        api::members::update_member,
        api::members::delete_member,
        api::borrowings::list_borrowings,
        api::borrowings::borrow_book,
        api::borrowings::get_borrowing,
        api::borrowings::return_book,
        api::reports::borrowed_books,
        api::reports::overdue_books,
        api::reports::member_history,
        api::lookup::lookup_book,
    ),
    components(
        schemas(
            crate::models::Book,
            crate::models::BookInput,
            crate::models::BookDraft,
            crate::models::Member,
            crate::models::MemberInput,
            crate::models::BorrowingDetail,
            crate::models::BorrowRequest,
        )
    ),
    tags(
        (name = "library-ils", description = "Library circulation API")
    )
)]
pub struct ApiDoc;
