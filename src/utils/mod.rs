pub mod search;
pub mod time;
