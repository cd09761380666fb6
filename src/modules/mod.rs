//! Integrations with services outside the library's own database

pub mod integrations;
