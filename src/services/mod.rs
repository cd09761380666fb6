//! Services Layer
//!
//! Business rules that sit above the repositories and are shared by the HTTP
//! handlers and the tests.

pub mod circulation_service;
pub mod lookup_service;

// Re-export for convenience
pub use circulation_service::CirculationService;
pub use lookup_service::{LookupOutcome, lookup_isbn};
