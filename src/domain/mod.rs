//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only trait definitions, loan rules and domain error types.

pub mod errors;
pub mod loan_policy;
pub mod repositories;

pub use errors::DomainError;
pub use loan_policy::LoanPolicy;
pub use repositories::*;
