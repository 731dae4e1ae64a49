//! Repository functions: one function per database operation.
//!
//! Every function takes a `&PgPool` (or an executor) and returns a
//! `Result<T, DbError>`.  No business logic, no domain types; pure SQL.

pub mod automations;
pub mod definitions;
pub mod templates;
