//! Typed error type for the db crate.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("row not found")]
    NotFound,

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Raised by [`crate::MemoryStore`] when a failure was injected for `op`.
    #[error("injected failure during {0}")]
    Injected(StoreOp),
}

/// Store operations, used to name the operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOp {
    List,
    Get,
    Create,
    Update,
    Delete,
    ListTemplates,
    InstantiateTemplate,
    IncrementTemplateUsage,
    ListTriggers,
    ListActions,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ListTemplates => "list_templates",
            Self::InstantiateTemplate => "instantiate_template",
            Self::IncrementTemplateUsage => "increment_template_usage",
            Self::ListTriggers => "list_triggers",
            Self::ListActions => "list_actions",
        };
        f.write_str(name)
    }
}
