//! Request handlers, one module per resource.

pub mod automations;
pub mod definitions;
pub mod templates;

pub(crate) use crate::AppState;
