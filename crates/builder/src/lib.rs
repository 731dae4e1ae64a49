//! `builder` crate: the automation builder and the automations page.
//!
//! Sits between the node model (`nodes`) and persistence (`db`).  Holds
//! the catalog selectors, the webhook editor, the node config modal, the
//! workflow builder, and the page controller that talks to the store.

pub mod catalog;
pub mod error;
pub mod models;
pub mod node_modal;
pub mod page;
pub mod selector;
pub mod webhook;
pub mod workflow;

pub use error::{BuilderError, ValidationError};
pub use models::{
    Automation, AutomationDraft, AutomationMetadata, AutomationStatus, AutomationTemplate,
};
pub use node_modal::{validate_node, ModalStage, NodeConfigModal};
pub use page::{Analytics, AutomationFilter, AutomationsPage};
pub use selector::{
    ActionSelector, CatalogEntry, CategoryFilter, Selector, SelectorOutcome, TriggerSelector,
};
pub use webhook::{Section, WebhookEditor};
pub use workflow::{render_pipeline, BuilderMode, PipelineItem, WorkflowBuilder};

#[cfg(test)]
mod test_support;
