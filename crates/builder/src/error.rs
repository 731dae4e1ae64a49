//! Builder-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::webhook::Section;

/// A rule the user has to fix before something can be saved.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a trigger")]
    MissingTrigger,

    #[error("Please select an action")]
    MissingAction,

    #[error("Please enter a webhook URL")]
    MissingWebhookUrl,

    #[error("Please enter a name for this step")]
    MissingNodeName,

    #[error("Please enter an automation name")]
    MissingAutomationName,

    #[error("Please add a trigger to start the workflow")]
    MissingWorkflowTrigger,

    /// Only reachable through hand-written node lists, never through the builder.
    #[error("The trigger must be the first step of the workflow")]
    TriggerNotFirst,

    /// Only reachable through hand-written node lists, never through the builder.
    #[error("A workflow can only have one trigger")]
    MultipleTriggers,
}

/// Errors produced by the builder components and the automations page.
#[derive(Debug, Error)]
pub enum BuilderError {
    // ------ User-fixable ------

    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ------ Editing ------

    #[error("{section} row {index} does not exist")]
    RowOutOfRange { section: Section, index: usize },

    #[error("node '{0}' not found")]
    NodeNotFound(String),

    #[error("the trigger cannot be deleted, pick a new trigger to replace it")]
    TriggerNotDeletable,

    #[error("add a trigger before adding actions")]
    TriggerRequired,

    #[error("a {expected} definition was expected")]
    DefinitionKindMismatch { expected: nodes::NodeType },

    #[error("this automation is open read-only")]
    ReadOnly,

    #[error("no step is being edited")]
    NoNodeModal,

    // ------ Persistence ------

    #[error("automation {0} not found")]
    AutomationNotFound(Uuid),

    #[error("template {0} not found")]
    TemplateNotFound(Uuid),

    #[error("stored record {id} is unreadable: {reason}")]
    CorruptRecord { id: String, reason: String },

    #[error("could not encode the workflow: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(#[from] db::DbError),
}

impl BuilderError {
    /// The validation failure behind this error, if it is one.
    pub fn as_validation(&self) -> Option<ValidationError> {
        match self {
            Self::Validation(v) => Some(*v),
            _ => None,
        }
    }
}
