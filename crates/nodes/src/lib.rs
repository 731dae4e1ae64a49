//! `nodes` crate: the workflow node model and the definition catalog types.
//!
//! A workflow is one trigger node followed by an ordered list of action
//! nodes.  Every node carries a reference to the catalog definition it was
//! built from plus the user-supplied configuration for that definition.
//! The builder crate edits these types; the db crate stores them as opaque
//! JSON.

pub mod card;
pub mod definition;
pub mod error;
pub mod mock;
pub mod node;
pub mod placeholder;
pub mod webhook;

pub use card::{Accent, NodeCard};
pub use definition::{ActionDefinition, FieldSpec, Icon, TriggerDefinition, WEBHOOK_ACTION_TYPE};
pub use error::NodeError;
pub use node::{
    generate_node_id, GenericActionProperties, NodeProperties, NodeType, Position,
    TriggerProperties, WebhookActionProperties, WorkflowNode,
};
pub use webhook::{KeyValuePair, WebhookConfig};
