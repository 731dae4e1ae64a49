//! Shared fixtures for the builder tests.

use std::sync::Arc;

use db::MemoryStore;
use nodes::{mock, NodeProperties, WorkflowNode};

use crate::catalog::demo_seed;

/// Trigger "Lead Intake" followed by action "Welcome Email".
pub fn welcome_nodes() -> Vec<WorkflowNode> {
    vec![
        WorkflowNode::new("Lead Intake", NodeProperties::for_trigger(mock::lead_created_trigger())),
        WorkflowNode::new("Welcome Email", NodeProperties::for_action(mock::send_email_action())),
    ]
}

/// A store carrying the demo catalog and its "Lead Welcome" template.
pub fn seeded_store() -> MemoryStore {
    MemoryStore::with_seed(demo_seed().unwrap())
}

pub fn shared_store() -> Arc<MemoryStore> {
    Arc::new(seeded_store())
}
