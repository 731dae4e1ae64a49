//! Canned catalog definitions: test doubles for the definition registry.
//!
//! Useful in unit and integration tests across the workspace where a real
//! registry is either unavailable or irrelevant.  The same set seeds the
//! in-memory backend when the server runs without a database.

use serde_json::json;

use crate::{ActionDefinition, FieldSpec, TriggerDefinition};

/// "New Lead Created": `lead.created` carrying `email` and `name`.
pub fn lead_created_trigger() -> TriggerDefinition {
    TriggerDefinition {
        id: "trg-lead-created".into(),
        name: "lead_created".into(),
        display_name: "New Lead Created".into(),
        description: "Fires when a lead submits an opt-in form".into(),
        event_name: "lead.created".into(),
        event_schema: vec![
            FieldSpec::new("email", "Lead email address"),
            FieldSpec::new("name", "Lead full name"),
        ],
        category: "Leads".into(),
        icon: "user-plus".into(),
    }
}

/// "Course Purchased": `course.purchased`.
pub fn course_purchased_trigger() -> TriggerDefinition {
    TriggerDefinition {
        id: "trg-course-purchased".into(),
        name: "course_purchased".into(),
        display_name: "Course Purchased".into(),
        description: "Fires after a successful checkout".into(),
        event_name: "course.purchased".into(),
        event_schema: vec![
            FieldSpec::new("email", "Buyer email address"),
            FieldSpec::new("course_id", "Purchased course"),
            FieldSpec::new("amount", "Amount paid"),
        ],
        category: "Sales".into(),
        icon: "shopping-cart".into(),
    }
}

/// "Call Webhook": the action with bespoke configuration.
pub fn webhook_action() -> ActionDefinition {
    ActionDefinition {
        id: "act-webhook".into(),
        name: "call_webhook".into(),
        display_name: "Call Webhook".into(),
        description: "Send an HTTP request to an external URL".into(),
        action_type: crate::WEBHOOK_ACTION_TYPE.into(),
        config_schema: json!({ "type": "object" }),
        category: "Integrations".into(),
        icon: "webhook".into(),
    }
}

/// "Send Email": a plain action with no structured config.
pub fn send_email_action() -> ActionDefinition {
    ActionDefinition {
        id: "act-send-email".into(),
        name: "send_email".into(),
        display_name: "Send Email".into(),
        description: "Send a templated email to the contact".into(),
        action_type: "email".into(),
        config_schema: json!({}),
        category: "Messaging".into(),
        icon: "mail".into(),
    }
}

/// "Add Tag": a plain action in the CRM category.
pub fn add_tag_action() -> ActionDefinition {
    ActionDefinition {
        id: "act-add-tag".into(),
        name: "add_tag".into(),
        display_name: "Add Tag".into(),
        description: "Tag the contact in the CRM".into(),
        action_type: "crm_tag".into(),
        config_schema: json!({}),
        category: "CRM".into(),
        icon: "tag".into(),
    }
}

/// Every canned trigger, ordered by category.
pub fn triggers() -> Vec<TriggerDefinition> {
    vec![lead_created_trigger(), course_purchased_trigger()]
}

/// Every canned action, ordered by category.
pub fn actions() -> Vec<ActionDefinition> {
    vec![add_tag_action(), webhook_action(), send_email_action()]
}
