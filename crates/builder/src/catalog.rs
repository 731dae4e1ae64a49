//! Conversions between registry rows and catalog definitions, and the
//! demo catalog used when no database is configured.

use db::memory::SeedTemplate;
use db::models::{ActionDefinitionRow, TriggerDefinitionRow};
use db::Seed;
use nodes::{mock, ActionDefinition, NodeProperties, TriggerDefinition, WorkflowNode};

use crate::BuilderError;

pub fn trigger_from_row(row: TriggerDefinitionRow) -> Result<TriggerDefinition, BuilderError> {
    let event_schema = match row.event_schema {
        serde_json::Value::Null => Vec::new(),
        schema => serde_json::from_value(schema).map_err(|e| BuilderError::CorruptRecord {
            id: row.id.clone(),
            reason: e.to_string(),
        })?,
    };

    Ok(TriggerDefinition {
        id: row.id,
        name: row.name,
        display_name: row.display_name,
        description: row.description,
        event_name: row.event_name,
        event_schema,
        category: row.category,
        icon: row.icon,
    })
}

pub fn action_from_row(row: ActionDefinitionRow) -> ActionDefinition {
    ActionDefinition {
        id: row.id,
        name: row.name,
        display_name: row.display_name,
        description: row.description,
        action_type: row.action_type,
        config_schema: row.config_schema,
        category: row.category,
        icon: row.icon,
    }
}

pub fn trigger_to_row(definition: &TriggerDefinition) -> Result<TriggerDefinitionRow, BuilderError> {
    Ok(TriggerDefinitionRow {
        id: definition.id.clone(),
        name: definition.name.clone(),
        display_name: definition.display_name.clone(),
        description: definition.description.clone(),
        event_name: definition.event_name.clone(),
        event_schema: serde_json::to_value(&definition.event_schema)?,
        category: definition.category.clone(),
        icon: definition.icon.clone(),
        is_active: true,
    })
}

pub fn action_to_row(definition: &ActionDefinition) -> ActionDefinitionRow {
    ActionDefinitionRow {
        id: definition.id.clone(),
        name: definition.name.clone(),
        display_name: definition.display_name.clone(),
        description: definition.description.clone(),
        action_type: definition.action_type.clone(),
        config_schema: definition.config_schema.clone(),
        category: definition.category.clone(),
        icon: definition.icon.clone(),
        is_active: true,
    }
}

/// The canned trigger and action catalog plus a "Lead Welcome" template
/// (new lead → welcome email).
pub fn demo_seed() -> Result<Seed, BuilderError> {
    let welcome = vec![
        WorkflowNode::new("Lead Intake", NodeProperties::for_trigger(mock::lead_created_trigger())),
        WorkflowNode::new("Welcome Email", NodeProperties::for_action(mock::send_email_action())),
    ];

    Ok(Seed {
        triggers: mock::triggers()
            .iter()
            .map(trigger_to_row)
            .collect::<Result<_, _>>()?,
        actions: mock::actions().iter().map(action_to_row).collect(),
        templates: vec![SeedTemplate {
            name: "Lead Welcome".into(),
            description: "Email every new lead".into(),
            category: "Leads".into(),
            tags: vec!["onboarding".into()],
            workflow_nodes: serde_json::to_value(welcome)?,
            usage_count: 3,
        }],
        automations: Vec::new(),
    })
}
