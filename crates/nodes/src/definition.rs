//! Catalog definitions supplied by the external definition registry.
//!
//! These are read-only from the builder's point of view: users pick one,
//! they never create or edit them.

use serde::{Deserialize, Serialize};

/// The `action_type` of the one action kind with bespoke configuration.
pub const WEBHOOK_ACTION_TYPE: &str = "webhook";

/// One data field carried by a trigger event.
///
/// The set of fields in a trigger's `event_schema` is the vocabulary
/// available to `{{field}}` placeholders in downstream actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub field: String,
    #[serde(default)]
    pub description: String,
}

impl FieldSpec {
    pub fn new(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            description: description.into(),
        }
    }
}

/// A trigger kind available in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerDefinition {
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub event_name: String,
    #[serde(default)]
    pub event_schema: Vec<FieldSpec>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub icon: String,
}

/// An action kind available in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub action_type: String,
    #[serde(default)]
    pub config_schema: serde_json::Value,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub icon: String,
}

impl ActionDefinition {
    /// Whether this definition gets the webhook configuration editor.
    pub fn is_webhook(&self) -> bool {
        self.action_type == WEBHOOK_ACTION_TYPE
    }
}

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

/// Icon glyphs known to the builder.
///
/// Registry rows name their icon with a free-form key; anything the
/// builder does not recognise renders as [`Icon::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Zap,
    Play,
    Mail,
    Webhook,
    UserPlus,
    ShoppingCart,
    Calendar,
    MessageSquare,
    Bell,
    Database,
    Tag,
    Clock,
    Default,
}

impl Icon {
    /// Resolve a registry icon key, falling back to [`Icon::Default`].
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "zap" => Self::Zap,
            "play" => Self::Play,
            "mail" => Self::Mail,
            "webhook" => Self::Webhook,
            "user-plus" => Self::UserPlus,
            "shopping-cart" => Self::ShoppingCart,
            "calendar" => Self::Calendar,
            "message-square" => Self::MessageSquare,
            "bell" => Self::Bell,
            "database" => Self::Database,
            "tag" => Self::Tag,
            "clock" => Self::Clock,
            _ => Self::Default,
        }
    }
}

impl TriggerDefinition {
    pub fn icon(&self) -> Icon {
        Icon::from_key(&self.icon)
    }
}

impl ActionDefinition {
    pub fn icon(&self) -> Icon {
        Icon::from_key(&self.icon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_icon_keys_resolve() {
        assert_eq!(Icon::from_key("user-plus"), Icon::UserPlus);
        assert_eq!(Icon::from_key(" Mail "), Icon::Mail);
    }

    #[test]
    fn unknown_icon_key_falls_back_to_default() {
        assert_eq!(Icon::from_key("rocket-ship"), Icon::Default);
        assert_eq!(Icon::from_key(""), Icon::Default);
    }

    #[test]
    fn trigger_definition_tolerates_missing_optional_columns() {
        let def: TriggerDefinition = serde_json::from_value(serde_json::json!({
            "id": "t1",
            "name": "lead_created",
            "display_name": "New Lead Created",
            "event_name": "lead.created"
        }))
        .expect("minimal definition should parse");

        assert!(def.event_schema.is_empty());
        assert_eq!(def.icon(), Icon::Default);
    }
}
