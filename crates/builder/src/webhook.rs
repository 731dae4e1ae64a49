//! Editor for the parameters of a webhook action.
//!
//! Three collapsible lists of key/value rows (query parameters, headers,
//! body) plus the URL.  Every mutation hands back the full updated
//! [`WebhookConfig`], which is what the owning node modal stores.

use std::fmt;

use nodes::placeholder::placeholder;
use nodes::{FieldSpec, KeyValuePair, WebhookConfig};

use crate::BuilderError;

/// One of the three row lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    QueryParams,
    Headers,
    Body,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueryParams => write!(f, "Query Parameters"),
            Self::Headers => write!(f, "Headers"),
            Self::Body => write!(f, "Body"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebhookEditor {
    config: WebhookConfig,
    /// Event schema of the upstream trigger; the source of field chips.
    schema: Vec<FieldSpec>,
    query_params_expanded: bool,
    headers_expanded: bool,
    body_expanded: bool,
}

impl WebhookEditor {
    pub fn new(config: WebhookConfig, schema: Vec<FieldSpec>) -> Self {
        Self {
            config,
            schema,
            query_params_expanded: false,
            headers_expanded: true,
            body_expanded: true,
        }
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }

    pub fn into_config(self) -> WebhookConfig {
        self.config
    }

    // ------------------------------------------------------------------
    // Sections
    // ------------------------------------------------------------------

    pub fn is_expanded(&self, section: Section) -> bool {
        match section {
            Section::QueryParams => self.query_params_expanded,
            Section::Headers => self.headers_expanded,
            Section::Body => self.body_expanded,
        }
    }

    pub fn toggle(&mut self, section: Section) {
        let flag = match section {
            Section::QueryParams => &mut self.query_params_expanded,
            Section::Headers => &mut self.headers_expanded,
            Section::Body => &mut self.body_expanded,
        };
        *flag = !*flag;
    }

    pub fn rows(&self, section: Section) -> &[KeyValuePair] {
        match section {
            Section::QueryParams => &self.config.query_params,
            Section::Headers => &self.config.headers,
            Section::Body => &self.config.body,
        }
    }

    fn rows_mut(&mut self, section: Section) -> &mut Vec<KeyValuePair> {
        match section {
            Section::QueryParams => &mut self.config.query_params,
            Section::Headers => &mut self.config.headers,
            Section::Body => &mut self.config.body,
        }
    }

    fn row_mut(&mut self, section: Section, index: usize) -> Result<&mut KeyValuePair, BuilderError> {
        self.rows_mut(section)
            .get_mut(index)
            .ok_or(BuilderError::RowOutOfRange { section, index })
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    /// Plain set; the URL format is not checked here.
    pub fn set_url(&mut self, url: impl Into<String>) -> &WebhookConfig {
        self.config.webhook_url = url.into();
        &self.config
    }

    /// Append an empty row.
    pub fn add_row(&mut self, section: Section) -> &WebhookConfig {
        self.rows_mut(section).push(KeyValuePair::default());
        &self.config
    }

    pub fn set_key(
        &mut self,
        section: Section,
        index: usize,
        key: impl Into<String>,
    ) -> Result<&WebhookConfig, BuilderError> {
        self.row_mut(section, index)?.key = key.into();
        Ok(&self.config)
    }

    pub fn set_value(
        &mut self,
        section: Section,
        index: usize,
        value: impl Into<String>,
    ) -> Result<&WebhookConfig, BuilderError> {
        self.row_mut(section, index)?.value = value.into();
        Ok(&self.config)
    }

    pub fn remove_row(&mut self, section: Section, index: usize) -> Result<&WebhookConfig, BuilderError> {
        let rows = self.rows_mut(section);
        if index >= rows.len() {
            return Err(BuilderError::RowOutOfRange { section, index });
        }
        rows.remove(index);
        Ok(&self.config)
    }

    /// The field chip under a body row: replaces the row's whole value with
    /// `{{field}}`, discarding whatever was typed there.
    pub fn insert_trigger_field(&mut self, index: usize, field: &str) -> Result<&WebhookConfig, BuilderError> {
        self.row_mut(Section::Body, index)?.value = placeholder(field);
        Ok(&self.config)
    }

    /// Trigger fields offered as chips above the body list and under each
    /// body row.  Empty when the trigger carries no schema.
    pub fn available_fields(&self) -> &[FieldSpec] {
        &self.schema
    }
}
