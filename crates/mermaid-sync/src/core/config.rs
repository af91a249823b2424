//! Synchronizer and engine configuration
//!
//! [`RenderConfig`] is handed to the engine untouched; its serde field names
//! match the engine's own option object. [`SyncConfig`] holds the settings
//! this crate interprets itself: which classes mark diagrams, which DOM event
//! means "content changed", and where the engine lives.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{MarkerSelector, SyncError, READY_EVENT};

/// Engine sandboxing level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    Strict,
    #[default]
    Loose,
    Antiscript,
    Sandbox,
}

/// Settings passed verbatim to the engine's `initialize`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// Whether the engine scans the page for marker elements on its own
    pub start_on_load: bool,
    pub theme: String,
    pub security_level: SecurityLevel,
    pub theme_variables: BTreeMap<String, String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::gruvbox_dark()
    }
}

impl RenderConfig {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            start_on_load: false,
            theme: theme.into(),
            security_level: SecurityLevel::default(),
            theme_variables: BTreeMap::new(),
        }
    }

    /// Dark theme with the gruvbox palette
    pub fn gruvbox_dark() -> Self {
        [
            ("background", "#1d2021"),
            ("primaryColor", "#3c3836"),
            ("primaryTextColor", "#ebdbb2"),
            ("primaryBorderColor", "#928374"),
            ("lineColor", "#928374"),
            ("secondaryColor", "#282828"),
            ("tertiaryColor", "#504945"),
        ]
        .into_iter()
        .fold(Self::new("dark"), |config, (name, value)| {
            config.with_theme_variable(name, value)
        })
    }

    pub fn with_start_on_load(mut self, start_on_load: bool) -> Self {
        self.start_on_load = start_on_load;
        self
    }

    pub fn with_security_level(mut self, level: SecurityLevel) -> Self {
        self.security_level = level;
        self
    }

    pub fn with_theme_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.theme_variables.insert(name.into(), value.into());
        self
    }

    /// The JSON object handed to the engine
    pub fn to_json(&self) -> Result<String, SyncError> {
        serde_json::to_string(self).map_err(|e| SyncError::config(e.to_string()))
    }
}

/// Everything the synchronizer needs to know about the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    /// Class carried by marker elements, and by class-marked sources
    pub marker_class: String,
    /// Class on `code` elements of fenced diagram blocks
    pub language_class: String,
    /// Name of the DOM event fired after client-side navigation
    pub change_event: String,
    /// Global property holding the engine object
    pub engine_global: String,
    pub render: RenderConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            marker_class: "mermaid".to_string(),
            language_class: "language-mermaid".to_string(),
            change_event: "navigation".to_string(),
            engine_global: "mermaid".to_string(),
            render: RenderConfig::default(),
        }
    }
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration object
    ///
    /// Missing fields take their defaults, so `{}` is a valid configuration.
    pub fn from_json(input: &str) -> Result<Self, SyncError> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| SyncError::config(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    pub fn with_marker_class(mut self, class: impl Into<String>) -> Self {
        self.marker_class = class.into();
        self
    }

    pub fn with_language_class(mut self, class: impl Into<String>) -> Self {
        self.language_class = class.into();
        self
    }

    pub fn with_change_event(mut self, event: impl Into<String>) -> Self {
        self.change_event = event.into();
        self
    }

    pub fn with_engine_global(mut self, name: impl Into<String>) -> Self {
        self.engine_global = name.into();
        self
    }

    /// Selector covering every marker in the document
    pub fn marker_selector(&self) -> MarkerSelector {
        MarkerSelector::new(self.marker_class.as_str())
    }

    /// Check that every name is a single non-empty token
    ///
    /// Class names end up inside CSS selectors, so whitespace, dots, commas
    /// and the like would change what gets matched.
    pub fn validate(&self) -> Result<(), SyncError> {
        let fields = [
            ("markerClass", &self.marker_class),
            ("languageClass", &self.language_class),
            ("changeEvent", &self.change_event),
            ("engineGlobal", &self.engine_global),
        ];

        for (field, value) in fields {
            if value.is_empty() {
                return Err(SyncError::config(format!("{} must not be empty", field)));
            }
            if let Some(c) = value
                .chars()
                .find(|c| !(c.is_alphanumeric() || *c == '-' || *c == '_'))
            {
                return Err(SyncError::config(format!(
                    "{} contains invalid character {:?}: {}",
                    field, c, value
                )));
            }
        }

        if self.marker_class == self.language_class {
            return Err(SyncError::config(
                "markerClass and languageClass must differ",
            ));
        }

        if self.change_event == READY_EVENT {
            return Err(SyncError::config(format!(
                "changeEvent must differ from {}",
                READY_EVENT
            )));
        }

        Ok(())
    }
}
