//! Engine double that records what it was asked to do

use anyhow::{anyhow, Result};

use crate::core::{Engine, MarkerSelector, RenderConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Initialize(RenderConfig),
    /// CSS selector passed to `render`
    Render(String),
}

/// Records every call; can be told to fail
///
/// Failed calls are recorded too, since the engine was still invoked.
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    calls: Vec<EngineCall>,
    fail_initialize: Option<String>,
    fail_render: Option<String>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `initialize` call fail with `message`
    pub fn failing_initialize(mut self, message: impl Into<String>) -> Self {
        self.fail_initialize = Some(message.into());
        self
    }

    /// Make every `render` call fail with `message`
    pub fn failing_render(mut self, message: impl Into<String>) -> Self {
        self.fail_render = Some(message.into());
        self
    }

    /// Stop failing
    pub fn recover(&mut self) {
        self.fail_initialize = None;
        self.fail_render = None;
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn initialize_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, EngineCall::Initialize(_)))
            .count()
    }

    pub fn render_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, EngineCall::Render(_)))
            .count()
    }

    pub fn last_initialize(&self) -> Option<&RenderConfig> {
        self.calls.iter().rev().find_map(|call| match call {
            EngineCall::Initialize(config) => Some(config),
            EngineCall::Render(_) => None,
        })
    }
}

impl Engine for RecordingEngine {
    fn initialize(&mut self, config: &RenderConfig) -> Result<()> {
        self.calls.push(EngineCall::Initialize(config.clone()));
        match &self.fail_initialize {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(()),
        }
    }

    fn render(&mut self, selector: &MarkerSelector) -> Result<()> {
        self.calls.push(EngineCall::Render(selector.css()));
        match &self.fail_render {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
