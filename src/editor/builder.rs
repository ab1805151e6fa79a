use super::GraphEditor;
use super::notice::{DEFAULT_NOTICE_DURATION, NoticeBoard};
use crate::layout::LayoutConfig;
use crate::model::{CURRENT_VERSION, DEFAULT_WORKFLOW_NAME};
use crate::templates::{ConfigProvider, TemplateRegistry};
use std::time::Duration;

/// Configures a [`GraphEditor`] before it is created.
pub struct EditorBuilder {
    name: String,
    layout: LayoutConfig,
    provider: Box<dyn ConfigProvider>,
    notice_duration: Duration,
}

impl Default for EditorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorBuilder {
    pub fn new() -> Self {
        Self {
            name: DEFAULT_WORKFLOW_NAME.to_string(),
            layout: LayoutConfig::default(),
            provider: Box::new(TemplateRegistry::builtin()),
            notice_duration: DEFAULT_NOTICE_DURATION,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Replaces the built-in template table with another config source.
    pub fn with_config_provider(mut self, provider: Box<dyn ConfigProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_notice_duration(mut self, duration: Duration) -> Self {
        self.notice_duration = duration;
        self
    }

    pub fn build(self) -> GraphEditor {
        GraphEditor {
            name: self.name,
            version: CURRENT_VERSION,
            store: Default::default(),
            layout: self.layout,
            provider: self.provider,
            selection: Default::default(),
            drag: Default::default(),
            drops: Default::default(),
            notices: NoticeBoard::new(self.notice_duration),
        }
    }
}
