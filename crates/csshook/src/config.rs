/// Default prefix for generated class names.
pub const DEFAULT_CLASS_PREFIX: &str = "_csshook-";

/// Configuration for a style generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleConfig {
    /// Prefix prepended to every allocated class id.
    pub class_prefix: String,
    /// Name shown in log events for this generator.
    pub label: Option<String>,
}

impl StyleConfig {
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub(crate) fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("style")
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            class_prefix: DEFAULT_CLASS_PREFIX.to_string(),
            label: None,
        }
    }
}
