//! GitHub Actions workflow annotations
//!
//! Check failures and fatal build errors are echoed as `::error` /
//! `::warning` commands so they surface on the pull request.

use std::path::Path;

use berth::application::check::{CheckItem, CheckStatus};

/// True when running under GitHub Actions.
pub fn in_github_actions() -> bool {
    std::env::var_os("GITHUB_ACTIONS").is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Warning,
    Error,
}

impl AnnotationLevel {
    fn command(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// One workflow command line
#[derive(Debug, Clone)]
pub struct Annotation {
    level: AnnotationLevel,
    message: String,
    file: Option<String>,
    title: Option<String>,
}

impl Annotation {
    pub fn new(level: AnnotationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            file: None,
            title: None,
        }
    }

    /// Passing check items produce nothing.
    pub fn for_check_item(item: &CheckItem) -> Option<Self> {
        let level = match item.status {
            CheckStatus::Pass => return None,
            CheckStatus::Warning => AnnotationLevel::Warning,
            CheckStatus::Error => AnnotationLevel::Error,
        };
        Some(Self::new(level, &item.message).with_title(format!("berth check: {}", item.name)))
    }

    pub fn with_file(mut self, file: &Path) -> Self {
        self.file = Some(file.to_string_lossy().into_owned());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn render(&self) -> String {
        let props: Vec<String> = [("file", &self.file), ("title", &self.title)]
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| format!("{}={}", key, escape_property(v))))
            .collect();
        let props = if props.is_empty() {
            String::new()
        } else {
            format!(" {}", props.join(","))
        };
        format!("::{}{}::{}", self.level.command(), props, escape_data(&self.message))
    }
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

// Properties additionally reserve `:` and `,`.
fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
