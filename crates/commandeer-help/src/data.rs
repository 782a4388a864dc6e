//! Structured help input.

use serde::Serialize;

/// One row of a help section: a term (flags, argument or command usage) and
/// its description, already annotated with defaults, choices and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HelpEntry {
    pub term: String,
    pub description: String,
}

impl HelpEntry {
    pub fn new(term: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            description: description.into(),
        }
    }
}

/// Everything the renderer needs to print help for one command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HelpData {
    /// Usage line without the `Usage:` prefix, e.g. `pm install [options] <pkg>`.
    pub usage: String,
    pub description: String,
    pub arguments: Vec<HelpEntry>,
    pub options: Vec<HelpEntry>,
    /// Options inherited from ancestors, shown only when enabled.
    pub global_options: Vec<HelpEntry>,
    pub commands: Vec<HelpEntry>,
}

impl HelpData {
    /// Widest term across every section, in terminal columns.
    pub fn term_width(&self) -> usize {
        self.arguments
            .iter()
            .chain(&self.options)
            .chain(&self.global_options)
            .chain(&self.commands)
            .map(|entry| crate::wrap::display_width(&entry.term))
            .max()
            .unwrap_or(0)
    }
}

/// Layout data handed to the template.
#[derive(Serialize)]
pub(crate) struct Layout {
    pub usage: String,
    pub description: String,
    pub sections: Vec<Section>,
}

#[derive(Serialize)]
pub(crate) struct Section {
    pub title: &'static str,
    pub items: Vec<Item>,
}

#[derive(Serialize)]
pub(crate) struct Item {
    pub term: String,
    pub padding: String,
    pub description: String,
}
