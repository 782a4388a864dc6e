//! Help rendering functions.

use minijinja::Environment;

use crate::data::{HelpData, Item, Layout, Section};
use crate::wrap::{display_width, wrap};

/// Gap between the term column and the description column.
const ITEM_SEPARATOR: usize = 2;
/// Indent of every section item.
const ITEM_INDENT: usize = 2;
/// Width used when the terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 80;

const DEFAULT_TEMPLATE: &str = "Usage: {{ usage }}
{%- if description %}

{{ description }}
{%- endif %}
{%- for section in sections %}

{{ section.title }}:
{%- for item in section.items %}
  {{ item.term }}{{ item.padding }}{{ item.description }}
{%- endfor %}
{%- endfor %}";

/// Errors raised while rendering help.
#[derive(Debug, thiserror::Error)]
pub enum HelpError {
    #[error("help template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Configuration for help rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Total width to wrap to. If None, the terminal width (or 80).
    pub width: Option<usize>,
    /// Custom template string. If None, uses the default template.
    pub template: Option<String>,
}

impl RenderConfig {
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }
}

/// Width of the attached terminal, if any.
pub fn terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(terminal_size::Width(w), _)| w as usize)
}

/// Renders help text, ending with a newline.
pub fn render_help(data: &HelpData, config: &RenderConfig) -> Result<String, HelpError> {
    let width = config
        .width
        .or_else(terminal_width)
        .unwrap_or(DEFAULT_WIDTH);
    let template = config.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);

    let layout = layout(data, width);

    let mut env = Environment::new();
    env.add_template("help.txt", template)?;
    let mut out = env.get_template("help.txt")?.render(&layout)?;
    out.push('\n');
    Ok(out)
}

fn layout(data: &HelpData, width: usize) -> Layout {
    let term_width = data.term_width();
    let sections = [
        ("Arguments", &data.arguments),
        ("Options", &data.options),
        ("Global Options", &data.global_options),
        ("Commands", &data.commands),
    ]
    .into_iter()
    .filter(|(_, entries)| !entries.is_empty())
    .map(|(title, entries)| Section {
        title,
        items: entries
            .iter()
            .map(|entry| {
                let (padding, description) = if entry.description.is_empty() {
                    (String::new(), String::new())
                } else {
                    let pad = term_width - display_width(&entry.term) + ITEM_SEPARATOR;
                    let indent = ITEM_INDENT + term_width + ITEM_SEPARATOR;
                    (" ".repeat(pad), wrap(&entry.description, width, indent))
                };
                Item {
                    term: entry.term.clone(),
                    padding,
                    description,
                }
            })
            .collect(),
    })
    .collect();

    Layout {
        usage: data.usage.clone(),
        description: wrap(&data.description, width, 0),
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HelpEntry;

    fn sample() -> HelpData {
        HelpData {
            usage: "pm [options] [command]".into(),
            description: "package manager".into(),
            options: vec![
                HelpEntry::new("-V, --version", "output the version number"),
                HelpEntry::new("-h, --help", "display help for command"),
            ],
            commands: vec![
                HelpEntry::new("install <pkg>", "install a package"),
                HelpEntry::new("help [command]", "display help for command"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_render_sections_aligned() {
        let out = render_help(&sample(), &RenderConfig::default().width(80)).unwrap();
        let expected = "\
Usage: pm [options] [command]

package manager

Options:
  -V, --version   output the version number
  -h, --help      display help for command

Commands:
  install <pkg>   install a package
  help [command]  display help for command
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_render_minimal() {
        let data = HelpData {
            usage: "tool".into(),
            ..Default::default()
        };
        let out = render_help(&data, &RenderConfig::default().width(80)).unwrap();
        assert_eq!(out, "Usage: tool\n");
    }

    #[test]
    fn test_entry_without_description_has_no_padding() {
        let data = HelpData {
            usage: "tool [options]".into(),
            options: vec![HelpEntry::new("--quiet", "")],
            ..Default::default()
        };
        let out = render_help(&data, &RenderConfig::default().width(80)).unwrap();
        assert_eq!(out, "Usage: tool [options]\n\nOptions:\n  --quiet\n");
    }

    #[test]
    fn test_custom_template() {
        let config = RenderConfig::default()
            .width(80)
            .template("{{ usage }}|{{ sections | length }}");
        let out = render_help(&sample(), &config).unwrap();
        assert_eq!(out, "pm [options] [command]|2\n");
    }

    #[test]
    fn test_invalid_template_is_error() {
        let config = RenderConfig::default().template("{% for %}");
        assert!(render_help(&sample(), &config).is_err());
    }
}
