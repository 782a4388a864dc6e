//! Component construction hooks.
//!
//! Commands create their subcommands, options, arguments and help formatter
//! through a [`ComponentFactory`]. Supply your own to give every option a
//! house style or to swap the help layout; subcommands inherit the factory
//! of the command they are attached to.

use commandeer_help::{render_help, HelpData, HelpError, RenderConfig};

use crate::{Argument, Command, Opt};
use std::sync::Arc;

/// Turns structured help data into text.
pub trait HelpFormatter: Send + Sync {
    /// `width` is the wrap width requested by the output configuration, if any.
    fn format_help(&self, data: &HelpData, width: Option<usize>) -> Result<String, HelpError>;
}

/// The default formatter: `commandeer-help`'s template layout.
#[derive(Debug, Clone, Default)]
pub struct TemplateHelp {
    config: RenderConfig,
}

impl TemplateHelp {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }
}

impl HelpFormatter for TemplateHelp {
    fn format_help(&self, data: &HelpData, width: Option<usize>) -> Result<String, HelpError> {
        let mut config = self.config.clone();
        if let Some(width) = width {
            config.width = Some(width);
        }
        render_help(data, &config)
    }
}

/// Factory for the components a command creates on the caller's behalf.
pub trait ComponentFactory: Send + Sync {
    fn create_command(&self, name: &str) -> Command {
        Command::new(name)
    }

    fn create_option(&self, flags: &str, description: &str) -> Opt {
        Opt::new(flags, description)
    }

    fn create_argument(&self, spec: &str, description: &str) -> Argument {
        Argument::new(spec).description(description)
    }

    fn create_help(&self) -> Arc<dyn HelpFormatter> {
        Arc::new(TemplateHelp::default())
    }
}

/// Creates plain components.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFactory;

impl ComponentFactory for DefaultFactory {}
