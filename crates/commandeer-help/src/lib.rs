//! # commandeer-help - Help text rendering
//!
//! Renders help for one command from plain structured data. The parser crate
//! extracts a [`HelpData`] from its command tree; this crate only lays it
//! out: usage line, description, then `Arguments`, `Options`,
//! `Global Options` and `Commands` sections with aligned, wrapped
//! descriptions.
//!
//! ## Quick Start
//!
//! ```rust
//! use commandeer_help::{render_help, HelpData, HelpEntry, RenderConfig};
//!
//! let data = HelpData {
//!     usage: "pm [options]".into(),
//!     options: vec![HelpEntry::new("-h, --help", "display help for command")],
//!     ..Default::default()
//! };
//! let text = render_help(&data, &RenderConfig::default().width(80)).unwrap();
//! assert!(text.starts_with("Usage: pm [options]"));
//! ```
//!
//! The layout is a minijinja template; pass [`RenderConfig::template`] to
//! replace it. Templates see `usage`, `description` and `sections` (each with
//! `title` and `items` of `term`, `padding`, `description`).

mod data;
mod render;
pub mod wrap;

pub use data::{HelpData, HelpEntry};
pub use render::{render_help, terminal_width, HelpError, RenderConfig, DEFAULT_WIDTH};
