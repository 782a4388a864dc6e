//! `pm`: lists dependencies from a JSON manifest and hands `install` off to
//! the separate `pm-install` program.
//!
//! ```text
//! pm [-d] [-m <path>] list [-l]
//! pm install <pkg...> [-S]     # runs pm-install from the same directory
//! ```
//!
//! Set `RUST_LOG=commandeer=debug` to watch the parser resolve commands.

use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result};
use commandeer::{program, Command, DeclarationError, HookEvent, Invocation, Opt};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

fn load_manifest(path: &str) -> Result<Manifest> {
    let text = fs::read_to_string(path).with_context(|| format!("cannot read manifest '{path}'"))?;
    serde_json::from_str(&text).with_context(|| format!("manifest '{path}' is not valid JSON"))
}

fn list(inv: &Invocation) -> Result<()> {
    let opts = inv.opts_with_globals();
    let path: String = opts.get_as("manifest").unwrap_or_else(|| "pm.json".to_string());
    let long = opts.get_as::<bool>("long").unwrap_or(false);

    let manifest = load_manifest(&path)?;
    if manifest.dependencies.is_empty() {
        return Err(inv.error(format!("error: no dependencies in '{path}'")));
    }
    for (name, version) in &manifest.dependencies {
        if long {
            println!("{name}@{version}");
        } else {
            println!("{name}");
        }
    }
    Ok(())
}

fn cli() -> Result<Command, DeclarationError> {
    program()
        .name("pm")
        .description("a tiny package manager")
        .version(env!("CARGO_PKG_VERSION"))?
        .show_help_after_error_message("(add --help for additional information)")
        .option("-d, --debug", "trace command resolution")?
        .add_option(
            Opt::new("-m, --manifest <path>", "manifest file")
                .default("pm.json")
                .env("PM_MANIFEST"),
        )?
        .subcommand(
            Command::new("list")
                .alias("ls")
                .description("list dependencies")
                .option("-l, --long", "show versions")?
                .action(list),
        )?
        .subcommand(
            Command::new("install")
                .executable(true)
                .description("install packages")
                .argument("<pkg...>", "packages to install")?,
        )
        .map(|pm| {
            pm.hook(HookEvent::PreAction, |inv| {
                if inv.opts().get_as::<bool>("debug").unwrap_or(false) {
                    tracing::info!(command = inv.action_command().name(), "running action");
                }
                Ok(())
            })
        })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    cli()?.parse_process_args()?;
    Ok(())
}
