//! The `install` subcommand of `pm`, run as its own program.

use anyhow::Result;
use commandeer::program;

fn main() -> Result<()> {
    program()
        .name("pm-install")
        .argument("<pkg...>", "packages to install")?
        .option("-S, --save", "save to dependencies")?
        .action(|inv| {
            let packages: Vec<String> = serde_json::from_value(inv.arg(0).cloned().unwrap_or_default())?;
            let saved = if inv.opts().get_as::<bool>("save").unwrap_or(false) {
                " (saved)"
            } else {
                ""
            };
            println!("installing {}{saved}", packages.join(", "));
            Ok(())
        })
        .parse_process_args()?;
    Ok(())
}
