//! End-to-end layout checks for rendered help.

use commandeer_help::{render_help, HelpData, HelpEntry, RenderConfig};

#[test]
fn test_arguments_section_precedes_options() {
    let data = HelpData {
        usage: "pm install [options] <pkg>".into(),
        arguments: vec![HelpEntry::new("pkg", "package to install")],
        options: vec![HelpEntry::new("-h, --help", "display help for command")],
        ..Default::default()
    };

    let out = render_help(&data, &RenderConfig::default().width(80)).unwrap();

    let args_at = out.find("Arguments:").unwrap();
    let opts_at = out.find("Options:").unwrap();
    assert!(args_at < opts_at);
    assert!(out.contains("  pkg         package to install\n"));
}

#[test]
fn test_global_options_section() {
    let data = HelpData {
        usage: "pm list".into(),
        global_options: vec![HelpEntry::new("-d, --debug", "enable debugging")],
        ..Default::default()
    };

    let out = render_help(&data, &RenderConfig::default().width(80)).unwrap();

    assert!(out.contains("Global Options:\n  -d, --debug  enable debugging\n"));
}

#[test]
fn test_long_descriptions_wrap_under_description_column() {
    let data = HelpData {
        usage: "pm".into(),
        options: vec![HelpEntry::new(
            "--registry <url>",
            "registry to fetch packages from when resolving dependencies for every workspace member",
        )],
        ..Default::default()
    };

    let out = render_help(&data, &RenderConfig::default().width(60)).unwrap();
    let lines: Vec<&str> = out.lines().collect();

    // "  --registry <url>  " is 20 columns
    let continuation = lines
        .iter()
        .find(|line| line.starts_with("                    ") && !line.trim().is_empty());
    assert!(continuation.is_some(), "no continuation line in:\n{out}");
    assert!(lines.iter().all(|line| line.len() <= 60));
}
