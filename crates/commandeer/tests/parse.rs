//! Option and argument parsing through the public entry point.

use commandeer::{
    program, CapturedOutput, Command, ErrorCode, InvalidArgumentError, MockEnv, Opt,
    OutputConfig, ParseOptions, ValueSource,
};
use serde_json::{json, Value};

/// A root that returns errors and records output.
fn harness(name: &str) -> (Command, CapturedOutput) {
    let (output, captured) = OutputConfig::capture();
    (
        program().name(name).configure_output(output).exit_override(),
        captured,
    )
}

fn user() -> ParseOptions {
    ParseOptions::user().env(MockEnv::new())
}

fn counter(_raw: &str, previous: Option<&Value>) -> anyhow::Result<Value> {
    Ok(json!(previous.and_then(Value::as_i64).unwrap_or(0) + 1))
}

fn collect(raw: &str, previous: Option<&Value>) -> anyhow::Result<Value> {
    let mut items = previous
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    items.push(json!(raw));
    Ok(Value::Array(items))
}

fn integer(raw: &str, _previous: Option<&Value>) -> anyhow::Result<Value> {
    raw.parse::<i64>()
        .map(Value::from)
        .map_err(|_| InvalidArgumentError::new("Not a number.").into())
}

// =============================================================================
// Flag grammar
// =============================================================================

#[test]
fn test_boolean_and_value_forms() {
    let (cmd, _) = harness("serve");
    let cmd = cmd
        .option("-q, --quiet", "no output")
        .unwrap()
        .option("-p, --port <number>", "port")
        .unwrap()
        .option("--host <name>", "host")
        .unwrap();

    let m = cmd.parse(["-q", "-p80", "--host=local"], user()).unwrap();
    assert_eq!(m.opts().get("quiet"), Some(&json!(true)));
    assert_eq!(m.opts().get("port"), Some(&json!("80")));
    assert_eq!(m.opts().get("host"), Some(&json!("local")));

    let m = cmd.parse(["--port", "-5"], user()).unwrap();
    assert_eq!(m.opts().get("port"), Some(&json!("-5")));
    assert!(!m.opts().contains("quiet"));
}

#[test]
fn test_short_flag_cluster() {
    let (cmd, _) = harness("tar");
    let cmd = cmd
        .option("-x", "extract")
        .unwrap()
        .option("-v", "verbose")
        .unwrap()
        .option("-f <file>", "archive")
        .unwrap();

    let m = cmd.parse(["-xvfarchive.tar"], user()).unwrap();
    assert_eq!(m.opts().get("x"), Some(&json!(true)));
    assert_eq!(m.opts().get("v"), Some(&json!(true)));
    assert_eq!(m.opts().get("f"), Some(&json!("archive.tar")));
}

#[test]
fn test_optional_value_with_preset() {
    let (cmd, _) = harness("pizza");
    let cmd = cmd
        .add_option(Opt::new("-c, --cheese [type]", "add cheese").preset("mozzarella"))
        .unwrap()
        .add_option(Opt::new("-s, --sauce [kind]", "add sauce"))
        .unwrap();

    let m = cmd.parse(["--cheese", "--sauce"], user()).unwrap();
    assert_eq!(m.opts().get("cheese"), Some(&json!("mozzarella")));
    assert_eq!(m.opts().get("sauce"), Some(&json!(true)));

    let m = cmd.parse(["-cblue", "--sauce", "pesto"], user()).unwrap();
    assert_eq!(m.opts().get("cheese"), Some(&json!("blue")));
    assert_eq!(m.opts().get("sauce"), Some(&json!("pesto")));
}

#[test]
fn test_optional_value_split_when_combining_is_off() {
    let (cmd, _) = harness("pizza");
    let cmd = cmd
        .combine_flag_and_optional_value(false)
        .option("-c, --cheese [type]", "add cheese")
        .unwrap()
        .option("-b", "bacon")
        .unwrap();

    let m = cmd.parse(["-cb"], user()).unwrap();
    assert_eq!(m.opts().get("cheese"), Some(&json!(true)));
    assert_eq!(m.opts().get("b"), Some(&json!(true)));
}

#[test]
fn test_missing_required_value() {
    let (cmd, captured) = harness("serve");
    let cmd = cmd.option("-p, --port <number>", "port").unwrap();

    let err = cmd.parse(["--port"], user()).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::OptionMissingArgument));
    assert_eq!(
        captured.err(),
        "error: option '-p, --port <number>' argument missing\n"
    );
}

#[test]
fn test_variadic_option_stops_at_next_flag() {
    let (cmd, _) = harness("lint");
    let cmd = cmd
        .option("-n, --number <values...>", "numbers")
        .unwrap()
        .option("-x", "extra")
        .unwrap()
        .argument("[file]", "")
        .unwrap();

    let m = cmd.parse(["-n", "1", "2", "3", "-x", "main.rs"], user()).unwrap();
    assert_eq!(m.opts().get("number"), Some(&json!(["1", "2", "3"])));
    assert_eq!(m.root().arg(0), Some(&json!("main.rs")));

    let m = cmd.parse(["-n", "1", "-n", "2"], user()).unwrap();
    assert_eq!(m.opts().get("number"), Some(&json!(["1", "2"])));
}

#[test]
fn test_variadic_option_replaces_default() {
    let (cmd, _) = harness("lint");
    let cmd = cmd
        .add_option(Opt::new("--rule <names...>", "rules").default(json!(["all"])))
        .unwrap();

    let m = cmd.parse(["--rule", "a", "b"], user()).unwrap();
    assert_eq!(m.opts().get("rule"), Some(&json!(["a", "b"])));
}

#[test]
fn test_terminator_ends_options() {
    let (cmd, _) = harness("run");
    let cmd = cmd
        .option("-d", "debug")
        .unwrap()
        .argument("[args...]", "")
        .unwrap();

    let m = cmd.parse(["-d", "--", "-d", "x"], user()).unwrap();
    assert_eq!(m.opts().get("d"), Some(&json!(true)));
    assert_eq!(m.root().arg(0), Some(&json!(["-d", "x"])));
}

// =============================================================================
// Coercion
// =============================================================================

#[test]
fn test_coercion_threads_previous_value() {
    let (cmd, _) = harness("build");
    let cmd = cmd
        .add_option(Opt::new("-i, --include <dir>", "include dir").coerce(collect))
        .unwrap();

    let m = cmd.parse(["-i", "1", "-i", "2"], user()).unwrap();
    assert_eq!(m.opts().get("include"), Some(&json!(["1", "2"])));
}

#[test]
fn test_boolean_coercion_counts_occurrences() {
    let (cmd, _) = harness("tool");
    let cmd = cmd
        .add_option(Opt::new("-v, --verbose", "verbosity").default(0).coerce(counter))
        .unwrap();

    let m = cmd.parse(["-v", "-v", "-v"], user()).unwrap();
    assert_eq!(m.opts().get("verbose"), Some(&json!(3)));

    let m = cmd.parse(["-vv"], user()).unwrap();
    assert_eq!(m.opts().get("verbose"), Some(&json!(2)));

    let m = cmd.parse(Vec::<String>::new(), user()).unwrap();
    assert_eq!(m.opts().get("verbose"), Some(&json!(0)));
    assert_eq!(m.opts().source("verbose"), Some(ValueSource::Default));
}

#[test]
fn test_repeated_boolean_stays_true() {
    let (cmd, _) = harness("tool");
    let cmd = cmd.option("-d, --debug", "debug").unwrap();

    let m = cmd.parse(["-d", "-d"], user()).unwrap();
    assert_eq!(m.opts().get("debug"), Some(&json!(true)));
}

#[test]
fn test_invalid_coercion_is_prefixed() {
    let (cmd, captured) = harness("serve");
    let cmd = cmd
        .add_option(Opt::new("-p, --port <n>", "port").coerce(integer))
        .unwrap();

    let m = cmd.parse(["-p", "8080"], user()).unwrap();
    assert_eq!(m.opts().get_as::<i64>("port"), Some(8080));

    let err = cmd.parse(["-p", "x"], user()).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidArgument));
    assert_eq!(
        captured.err(),
        "error: option '-p, --port <n>' argument 'x' is invalid. Not a number.\n"
    );
}

#[test]
fn test_other_coercion_errors_pass_through() {
    let (cmd, captured) = harness("serve");
    let cmd = cmd
        .add_option(
            Opt::new("--config <path>", "config")
                .coerce(|_, _| Err(anyhow::anyhow!("config store unavailable"))),
        )
        .unwrap();

    let err = cmd.parse(["--config", "a.toml"], user()).unwrap_err();
    assert_eq!(err.code(), None);
    assert_eq!(err.to_string(), "config store unavailable");
    assert_eq!(captured.err(), "");
}

#[test]
fn test_choices() {
    let (cmd, captured) = harness("order");
    let cmd = cmd
        .add_option(Opt::new("--size <size>", "drink size").choices(["small", "medium", "large"]))
        .unwrap();

    let m = cmd.parse(["--size", "medium"], user()).unwrap();
    assert_eq!(m.opts().get("size"), Some(&json!("medium")));

    let err = cmd.parse(["--size", "huge"], user()).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidArgument));
    assert_eq!(
        captured.err(),
        "error: option '--size <size>' argument 'huge' is invalid. Allowed choices are small, medium, large.\n"
    );
}

// =============================================================================
// Negation
// =============================================================================

#[test]
fn test_negatable_pair_last_wins() {
    let (cmd, _) = harness("tool");
    let cmd = cmd
        .option("--foo", "enable foo")
        .unwrap()
        .option("--no-foo", "disable foo")
        .unwrap();

    let m = cmd.parse(Vec::<String>::new(), user()).unwrap();
    assert!(!m.opts().contains("foo"));

    let m = cmd.parse(["--foo", "--no-foo"], user()).unwrap();
    assert_eq!(m.opts().get("foo"), Some(&json!(false)));

    let m = cmd.parse(["--no-foo", "--foo"], user()).unwrap();
    assert_eq!(m.opts().get("foo"), Some(&json!(true)));
}

#[test]
fn test_negatable_pair_declared_negative_first() {
    let (cmd, _) = harness("tool");
    let cmd = cmd
        .option("--no-foo", "disable foo")
        .unwrap()
        .option("--foo", "enable foo")
        .unwrap();

    // No positive flag precedes --no-foo, so it seeds the default.
    let m = cmd.parse(Vec::<String>::new(), user()).unwrap();
    assert_eq!(m.opts().get("foo"), Some(&json!(true)));
    assert_eq!(m.opts().source("foo"), Some(ValueSource::Default));

    let m = cmd.parse(["--foo"], user()).unwrap();
    assert_eq!(m.opts().get("foo"), Some(&json!(true)));

    let m = cmd.parse(["--no-foo"], user()).unwrap();
    assert_eq!(m.opts().get("foo"), Some(&json!(false)));

    let m = cmd.parse(["--foo", "--no-foo"], user()).unwrap();
    assert_eq!(m.opts().get("foo"), Some(&json!(false)));

    let m = cmd.parse(["--no-foo", "--foo"], user()).unwrap();
    assert_eq!(m.opts().get("foo"), Some(&json!(true)));
}

#[test]
fn test_lone_negated_flag_defaults_true() {
    let (cmd, _) = harness("pizza");
    let cmd = cmd.option("--no-sauce", "remove sauce").unwrap();

    let m = cmd.parse(Vec::<String>::new(), user()).unwrap();
    assert_eq!(m.opts().get("sauce"), Some(&json!(true)));

    let m = cmd.parse(["--no-sauce"], user()).unwrap();
    assert_eq!(m.opts().get("sauce"), Some(&json!(false)));
}

// =============================================================================
// Environment, implications, conflicts, mandatory
// =============================================================================

#[test]
fn test_env_precedence() {
    let (cmd, _) = harness("serve");
    let cmd = cmd
        .add_option(
            Opt::new("-p, --port <number>", "port")
                .default("80")
                .env("PORT"),
        )
        .unwrap();
    let env = MockEnv::new().with_var("PORT", "8080");

    let m = cmd
        .parse(Vec::<String>::new(), ParseOptions::user().env(env.clone()))
        .unwrap();
    assert_eq!(m.opts().get("port"), Some(&json!("8080")));
    assert_eq!(m.opts().source("port"), Some(ValueSource::Env));

    let m = cmd
        .parse(["-p", "9000"], ParseOptions::user().env(env))
        .unwrap();
    assert_eq!(m.opts().get("port"), Some(&json!("9000")));
    assert_eq!(m.opts().source("port"), Some(ValueSource::Cli));
}

#[test]
fn test_env_does_not_replace_programmatic_value() {
    let (cmd, _) = harness("serve");
    let cmd = cmd
        .add_option(Opt::new("--region <name>", "region").env("REGION"))
        .unwrap()
        .set_option_value("region", "eu");

    let m = cmd
        .parse(
            Vec::<String>::new(),
            ParseOptions::user().env(MockEnv::new().with_var("REGION", "us")),
        )
        .unwrap();
    assert_eq!(m.opts().get("region"), Some(&json!("eu")));
    assert_eq!(m.opts().source("region"), None);
}

#[test]
fn test_env_replaces_config_value() {
    let (cmd, _) = harness("serve");
    let cmd = cmd
        .add_option(Opt::new("--region <name>", "region").env("REGION"))
        .unwrap()
        .set_option_value_with_source("region", "eu", ValueSource::Config);

    let m = cmd
        .parse(
            Vec::<String>::new(),
            ParseOptions::user().env(MockEnv::new().with_var("REGION", "us")),
        )
        .unwrap();
    assert_eq!(m.opts().get("region"), Some(&json!("us")));
}

#[test]
fn test_env_for_boolean_flag() {
    let (cmd, _) = harness("serve");
    let cmd = cmd
        .add_option(Opt::new("--debug", "debug").env("DEBUG"))
        .unwrap();

    let m = cmd
        .parse(
            Vec::<String>::new(),
            ParseOptions::user().env(MockEnv::new().with_var("DEBUG", "anything")),
        )
        .unwrap();
    assert_eq!(m.opts().get("debug"), Some(&json!(true)));
    assert_eq!(m.opts().source("debug"), Some(ValueSource::Env));
}

#[test]
fn test_invalid_env_value_names_variable() {
    let (cmd, captured) = harness("serve");
    let cmd = cmd
        .add_option(Opt::new("--port <n>", "port").env("PORT").coerce(integer))
        .unwrap();

    let err = cmd
        .parse(
            Vec::<String>::new(),
            ParseOptions::user().env(MockEnv::new().with_var("PORT", "abc")),
        )
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidArgument));
    assert_eq!(
        captured.err(),
        "error: option '--port <n>' value 'abc' from env 'PORT' is invalid. Not a number.\n"
    );
}

#[test]
fn test_implied_values() {
    let (cmd, _) = harness("deploy");
    let cmd = cmd
        .add_option(Opt::new("--quiet", "quiet").implies([("logLevel", json!("off"))]))
        .unwrap()
        .add_option(Opt::new("--log-level <level>", "level").default("info"))
        .unwrap();

    let m = cmd.parse(["--quiet"], user()).unwrap();
    assert_eq!(m.opts().get("logLevel"), Some(&json!("off")));
    assert_eq!(m.opts().source("logLevel"), Some(ValueSource::Implied));

    let m = cmd.parse(["--quiet", "--log-level", "warn"], user()).unwrap();
    assert_eq!(m.opts().get("logLevel"), Some(&json!("warn")));

    let m = cmd.parse(Vec::<String>::new(), user()).unwrap();
    assert_eq!(m.opts().get("logLevel"), Some(&json!("info")));
}

#[test]
fn test_conflicting_options() {
    let (cmd, captured) = harness("cup");
    let cmd = cmd
        .add_option(Opt::new("--ying", "ying").conflicts(["yang"]))
        .unwrap()
        .option("--yang", "yang")
        .unwrap();

    assert!(cmd.parse(["--ying"], user()).is_ok());

    let err = cmd.parse(["--ying", "--yang"], user()).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::ConflictingOption));
    assert_eq!(
        captured.err(),
        "error: option '--ying' cannot be used with option '--yang'\n"
    );
}

#[test]
fn test_conflict_reports_environment_variable() {
    let (cmd, captured) = harness("cup");
    let cmd = cmd
        .add_option(Opt::new("--ying", "ying").conflicts(["yang"]))
        .unwrap()
        .add_option(Opt::new("--yang", "yang").env("YANG"))
        .unwrap();

    let err = cmd
        .parse(
            ["--ying"],
            ParseOptions::user().env(MockEnv::new().with_var("YANG", "1")),
        )
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::ConflictingOption));
    assert_eq!(
        captured.err(),
        "error: option '--ying' cannot be used with environment variable 'YANG'\n"
    );
}

#[test]
fn test_mandatory_option() {
    let (cmd, captured) = harness("db");
    let cmd = cmd
        .required_option("-u, --user <name>", "database user")
        .unwrap();

    let err = cmd.parse(Vec::<String>::new(), user()).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::MissingMandatoryOptionValue));
    assert_eq!(
        captured.err(),
        "error: required option '-u, --user <name>' not specified\n"
    );

    let m = cmd.parse(["-u", "admin"], user()).unwrap();
    assert_eq!(m.opts().get("user"), Some(&json!("admin")));
}

// =============================================================================
// Arguments
// =============================================================================

#[test]
fn test_argument_binding() {
    let (cmd, _) = harness("cp");
    let cmd = cmd
        .argument("<source>", "")
        .unwrap()
        .add_argument(commandeer::Argument::new("[dest]").default("."))
        .unwrap();

    let m = cmd.parse(["a.txt"], user()).unwrap();
    assert_eq!(m.root().args(), &[json!("a.txt"), json!(".")]);

    let m = cmd.parse(["a.txt", "b.txt"], user()).unwrap();
    assert_eq!(m.root().args(), &[json!("a.txt"), json!("b.txt")]);
}

#[test]
fn test_missing_required_argument() {
    let (cmd, captured) = harness("cp");
    let cmd = cmd.argument("<source>", "").unwrap();

    let err = cmd.parse(Vec::<String>::new(), user()).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::MissingArgument));
    assert_eq!(captured.err(), "error: missing required argument 'source'\n");
}

#[test]
fn test_excess_arguments() {
    let (cmd, captured) = harness("cp");
    let cmd = cmd.argument("<source>", "").unwrap();

    // Allowed by default.
    let m = cmd.parse(["a", "b"], user()).unwrap();
    assert_eq!(m.root().raw_args(), ["a", "b"]);

    let cmd = cmd.allow_excess_arguments(false);
    let err = cmd.parse(["a", "b"], user()).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::ExcessArguments));
    assert_eq!(
        captured.err(),
        "error: too many arguments. Expected 1 argument but got 2.\n"
    );
}

#[test]
fn test_variadic_argument_coercion_accumulates() {
    let (cmd, _) = harness("sum");
    let cmd = cmd
        .add_argument(
            commandeer::Argument::new("<numbers...>").coerce(|raw, previous| {
                let n: i64 = raw
                    .parse()
                    .map_err(|_| InvalidArgumentError::new("Not a number."))?;
                Ok(json!(previous.and_then(Value::as_i64).unwrap_or(0) + n))
            }),
        )
        .unwrap();

    let m = cmd.parse(["1", "2", "3"], user()).unwrap();
    assert_eq!(m.root().arg(0), Some(&json!(6)));
}

#[test]
fn test_argument_choices() {
    let (cmd, captured) = harness("paint");
    let cmd = cmd
        .add_argument(commandeer::Argument::new("<color>").choices(["red", "blue"]))
        .unwrap();

    let err = cmd.parse(["green"], user()).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidArgument));
    assert_eq!(
        captured.err(),
        "error: command-argument value 'green' is invalid for argument 'color'. Allowed choices are red, blue.\n"
    );
}

// =============================================================================
// Unknown options and argv layout
// =============================================================================

#[test]
fn test_unknown_option_with_suggestion() {
    let (cmd, captured) = harness("tool");
    let cmd = cmd.option("--verbose", "").unwrap();

    let err = cmd.parse(["--verbos"], user()).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::UnknownOption));
    assert_eq!(
        captured.err(),
        "error: unknown option '--verbos'\n(Did you mean --verbose?)\n"
    );
}

#[test]
fn test_suggestions_can_be_disabled() {
    let (cmd, captured) = harness("tool");
    let cmd = cmd
        .show_suggestion_after_error(false)
        .option("--verbose", "")
        .unwrap();

    cmd.parse(["--verbos"], user()).unwrap_err();
    assert_eq!(captured.err(), "error: unknown option '--verbos'\n");
}

#[test]
fn test_allow_unknown_option_keeps_tokens() {
    let (cmd, _) = harness("wrap");
    let cmd = cmd.allow_unknown_option(true).argument("[rest...]", "").unwrap();

    let m = cmd.parse(["--color", "x"], user()).unwrap();
    assert_eq!(m.root().raw_args(), ["--color", "x"]);
}

#[test]
fn test_program_argv_origin_skips_program_path() {
    let cmd = program()
        .exit_override()
        .option("-d", "")
        .unwrap();

    let m = cmd
        .parse(["/usr/bin/tool", "-d"], ParseOptions::new().env(MockEnv::new()))
        .unwrap();
    assert_eq!(m.root().name(), "tool");
    assert_eq!(m.opts().get("d"), Some(&json!(true)));
}

#[test]
fn test_interpreter_argv_origin() {
    let cmd = program().exit_override().argument("[file]", "").unwrap();

    let m = cmd
        .parse(
            ["node", "/srv/scripts/build.js", "main"],
            ParseOptions::new()
                .origin(commandeer::ArgvOrigin::Interpreter)
                .env(MockEnv::new()),
        )
        .unwrap();
    assert_eq!(m.root().name(), "build");
    assert_eq!(m.root().arg(0), Some(&json!("main")));
}

#[test]
fn test_options_deserialize_into_struct() {
    #[derive(serde::Deserialize)]
    struct Serve {
        port: String,
        dry_run_mode: Option<bool>,
        #[serde(rename = "logLevel")]
        log_level: String,
    }

    let (cmd, _) = harness("serve");
    let cmd = cmd
        .option("--port <n>", "")
        .unwrap()
        .add_option(Opt::new("--log-level <level>", "").default("info"))
        .unwrap();

    let m = cmd.parse(["--port", "1"], user()).unwrap();
    let serve: Serve = m.opts().to_struct().unwrap();
    assert_eq!(serve.port, "1");
    assert_eq!(serve.log_level, "info");
    assert!(serve.dry_run_mode.is_none());
}

#[test]
fn test_mutual_implication_terminates() {
    let (cmd, _) = harness("cup");
    let cmd = cmd
        .add_option(Opt::new("--ying", "").implies([("yang", true)]))
        .unwrap()
        .add_option(Opt::new("--yang", "").implies([("ying", true)]))
        .unwrap();

    let m = cmd.parse(["--ying"], user()).unwrap();
    assert_eq!(m.opts().get("ying"), Some(&json!(true)));
    assert_eq!(m.opts().get("yang"), Some(&json!(true)));
    assert_eq!(m.opts().source("yang"), Some(ValueSource::Implied));
}

#[test]
fn test_required_argument_with_choices() {
    let (cmd, _) = harness("paint");
    let cmd = cmd
        .add_argument(commandeer::Argument::new("<shade>").choices(["red", "blue"]))
        .unwrap();

    let err = cmd.parse(["orange"], user()).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidArgument));

    let m = cmd.parse(["red"], user()).unwrap();
    assert_eq!(m.root().arg(0), Some(&json!("red")));
}
