//! ts2rs command line.
//!
//! ```bash
//! ts2rs -i ./src/types.ts -t User -t Order -o ./generated/types.rs
//! ts2rs -i ./api.d.ts --strict --config ./ts2rs.json
//! ```
//!
//! The optional `--config` file is a JSON document with the same shape as
//! the library options (custom type mappings, header/footer text, extra
//! type annotations); command-line flags win over config values.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use ts2rs::{convert, ConvertOptions};

/// CLI arguments for the ts2rs binary.
#[derive(Parser, Debug)]
#[command(
    name = "ts2rs",
    version,
    about = "Generate serde-ready Rust types from TypeScript declarations"
)]
struct CliArgs {
    /// Entry TypeScript module.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: PathBuf,

    /// Root type name to convert; repeatable. Defaults to every exported
    /// declaration of the entry module.
    #[arg(short = 't', long = "type", value_name = "NAME")]
    type_names: Vec<String>,

    /// Output file; prints to stdout when omitted.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to tsconfig.json for module resolution hints.
    #[arg(short = 'p', long = "project", value_name = "FILE")]
    project: Option<PathBuf>,

    /// JSON config file with mappings, header/footer, and annotations.
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fail on any type that would fall back to serde_json::Value.
    #[arg(long)]
    strict: bool,
}

fn build_options(args: &CliArgs) -> Result<ConvertOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file '{}'", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config file '{}'", path.display()))?
        }
        None => ConvertOptions::default(),
    };
    options.entry_file = args.input.clone();
    if !args.type_names.is_empty() {
        options.type_names = args.type_names.clone();
    }
    if args.output.is_some() {
        options.output_path = args.output.clone();
    }
    if args.project.is_some() {
        options.project_hint = args.project.clone();
    }
    options.strict = options.strict || args.strict;
    Ok(options)
}

fn run(args: &CliArgs) -> Result<()> {
    let options = build_options(args)?;
    let conversion = convert(&options)?;

    for warning in &conversion.warnings {
        eprintln!("warning: {warning}");
    }
    match &options.output_path {
        Some(path) => eprintln!(
            "generated {} type(s) to {}",
            conversion.emitted_names.len(),
            path.display()
        ),
        None => print!("{}", conversion.text),
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).expect("argument parsing failed")
    }

    #[test]
    fn parses_basic_invocation() {
        let args = parse_args(&[
            "ts2rs", "-i", "types.ts", "-t", "User", "-t", "Order", "-o", "out.rs", "--strict",
        ]);
        assert_eq!(args.input, PathBuf::from("types.ts"));
        assert_eq!(args.type_names, vec!["User", "Order"]);
        assert_eq!(args.output, Some(PathBuf::from("out.rs")));
        assert!(args.strict);
    }

    #[test]
    fn flags_override_config_values() {
        let dir = std::env::temp_dir().join("ts2rs-cli-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let config = dir.join("config.json");
        std::fs::write(
            &config,
            r#"{ "typeNames": ["FromConfig"], "customHeader": "// header" }"#,
        )
        .unwrap();

        let args = parse_args(&[
            "ts2rs",
            "-i",
            "types.ts",
            "-t",
            "FromFlag",
            "--config",
            config.to_str().unwrap(),
        ]);
        let options = build_options(&args).expect("options");
        assert_eq!(options.type_names, vec!["FromFlag"]);
        assert_eq!(options.custom_header.as_deref(), Some("// header"));
        assert!(!options.strict);
    }

    #[test]
    fn config_values_survive_when_flags_are_absent() {
        let dir = std::env::temp_dir().join("ts2rs-cli-config-test2");
        std::fs::create_dir_all(&dir).unwrap();
        let config = dir.join("config.json");
        std::fs::write(&config, r#"{ "typeNames": ["FromConfig"], "strict": true }"#).unwrap();

        let args = parse_args(&[
            "ts2rs",
            "-i",
            "types.ts",
            "--config",
            config.to_str().unwrap(),
        ]);
        let options = build_options(&args).expect("options");
        assert_eq!(options.type_names, vec!["FromConfig"]);
        assert!(options.strict);
    }
}
