//! `qe-config`: inspect and validate feature property files.
//!
//! ## Commands
//!
//! - `qe-config check <FILE>`
//! - `qe-config defaults [--json]`
//! - `qe-config describe [--json]`
//! - `qe-config effective <FILE> [--json]`
//!
//! ## Exit codes
//!
//! - 0: success
//! - 1: the file was read but does not bind
//! - 2: the file could not be read or is not a properties file
//! - 3: internal error

#![deny(clippy::print_stdout, clippy::print_stderr)]

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use qe_config_binding::PropertyDescription;
use qe_config_binding::RawProperties;
use qe_config_binding::Registry;
use qe_features_config::FeaturesConfig;
use serde::Serialize;
use tracing::debug;

pub const EXIT_OK: i32 = 0;
pub const EXIT_INVALID: i32 = 1;
pub const EXIT_UNREADABLE: i32 = 2;
pub const EXIT_INTERNAL: i32 = 3;

#[derive(Debug, Parser)]
#[command(name = "qe-config", version, about = "Inspect and validate feature configuration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a properties file and report every problem.
    Check(FileArgs),
    /// Print every property with its default value.
    Defaults(FormatArgs),
    /// Print every property with its type, default, aliases and description.
    Describe(FormatArgs),
    /// Print the configuration a properties file produces.
    Effective(EffectiveArgs),
}

#[derive(Debug, Args)]
pub struct FileArgs {
    /// Properties file (`key=value` per line).
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Output as JSON.
    #[arg(long = "json", short = 'j')]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct EffectiveArgs {
    /// Properties file (`key=value` per line).
    pub file: PathBuf,

    /// Output as JSON.
    #[arg(long = "json", short = 'j')]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RenderedProperty<'a> {
    key: &'a str,
    value: &'a str,
}

impl Cli {
    /// Runs the command, writing results to `out` and diagnostics to `err`.
    /// Returns the process exit code.
    pub fn run(&self, out: &mut dyn Write, err: &mut dyn Write) -> anyhow::Result<i32> {
        let registry = FeaturesConfig::registry().context("building property registry")?;
        match &self.command {
            Command::Check(args) => cmd_check(&registry, &args.file, out, err),
            Command::Defaults(args) => cmd_defaults(&registry, args.json, out),
            Command::Describe(args) => cmd_describe(&registry, args.json, out),
            Command::Effective(args) => cmd_effective(&registry, &args.file, args.json, out, err),
        }
    }
}

/// Outcome of reading and binding one file.
enum Bound {
    Config(RawProperties, FeaturesConfig),
    Exit(i32),
}

fn load_and_bind(
    registry: &Registry<FeaturesConfig>,
    file: &Path,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<Bound> {
    let raw = match RawProperties::load(file) {
        Ok(raw) => raw,
        Err(source_err) => {
            writeln!(err, "Error: {source_err}")?;
            return Ok(Bound::Exit(EXIT_UNREADABLE));
        }
    };
    match registry.binder().bind(&raw) {
        Ok(config) => Ok(Bound::Config(raw, config)),
        Err(errors) => {
            debug!("{} rejected with {} errors", file.display(), errors.len());
            writeln!(out, "{}: {errors}", file.display())?;
            Ok(Bound::Exit(EXIT_INVALID))
        }
    }
}

fn cmd_check(
    registry: &Registry<FeaturesConfig>,
    file: &Path,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<i32> {
    match load_and_bind(registry, file, out, err)? {
        Bound::Config(raw, _) => {
            writeln!(
                out,
                "OK: {} ({} of {} properties set)",
                file.display(),
                raw.len(),
                registry.len()
            )?;
            Ok(EXIT_OK)
        }
        Bound::Exit(code) => Ok(code),
    }
}

fn cmd_defaults(
    registry: &Registry<FeaturesConfig>,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<i32> {
    write_rendered(&registry.render(&registry.defaults()), json, out)?;
    Ok(EXIT_OK)
}

fn cmd_describe(
    registry: &Registry<FeaturesConfig>,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<i32> {
    let descriptions = registry.describe();
    if json {
        serde_json::to_writer_pretty(&mut *out, &descriptions)?;
        writeln!(out)?;
        return Ok(EXIT_OK);
    }

    for PropertyDescription {
        key,
        aliases,
        kind,
        default,
        description,
    } in &descriptions
    {
        writeln!(out, "{key} ({kind}, default: {default})")?;
        if !aliases.is_empty() {
            writeln!(out, "    aliases: {}", aliases.join(", "))?;
        }
        if !description.is_empty() {
            writeln!(out, "    {description}")?;
        }
    }
    Ok(EXIT_OK)
}

fn cmd_effective(
    registry: &Registry<FeaturesConfig>,
    file: &Path,
    json: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<i32> {
    match load_and_bind(registry, file, out, err)? {
        Bound::Config(_, config) => {
            write_rendered(&registry.render(&config), json, out)?;
            Ok(EXIT_OK)
        }
        Bound::Exit(code) => Ok(code),
    }
}

fn write_rendered(
    rendered: &[(&'static str, String)],
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    if json {
        let entries: Vec<RenderedProperty<'_>> = rendered
            .iter()
            .map(|(key, value)| RenderedProperty { key, value })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
    } else {
        for (key, value) in rendered {
            writeln!(out, "{key}={value}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(args: &[&str]) -> (i32, String, String) {
        let cli = Cli::try_parse_from(std::iter::once("qe-config").chain(args.iter().copied()))
            .expect("parse args");
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = cli.run(&mut out, &mut err).expect("run");
        (
            code,
            String::from_utf8(out).expect("utf8"),
            String::from_utf8(err).expect("utf8"),
        )
    }

    #[test]
    fn test_defaults_text() {
        let (code, out, _) = run(&["defaults"]);
        assert_eq!(code, EXIT_OK);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 74);
        assert_eq!(lines[0], "cpu-cost-weight=75.0");
        assert!(lines.contains(&"exchange.data-integrity-verification=ABORT"));
    }

    #[test]
    fn test_defaults_json_keeps_registration_order() {
        let (_, out, _) = run(&["defaults", "--json"]);
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        let entries = value.as_array().expect("array");
        assert_eq!(entries.len(), 74);
        assert_eq!(
            entries[0],
            serde_json::json!({ "key": "cpu-cost-weight", "value": "75.0" })
        );
    }

    #[test]
    fn test_describe_json_includes_aliases_and_kind() {
        let (_, out, _) = run(&["describe", "--json"]);
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        let entry = value
            .as_array()
            .expect("array")
            .iter()
            .find(|e| e["key"] == "exchange.data-integrity-verification")
            .expect("entry")
            .clone();
        assert_eq!(
            entry["kind"],
            serde_json::json!({ "type": "enum", "values": ["NONE", "ABORT", "RETRY"] })
        );
        assert_eq!(entry["default"], "ABORT");

        let spill = value
            .as_array()
            .expect("array")
            .iter()
            .find(|e| e["key"] == "spill-enabled")
            .expect("entry")
            .clone();
        assert_eq!(spill["aliases"], serde_json::json!(["experimental.spill-enabled"]));
    }

    #[test]
    fn test_check_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.properties");
        let (code, out, err) = run(&["check", path.to_str().expect("utf8 path")]);
        assert_eq!(code, EXIT_UNREADABLE);
        assert!(out.is_empty());
        assert!(err.starts_with("Error: Failed to read properties file"), "{err}");
    }
}
