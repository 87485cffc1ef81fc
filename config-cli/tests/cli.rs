//! qe-config CLI integration tests
//!
//! Exit codes: 0 success, 1 binding errors, 2 unreadable or malformed file.

use std::path::Path;
use std::path::PathBuf;

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn qe_config() -> Result<Command> {
    let mut cmd = Command::cargo_bin("qe-config")?;
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
}

fn write_properties(dir: &Path, contents: &str) -> std::io::Result<PathBuf> {
    let path = dir.join("features.properties");
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[test]
fn check_accepts_valid_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_properties(
        dir.path(),
        "cpu-cost-weight=0.4\njoin-distribution-type=BROADCAST\nspiller-threads=42\n",
    )?;

    qe_config()?
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK:"))
        .stdout(predicate::str::contains("3 of 74 properties set"));
    Ok(())
}

#[test]
fn check_reports_every_binding_error() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_properties(
        dir.path(),
        "exchange.data-integrity-verification=bogus\n\
         optimizer.no-such-rule=true\n\
         legacy-timestamp=true\n",
    )?;

    qe_config()?
        .arg("check")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Configuration binding failed (3 errors):"))
        .stdout(predicate::str::contains(
            "Invalid value 'bogus' for property 'exchange.data-integrity-verification'",
        ))
        .stdout(predicate::str::contains("NONE, ABORT, RETRY"))
        .stdout(predicate::str::contains(
            "Unknown configuration property 'optimizer.no-such-rule'",
        ))
        .stdout(predicate::str::contains(
            "Defunct configuration property 'legacy-timestamp' cannot be configured",
        ));
    Ok(())
}

#[test]
fn check_rejects_malformed_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_properties(dir.path(), "spill-enabled=true\nthis is not a property\n")?;

    qe_config()?
        .arg("check")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Malformed property on line 2"));
    Ok(())
}

#[test]
fn check_rejects_missing_file() -> Result<()> {
    let dir = TempDir::new()?;

    qe_config()?
        .arg("check")
        .arg(dir.path().join("absent.properties"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read properties file"));
    Ok(())
}

#[test]
fn deprecated_alias_warns_on_stderr() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_properties(dir.path(), "deprecated.legacy-row-to-json-cast=true\n")?;

    qe_config()?
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Use 'legacy-row-to-json-cast' instead.",
        ));
    Ok(())
}

#[test]
fn effective_merges_file_over_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_properties(
        dir.path(),
        "spiller-spill-path=/tmp/a, /tmp/b\nexperimental.spill-enabled=true\n",
    )?;

    qe_config()?
        .arg("effective")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("spill-enabled=true\n"))
        .stdout(predicate::str::contains("spiller-spill-path=/tmp/a,/tmp/b\n"))
        .stdout(predicate::str::contains("memory-cost-weight=10.0\n"));
    Ok(())
}

#[test]
fn effective_json_is_an_ordered_list() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_properties(dir.path(), "regex-library=RE2J\n")?;

    let output = qe_config()?
        .arg("effective")
        .arg(&path)
        .arg("--json")
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let entries = value.as_array().expect("array");
    assert_eq!(entries.len(), 74);
    let regex = entries
        .iter()
        .find(|e| e["key"] == "regex-library")
        .expect("regex-library entry");
    assert_eq!(regex["value"], "RE2J");
    Ok(())
}

#[test]
fn describe_lists_aliases() -> Result<()> {
    qe_config()?
        .arg("describe")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "legacy-catalog-roles (boolean, default: false)",
        ))
        .stdout(predicate::str::contains(
            "aliases: deprecated.legacy-catalog-roles",
        ));
    Ok(())
}
