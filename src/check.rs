//! Post-generation type check.
//!
//! Runs the TypeScript compiler over a tiny file that references the
//! generated declarations, so any syntax or typing error in them fails the
//! build.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

const TSC: &str = "tsc";

/// Locate `tsc` on `PATH`.
pub fn find_tsc() -> Option<PathBuf> {
    which::which(TSC).ok()
}

/// Type-check the declaration file at `declarations` with `tsc --noEmit --strict`.
pub fn typecheck(declarations: &Path) -> Result<()> {
    let tsc = find_tsc().ok_or_else(|| Error::Check {
        path: declarations.to_path_buf(),
        reason: format!("{TSC} is not available on PATH"),
    })?;
    typecheck_with(&tsc, declarations)
}

/// Same as [`typecheck`] with an explicit compiler binary.
pub fn typecheck_with(tsc: &Path, declarations: &Path) -> Result<()> {
    let check_error = |reason: String| Error::Check {
        path: declarations.to_path_buf(),
        reason,
    };

    let file_name = declarations
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| check_error("declaration path has no file name".to_string()))?;
    let check_file = declarations.with_file_name(format!("{file_name}.check.ts"));
    fs::write(
        &check_file,
        format!("/// <reference path=\"{file_name}\" />\n"),
    )
    .map_err(|err| check_error(format!("Failed to write {}: {err}", check_file.display())))?;

    debug!(tsc = %tsc.display(), file = %check_file.display(), "Running type check.");
    let output = Command::new(tsc)
        .args(["--noEmit", "--strict", "--target", "ES2015", "--lib", "ES2015,DOM"])
        .arg(&check_file)
        .output();

    // Cleanup check file
    fs::remove_file(&check_file).ok();

    let output = output.map_err(|err| check_error(format!("Failed to run {TSC}: {err}")))?;
    if output.status.success() {
        Ok(())
    } else {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(check_error(format!("TypeScript errors:\n{stdout}\n{stderr}")))
    }
}
