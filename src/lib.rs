//! Generate TypeScript declaration files from a JSDuck JSON documentation export.
//!
//! ```no_run
//! use std::path::Path;
//! use jsduck_dts::dts::EmitOptions;
//! use jsduck_dts::jsduck::RegistryOptions;
//!
//! let declarations = jsduck_dts::generate(
//!     Path::new("docs/output"),
//!     &RegistryOptions::default(),
//!     &EmitOptions::default(),
//! )?;
//! jsduck_dts::write_declarations(Path::new("ext.d.ts"), &declarations)?;
//! # Ok::<(), jsduck_dts::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(unused_must_use, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

use std::fs;
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod check;
pub mod config;
pub mod dts;
pub mod error;
pub mod jsduck;

pub use error::{Error, Result};

use dts::{Declarations, EmitOptions, Emitter};
use jsduck::{ClassRegistry, RegistryOptions};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "JSDUCK_DTS_LOG";

/// Load the documentation in `input` and generate declarations for it.
pub fn generate(
    input: &Path,
    registry_options: &RegistryOptions,
    emit_options: &EmitOptions,
) -> Result<Declarations> {
    let registry = ClassRegistry::load(input, registry_options)?;
    info!(
        input = %input.display(),
        classes = registry.len(),
        modules = registry.modules().len(),
        "Loaded documentation."
    );

    let declarations = Emitter::new(&registry, emit_options).emit();
    info!(
        diagnostics = declarations.diagnostics.len(),
        bytes = declarations.text.len(),
        "Generated declarations."
    );
    Ok(declarations)
}

/// Write generated declarations, creating parent directories as needed.
pub fn write_declarations(path: &Path, declarations: &Declarations) -> Result<()> {
    let write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, &declarations.text).map_err(write_error)?;
    info!(output = %path.display(), "Wrote declarations.");
    Ok(())
}

/// Install the stderr log subscriber.
pub fn init_tracing() {
    let crate_root = module_path!().to_string();

    // JSDUCK_DTS_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "jsduck_dts::dts=debug"
    let filter = match std::env::var(LOG_ENV) {
        Ok(level) if is_plain_level(&level) => {
            format!("{crate_root}={level}")
        }
        Ok(spec) => spec,
        Err(_) => format!("{crate_root}=info"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
