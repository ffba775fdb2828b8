pub mod build;
pub mod generate;

use std::path::Path;
use std::time::Instant;

use clap::{CommandFactory, Parser, Subcommand};
use jsduck_dts::dts::EmitOptions;
use jsduck_dts::jsduck::RegistryOptions;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "jsduck-dts",
    version,
    about = "Generate TypeScript declarations from JSDuck documentation exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one declaration file from a documentation directory
    Generate(generate::GenerateArgs),
    /// Generate every target listed in a jsduck-dts.toml file
    Build(build::BuildArgs),
}

pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => generate::run(args),
            Some(Commands::Build(args)) => build::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

pub fn run_command<F>(f: F) -> i32
where
    F: FnOnce() -> jsduck_dts::Result<()>,
{
    match f() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// One generation job, shared by `generate` and `build`.
#[derive(Debug)]
pub struct Job<'a> {
    pub label: &'a str,
    pub input: &'a Path,
    pub output: &'a Path,
    pub registry: RegistryOptions,
    pub emit: EmitOptions,
    pub check: bool,
}

impl Job<'_> {
    pub fn run(&self) -> jsduck_dts::Result<()> {
        let start = Instant::now();
        debug!(target_name = self.label, input = %self.input.display(), "Starting generation.");

        let declarations = jsduck_dts::generate(self.input, &self.registry, &self.emit)?;
        jsduck_dts::write_declarations(self.output, &declarations)?;
        if self.check {
            jsduck_dts::check::typecheck(self.output)?;
        }

        println!(
            "{}: {} classes in {} modules -> {} ({} warnings, {}ms)",
            self.label,
            declarations.classes,
            declarations.modules,
            self.output.display(),
            declarations.diagnostics.len(),
            start.elapsed().as_millis()
        );
        Ok(())
    }
}
