use clap::Args;
use std::path::PathBuf;

use jsduck_dts::config::{BuildConfig, DEFAULT_CONFIG_FILE};
use jsduck_dts::dts::EmitOptions;
use tracing::info;

use crate::cli::{Job, run_command};

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[arg(
        long,
        value_name = "FILE",
        default_value = DEFAULT_CONFIG_FILE,
        help = "Path to the build configuration"
    )]
    pub config: PathBuf,
    #[arg(
        long = "target",
        value_name = "NAME",
        help = "Only build the named targets. Defaults to all targets"
    )]
    pub targets: Vec<String>,
    #[arg(long, help = "Type-check every output with tsc")]
    pub check: bool,
    #[arg(long, help = "Generate namespaces in parallel")]
    pub parallel: bool,
}

pub fn run(args: BuildArgs) -> i32 {
    run_command(|| run_inner(args))
}

fn run_inner(args: BuildArgs) -> jsduck_dts::Result<()> {
    let config = BuildConfig::load(&args.config)?;

    for name in &args.targets {
        if config.target(name).is_none() {
            return Err(jsduck_dts::Error::Config {
                path: args.config.clone(),
                reason: format!("no target named '{name}'"),
            });
        }
    }

    let selected = config
        .targets
        .iter()
        .filter(|target| args.targets.is_empty() || args.targets.contains(&target.name));

    // One timestamp for the whole build
    let emit = EmitOptions {
        parallel: args.parallel,
        ..EmitOptions::default()
    };

    let mut built = 0;
    for target in selected {
        let job = Job {
            label: &target.name,
            input: &target.docs,
            output: &target.output,
            registry: target.registry_options(),
            emit: EmitOptions {
                doc_url: target.doc_url.clone(),
                ..emit.clone()
            },
            check: args.check,
        };
        job.run()?;
        built += 1;
    }

    info!(targets = built, "Build finished.");
    Ok(())
}
