use clap::Args;
use std::path::PathBuf;

use jsduck_dts::dts::EmitOptions;
use jsduck_dts::jsduck::{DEFAULT_PREFIX, RegistryOptions};

use crate::cli::{Job, run_command};

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        long,
        value_name = "DOCS_DIR",
        help = "Directory containing one JSON record per documented class"
    )]
    pub input: PathBuf,
    #[arg(long, short = 'o', value_name = "FILE", help = "Declaration file to write")]
    pub output: PathBuf,
    #[arg(
        long = "doc-url",
        default_value = "",
        help = "Base URL prepended to class names in documentation comments"
    )]
    pub doc_url: String,
    #[arg(
        long,
        default_value = DEFAULT_PREFIX,
        help = "Only record files whose name starts with this prefix are read"
    )]
    pub prefix: String,
    #[arg(long, help = "Type-check the output with tsc")]
    pub check: bool,
    #[arg(long, help = "Generate namespaces in parallel")]
    pub parallel: bool,
}

pub fn run(args: GenerateArgs) -> i32 {
    run_command(|| run_inner(args))
}

fn run_inner(args: GenerateArgs) -> jsduck_dts::Result<()> {
    let label = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.display().to_string());

    let job = Job {
        label: &label,
        input: &args.input,
        output: &args.output,
        registry: RegistryOptions {
            prefix: args.prefix,
            ..RegistryOptions::default()
        },
        emit: EmitOptions {
            doc_url: args.doc_url,
            parallel: args.parallel,
            ..EmitOptions::default()
        },
        check: args.check,
    };
    job.run()
}
