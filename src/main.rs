#![forbid(unsafe_code)]

mod cli;

fn main() {
    jsduck_dts::init_tracing();
    std::process::exit(cli::run_cli(std::env::args_os()));
}
