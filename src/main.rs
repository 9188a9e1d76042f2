use anyhow::Context;
use balance_reading::cli::{self, Args};
use clap::Parser;
use std::process;

fn main() {
    let args = Args::parse();

    cli::setup_logging(&args);

    let result = cli::run(&args).with_context(|| {
        if args.inputs.is_empty() {
            "Failed to process readouts from stdin".to_string()
        } else {
            format!("Failed to process {} capture file(s)", args.inputs.len())
        }
    });

    match result {
        Ok(_stats) => {
            // Results and summary have already been written to stdout
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
