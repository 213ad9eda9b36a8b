#![deny(missing_docs)]

//! # oasguard CLI
//!
//! Command line front end for validating captured HTTP message bodies
//! against an OpenAPI v3 contract.
//!
//! Supported Commands:
//! - `request`: validate a request body for a path + method.
//! - `response`: validate a response body for a path + method + status.

use clap::{Parser, Subcommand};
use oasguard_core::OpenApiValidator;
use std::path::PathBuf;

use crate::error::CliResult;

mod check;
mod error;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI contract checks for captured HTTP traffic")]
struct Cli {
    /// OpenAPI v3 contract document (YAML or JSON).
    #[clap(long, env = "OASGUARD_SPEC")]
    spec: PathBuf,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validates a captured request body against the contract.
    Request(check::RequestArgs),
    /// Validates a captured response body against the contract.
    Response(check::ResponseArgs),
}

fn run(cli: &Cli) -> CliResult<()> {
    let validator = OpenApiValidator::from_file(&cli.spec)?;

    match &cli.command {
        Commands::Request(args) => check::request(&validator, args),
        Commands::Response(args) => check::response(&validator, args),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        check::report(&err);
        std::process::exit(1);
    }
}
