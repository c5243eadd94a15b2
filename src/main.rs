//! Schema Documentation Generator - Command-line tool.
//!
//! This binary generates structured schema documentation from the data types
//! of a Rust project. It statically analyzes the source code to build a type
//! catalog, resolves each root type into a schema tree, and renders the
//! model, example and metadata views into a YAML or JSON document.
//!
//! # Usage
//!
//! ```bash
//! apidoc-schema [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Document every struct in a project as YAML:
//! ```bash
//! apidoc-schema ./my-api-project -o schemas.yaml
//! ```
//!
//! Document selected root types as JSON:
//! ```bash
//! apidoc-schema ./my-api-project -t User -t Order -f json
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! apidoc-schema ./my-api-project -v
//! ```

use anyhow::Result;
use apidoc_schema::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // We need to parse args twice: once to get verbose flag, then again after logger init
    // First, do a quick parse just to check for verbose flag
    let args_for_verbose = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Schema Documentation Generator starting...");

    // Now do the full parse with validation
    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    // Run the main workflow
    cli::run(args)?;

    info!("Schema documentation generation completed successfully");

    Ok(())
}
