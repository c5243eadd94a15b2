use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Schema Documentation Generator - Generate model, example and metadata views from Rust data types
#[derive(Parser, Debug)]
#[command(name = "apidoc-schema")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Rust project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Root type to document; may be repeated (defaults to every struct found)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub types: Vec<String>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Restrict object expansion to types under a module prefix; may be repeated
    #[arg(short = 'm', long = "module", value_name = "PREFIX")]
    pub modules: Vec<String>,

    /// Document title
    #[arg(long = "title", default_value = "API Schema Documentation")]
    pub title: String,

    /// Document version
    #[arg(long = "doc-version", default_value = "1.0.0")]
    pub doc_version: String,

    /// Leave the per-field metadata view out of the output
    #[arg(long = "no-metadata")]
    pub no_metadata: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    // Validate project path exists
    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    // Validate project path is a directory
    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if args.types.is_empty() {
        info!("Root types: all structs");
    } else {
        info!("Root types: {:?}", args.types);
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::descriptor::TypeRef;
    use crate::document;
    use crate::loader::CatalogLoader;
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
    use crate::session::DocSession;

    info!("Starting schema documentation generation...");

    // Step 1: Scan the project and load the type catalog
    info!("Loading type catalog...");
    let loader = CatalogLoader::new(args.project_path.clone());
    let load_result = loader.load()?;

    for warning in &load_result.warnings {
        warn!("{}", warning);
    }

    info!(
        "Loaded {} type definitions from {} files",
        load_result.catalog.len(),
        load_result.files_parsed
    );

    if load_result.catalog.is_empty() {
        anyhow::bail!("No type definitions found in the project directory");
    }

    // Step 2: Apply the domain boundary, if restricted
    let mut catalog = load_result.catalog;
    for prefix in &args.modules {
        catalog = catalog.with_domain_module(prefix.clone());
    }

    // Step 3: Open the documentation session
    let session = DocSession::new(catalog);

    // Step 4: Pick the root types
    let mut root_names: Vec<String> = if args.types.is_empty() {
        session
            .catalog()
            .definitions()
            .filter(|def| !def.is_enum() && session.catalog().is_expandable(&def.name))
            .map(|def| def.name.clone())
            .collect()
    } else {
        for name in &args.types {
            if session.catalog().get(name).is_none() {
                warn!("Requested type {} was not found in the project", name);
            }
        }
        args.types.clone()
    };
    root_names.sort();
    root_names.dedup();

    let roots: Vec<TypeRef> = root_names.iter().map(TypeRef::new).collect();
    info!("Documenting {} root types", roots.len());

    // Step 5: Resolve, register and render every root
    let bundle = document::assemble(
        &args.title,
        &args.doc_version,
        &session,
        &roots,
        !args.no_metadata,
    );

    // Step 6: Serialize to the requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&bundle)?,
        OutputFormat::Json => serialize_json(&bundle)?,
    };

    // Step 7: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        write_to_file(&content, output_path)?;
        info!("Successfully wrote documentation to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    // Step 8: Display summary
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Files scanned: {}", load_result.files_scanned);
    info!("  - Files parsed: {}", load_result.files_parsed);
    info!("  - Types loaded: {}", session.catalog().len());
    info!("  - Schemas registered: {}", session.schemas().len());

    Ok(())
}
