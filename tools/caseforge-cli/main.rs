use caseforge::prelude::*;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::time::Instant;

/// CLI-specific layout choice for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutCli {
    Zigzag,
    Grid,
}

impl From<LayoutCli> for LayoutMode {
    fn from(value: LayoutCli) -> Self {
        match value {
            LayoutCli::Zigzag => LayoutMode::ZigZag,
            LayoutCli::Grid => LayoutMode::Grid,
        }
    }
}

/// Compiles business process descriptions into laid-out CMMN case definitions
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a business logic JSON file into a CMMN document
    Compile {
        /// Path to the business logic JSON file
        logic_path: String,
        /// Application identifier, part of the case key
        #[arg(long = "app")]
        application_id: String,
        /// Name of the case
        #[arg(long, default_value = caseforge::compiler::DEFAULT_CASE_NAME)]
        case_name: String,
        /// Placement strategy
        #[arg(long, value_enum, default_value = "zigzag")]
        layout: LayoutCli,
        /// Optional JSON file overriding layout dimensions
        #[arg(long)]
        layout_config: Option<String>,
        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
        /// Also write the case manifest JSON here
        #[arg(long)]
        manifest: Option<String>,
    },
    /// Check a CMMN document and list its tasks
    Inspect {
        /// Path to the CMMN XML document
        document_path: String,
        /// Print the recovered business logic JSON instead of the report
        #[arg(long)]
        reconstruct: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Compile {
            logic_path,
            application_id,
            case_name,
            layout,
            layout_config,
            output,
            manifest,
        } => run_compile(
            &logic_path,
            application_id,
            case_name,
            layout.into(),
            layout_config.as_deref(),
            output.as_deref(),
            manifest.as_deref(),
        ),
        Command::Inspect {
            document_path,
            reconstruct,
        } => run_inspect(&document_path, reconstruct),
    }
}

fn read_file(path: &str, what: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read {} file '{}': {}", what, path, e))
    })
}

fn write_file(path: &str, contents: &str) {
    fs::write(path, contents)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", path, e)));
}

fn run_compile(
    logic_path: &str,
    application_id: String,
    case_name: String,
    mode: LayoutMode,
    layout_config_path: Option<&str>,
    output: Option<&str>,
    manifest_path: Option<&str>,
) {
    let start = Instant::now();
    let logic_json = read_file(logic_path, "business logic");

    let config = match layout_config_path {
        Some(path) => serde_json::from_str::<LayoutConfig>(&read_file(path, "layout config"))
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse layout config: {}", e))),
        None => LayoutConfig::default(),
    };

    let compiled = Compiler::from_source(logic_json.as_str(), application_id)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to decode business logic: {}", e)))
        .case_name(case_name)
        .layout_mode(mode)
        .layout_config(config)
        .build()
        .compile()
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));

    match output {
        Some(path) => write_file(path, &compiled.xml),
        None => println!("{}", compiled.xml),
    }
    if let Some(path) = manifest_path {
        let json = serde_json::to_string_pretty(&compiled.manifest)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode manifest: {}", e)));
        write_file(path, &json);
    }

    eprintln!(
        "Compiled case '{}' ({} tasks, {} sentries) in {:?}",
        compiled.case_key,
        compiled.manifest.tasks.len(),
        compiled.routing.sentries.len(),
        start.elapsed()
    );
}

fn run_inspect(document_path: &str, reconstruct_logic: bool) {
    let xml = read_file(document_path, "document");

    if reconstruct_logic {
        let logic = reconstruct(&xml)
            .unwrap_or_else(|e| exit_with_error(&format!("Document is not usable: {}", e)));
        let json = serde_json::to_string_pretty(&logic)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode business logic: {}", e)));
        println!("{}", json);
        return;
    }

    let report = inspect(&xml);
    println!("--- Structure ---");
    if report.errors.is_empty() {
        println!("  ok");
    }
    for error in &report.errors {
        println!("  error: {}", error);
    }
    println!("\n--- Tasks ---");
    for task in &report.tasks {
        println!(
            "  {} '{}' outcomes: [{}]",
            task.id,
            task.name.as_deref().unwrap_or("<unnamed>"),
            task.outcomes.join(", ")
        );
    }
    println!("\n--- Warnings ---");
    for warning in &report.warnings {
        println!("  {}", warning);
    }

    if !report.is_valid() {
        std::process::exit(1);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
