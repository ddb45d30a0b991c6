use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use config::AppConfig;
use docscope_coverage::{compute_coverage, write_report};
use docscope_docgen::{apply_suggestions, DocstringGenerator, DocstringStyle, PlaceholderProvider};
use docscope_extractor::extract_path;
use docscope_validator::{PydocstyleLinter, StyleValidator};
use serde::Serialize;
use std::path::PathBuf;

mod config;

#[derive(Parser)]
#[command(name = "docscope")]
#[command(about = "Docstring coverage, generation and style checks for Python", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Config file (defaults to ./docscope.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract functions, classes and imports as JSON
    Scan(ScanArgs),

    /// Compute documentation coverage
    Coverage(CoverageArgs),

    /// Generate docstrings for undocumented functions
    Generate(GenerateArgs),

    /// Run the docstring linter
    Validate(ValidateArgs),
}

#[derive(Args)]
struct ScanArgs {
    /// File or directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct CoverageArgs {
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Fail when coverage is below this percentage
    #[arg(long)]
    threshold: Option<f64>,
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Docstring style: google, numpy or rest
    #[arg(long)]
    style: Option<String>,

    /// Insert the docstrings into the source files
    #[arg(long)]
    apply: bool,
}

#[derive(Args)]
struct ValidateArgs {
    #[arg(default_value = ".")]
    path: PathBuf,
}

#[derive(Serialize)]
struct FileSuggestions<'a> {
    path: &'a str,
    suggestions: Vec<docscope_docgen::Suggestion>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan(args) => run_scan(args, &config),
        Commands::Coverage(args) => run_coverage(args, &config),
        Commands::Generate(args) => run_generate(args, config),
        Commands::Validate(args) => run_validate(args, &config),
    }
}

fn run_scan(args: ScanArgs, config: &AppConfig) -> Result<()> {
    let units = extract_path(&args.path, &config.extractor)
        .with_context(|| format!("Failed to scan {}", args.path.display()))?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&units)?
    } else {
        serde_json::to_string(&units)?
    };
    println!("{json}");
    Ok(())
}

fn run_coverage(args: CoverageArgs, config: &AppConfig) -> Result<()> {
    let units = extract_path(&args.path, &config.extractor)
        .with_context(|| format!("Failed to scan {}", args.path.display()))?;
    let report = compute_coverage(&units);

    match &args.out {
        Some(out) => write_report(&report, out)?,
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if let Some(threshold) = args.threshold {
        if !report.meets_threshold(threshold) {
            bail!(
                "Coverage {:.2}% is below threshold {:.2}%",
                report.summary.coverage_percent,
                threshold
            );
        }
    }
    Ok(())
}

fn run_generate(args: GenerateArgs, config: AppConfig) -> Result<()> {
    let mut generator_config = config.generator;
    if let Some(style) = &args.style {
        generator_config.style = style.parse::<DocstringStyle>()?;
    }

    let units = extract_path(&args.path, &config.extractor)
        .with_context(|| format!("Failed to scan {}", args.path.display()))?;
    let generator = DocstringGenerator::new(PlaceholderProvider, generator_config);

    let files: Vec<FileSuggestions> = units
        .iter()
        .map(|unit| FileSuggestions {
            path: &unit.path,
            suggestions: generator.suggestions(unit),
        })
        .filter(|file| !file.suggestions.is_empty())
        .collect();

    if args.apply {
        let mut applied = 0;
        for file in &files {
            applied += apply_suggestions(file.path, &file.suggestions)?;
        }
        log::info!("Inserted {applied} docstrings into {} files", files.len());
        println!("{}", serde_json::json!({ "applied": applied, "files": files.len() }));
    } else {
        println!("{}", serde_json::to_string_pretty(&files)?);
    }
    Ok(())
}

fn run_validate(args: ValidateArgs, config: &AppConfig) -> Result<()> {
    let linter = PydocstyleLinter::new(config.validator.clone())?;
    let validator = StyleValidator::new(linter, &config.validator);
    let report = validator.validate(&args.path)?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.passed {
        bail!(
            "Style validation failed: {} errors, {} warnings",
            report.errors().count(),
            report.warnings().count()
        );
    }
    Ok(())
}
