//! # Citation Extractor CLI
//!
//! ## Purpose
//! Command-line front-end over the extraction/resolution library: read a
//! file or stdin, run the pipeline, and print citations as JSON or a
//! human-readable table. A thin wrapper, not part of the core engineering —
//! implemented because the teacher binary this was adapted from has one.
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Read input text from a file or stdin
//! 4. Run `extract` (and `resolve_citations`, if requested)
//! 5. Print results as JSON or a table

use citation_extractor::errors::{CitationError, Result};
use citation_extractor::utils::TextUtils;
use citation_extractor::{config::AppConfig, extract, patterns, Citation, ExtractOptions, ResolvedCitation};
use clap::{Arg, ArgAction, Command};
use std::io::Read;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {}", err);
        eprintln!("hint: {}", err.recovery_suggestion());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let matches = Command::new("citation-extractor")
        .version("0.1.0")
        .author("Legal Search Team")
        .about("Extracts and resolves legal citations from free-form legal text")
        .arg(
            Arg::new("input")
                .value_name("FILE")
                .help("Text file to read (defaults to stdin)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("citation-extractor.toml"),
        )
        .arg(
            Arg::new("resolve")
                .long("resolve")
                .help("Resolve Id./Ibid./supra/short-form citations against document history")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("json|table")
                .help("Output format")
                .default_value("json"),
        )
        .arg(
            Arg::new("rebuild-patterns")
                .long("rebuild-patterns")
                .help("Recompile the pattern catalogue, run its adversarial smoke tests, and exit")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").unwrap();
    let config = AppConfig::from_file(config_path)?;

    init_logging(&config)?;

    if matches.get_flag("rebuild-patterns") {
        return rebuild_patterns();
    }

    let text = read_input(matches.get_one::<String>("input"))?;

    let mut options: ExtractOptions = config.build_extract_options()?;
    options.resolve = matches.get_flag("resolve");

    let outcome = extract(&text, &options)?;

    match matches.get_one::<String>("format").map(String::as_str) {
        Some("table") => print_table(&outcome.citations, outcome.resolved.as_deref()),
        _ => print_json(&outcome.citations, outcome.resolved.as_deref())?,
    }

    Ok(())
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let level: tracing::Level = config.logging.level.parse().map_err(|_| CitationError::Config {
        message: format!("invalid log level: {}", config.logging.level),
    })?;

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true).with_level(true);
    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(fmt_layer.json().with_filter(tracing_subscriber::filter::LevelFilter::from_level(level)))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt_layer.with_filter(tracing_subscriber::filter::LevelFilter::from_level(level)))
            .init();
    }

    info!("logging initialized at level {}", config.logging.level);
    Ok(())
}

fn read_input(path: Option<&String>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(CitationError::from),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map_err(CitationError::from)?;
            Ok(buf)
        }
    }
}

fn rebuild_patterns() -> Result<()> {
    info!("recompiling pattern catalogue and running adversarial smoke tests...");
    match patterns::audit_catalogue() {
        Ok(()) => {
            info!("all patterns passed their adversarial-input time budget");
            Ok(())
        }
        Err(message) => {
            warn!("pattern audit failed: {}", message);
            Err(CitationError::PatternCompilation {
                pattern_id: "catalogue".to_string(),
                details: message,
            })
        }
    }
}

fn print_json(citations: &[Citation], resolved: Option<&[ResolvedCitation]>) -> Result<()> {
    let json = match resolved {
        Some(resolved) => serde_json::to_string_pretty(resolved)?,
        None => serde_json::to_string_pretty(citations)?,
    };
    println!("{}", json);
    Ok(())
}

fn print_table(citations: &[Citation], resolved: Option<&[ResolvedCitation]>) {
    println!("{:<14} {:<8} {:<50} {}", "KIND", "CONF.", "MATCHED TEXT", "RESOLUTION");
    match resolved {
        Some(resolved) => {
            for r in resolved {
                let resolution = match r.resolution.resolved_to {
                    Some(idx) => format!("-> #{}", idx),
                    None => r.resolution.failure_reason.clone().unwrap_or_else(|| "-".to_string()),
                };
                print_row(&r.citation, &resolution);
            }
        }
        None => {
            for citation in citations {
                print_row(citation, "-");
            }
        }
    }
    info!("printed {} citations", citations.len());
}

fn print_row(citation: &Citation, resolution: &str) {
    let kind = kind_label(citation);
    let matched = TextUtils::truncate(&citation.core().matched_text, 50);
    println!("{:<14} {:<8.2} {:<50} {}", kind, citation.confidence(), matched, resolution);
}

fn kind_label(citation: &Citation) -> &'static str {
    match citation {
        Citation::Case(_) => "case",
        Citation::Statute(_) => "statute",
        Citation::Journal(_) => "journal",
        Citation::Neutral(_) => "neutral",
        Citation::PublicLaw(_) => "publicLaw",
        Citation::FederalRegister(_) => "fedReg",
        Citation::Id(_) => "id",
        Citation::Ibid(_) => "ibid",
        Citation::Supra(_) => "supra",
        Citation::ShortFormCase(_) => "shortForm",
    }
}
