use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use quote_anchor::batch::OutcomeRecord;
use quote_anchor::config::{load_from_path, load_manifest_from_path, AnchorConfig};
use quote_anchor::hash::{compute_content_hash_with, has_content_changed, HashAlgorithm};
use quote_anchor::reanchor::Highlight;
use quote_anchor::selector::{Anchorer, MatchContext, TextSelector};
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quote-anchor")]
#[command(about = "Anchor quotes to documents and re-locate them after edits", long_about = None)]
#[command(version)]
struct Cli {
    /// Anchoring policy file (TOML); built-in defaults otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a selector for a quote
    Select {
        /// Document to anchor against
        #[arg(short, long)]
        document: PathBuf,

        /// Quote text
        #[arg(short, long)]
        quote: String,

        /// Expected start offset (UTF-16 code units)
        #[arg(long)]
        hint: Option<usize>,

        /// Print the selector as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find the best fuzzy match for a quote, optionally with context
    Locate {
        #[arg(short, long)]
        document: PathBuf,

        #[arg(short, long)]
        quote: String,

        /// Text expected right before the quote
        #[arg(long)]
        prefix: Option<String>,

        /// Text expected right after the quote
        #[arg(long)]
        suffix: Option<String>,

        /// Expected start offset (UTF-16 code units)
        #[arg(long)]
        hint: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Re-anchor a stored selector (JSON file) against a document
    Reanchor {
        #[arg(short, long)]
        document: PathBuf,

        /// JSON file holding a selector
        #[arg(short, long)]
        selector: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Re-anchor every highlight of a document (JSON array file)
    Refresh {
        #[arg(short, long)]
        document: PathBuf,

        /// JSON file holding the document's highlights
        #[arg(long)]
        highlights: PathBuf,

        /// Digest stored with the document; all highlights are re-anchored if omitted
        #[arg(long)]
        digest: Option<String>,

        /// Write the updated highlights to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Anchor every quote in a TOML manifest
    Batch {
        #[arg(short, long)]
        document: PathBuf,

        /// Quote manifest (TOML)
        #[arg(short, long)]
        quotes: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Print the content digest of a document
    Hash {
        #[arg(short, long)]
        document: PathBuf,

        /// Digest algorithm (defaults to the configured one)
        #[arg(short, long, value_enum)]
        algorithm: Option<AlgorithmArg>,
    },

    /// Check a document against a stored digest (exit 1 if changed)
    Check {
        #[arg(short, long)]
        document: PathBuf,

        /// Previously stored digest
        #[arg(long)]
        digest: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Sha256,
    Xxh3,
}

impl From<AlgorithmArg> for HashAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Sha256 => HashAlgorithm::Sha256,
            AlgorithmArg::Xxh3 => HashAlgorithm::Xxh3,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info,quote_anchor=debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => load_from_path(path)?,
        None => AnchorConfig::default(),
    };
    let anchorer = Anchorer::new(config);

    match cli.command {
        Commands::Select {
            document,
            quote,
            hint,
            json,
        } => cmd_select(&anchorer, &document, &quote, hint, json),

        Commands::Locate {
            document,
            quote,
            prefix,
            suffix,
            hint,
            json,
        } => {
            let context = MatchContext {
                prefix,
                suffix,
                hint,
            };
            cmd_locate(&anchorer, &document, &quote, &context, json)
        }

        Commands::Reanchor {
            document,
            selector,
            json,
        } => cmd_reanchor(&anchorer, &document, &selector, json),

        Commands::Refresh {
            document,
            highlights,
            digest,
            output,
            json,
        } => cmd_refresh(
            &anchorer,
            &document,
            &highlights,
            digest.as_deref(),
            output.as_deref(),
            json,
        ),

        Commands::Batch {
            document,
            quotes,
            json,
        } => cmd_batch(&anchorer, &document, &quotes, json),

        Commands::Hash {
            document,
            algorithm,
        } => {
            let algorithm = algorithm
                .map(HashAlgorithm::from)
                .unwrap_or(anchorer.config().hashing.algorithm);
            let text = read_document(&document)?;
            println!("{}", compute_content_hash_with(&text, algorithm));
            Ok(())
        }

        Commands::Check { document, digest } => cmd_check(&document, &digest),
    }
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse JSON in {}", path.display()))
}

/// Print a selector with its context dimmed around the exact text.
fn display_selector(selector: &TextSelector) {
    println!(
        "{} [{}, {})",
        "✓".green(),
        selector.start_offset,
        selector.end_offset
    );
    println!(
        "  {}{}{}",
        selector.prefix.dimmed(),
        selector.exact.bold(),
        selector.suffix.dimmed()
    );
}

/// Character diff between the stored exact text and what was found.
fn display_diff(stored: &str, found: &str) {
    println!("{}", "--- stored".dimmed());
    println!("{}", "+++ found".dimmed());

    let diff = TextDiff::from_chars(stored, found);
    let mut line = String::new();
    for change in diff.iter_all_changes() {
        let text = change.value();
        let rendered = match change.tag() {
            ChangeTag::Delete => text.red().strikethrough().to_string(),
            ChangeTag::Insert => text.green().underline().to_string(),
            ChangeTag::Equal => text.normal().to_string(),
        };
        line.push_str(&rendered);
    }
    println!("  {}", line);
}

fn cmd_select(
    anchorer: &Anchorer,
    document: &Path,
    quote: &str,
    hint: Option<usize>,
    json: bool,
) -> Result<()> {
    let text = read_document(document)?;

    match anchorer.compute_selector(&text, quote, hint) {
        Ok(selector) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&selector)?);
            } else {
                display_selector(&selector);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} could not anchor quote: {}", "✗".red(), e);
            std::process::exit(1);
        }
    }
}

fn cmd_locate(
    anchorer: &Anchorer,
    document: &Path,
    quote: &str,
    context: &MatchContext,
    json: bool,
) -> Result<()> {
    let text = read_document(document)?;

    match anchorer.match_quote(&text, quote, context) {
        Ok(found) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                let selector = TextSelector::from_offsets(
                    &text,
                    found.start,
                    found.end,
                    anchorer.config().context_length,
                )?;
                display_selector(&selector);
                println!(
                    "  errors: {}, score: {}",
                    found.errors,
                    format!("{:.3}", found.score).cyan()
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} no match: {}", "✗".red(), e);
            std::process::exit(1);
        }
    }
}

fn cmd_reanchor(anchorer: &Anchorer, document: &Path, selector: &Path, json: bool) -> Result<()> {
    let text = read_document(document)?;
    let stored: TextSelector = read_json(selector)?;

    match anchorer.reanchor_selector(&text, &stored) {
        Ok(updated) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&updated)?);
                return Ok(());
            }

            if updated.anchor() == stored.anchor() && updated.exact == stored.exact {
                println!("{} offsets still valid", "⊙".yellow());
            } else {
                println!(
                    "{} moved [{}, {}) -> [{}, {})",
                    "✓".green(),
                    stored.start_offset,
                    stored.end_offset,
                    updated.start_offset,
                    updated.end_offset
                );
            }
            if updated.exact != stored.exact {
                display_diff(&stored.exact, &updated.exact);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} re-anchoring failed: {}", "✗".red(), e);
            eprintln!("  The highlight should stay flagged stale.");
            std::process::exit(1);
        }
    }
}

fn cmd_refresh(
    anchorer: &Anchorer,
    document: &Path,
    highlights: &Path,
    digest: Option<&str>,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let text = read_document(document)?;
    let mut records: Vec<Highlight> = read_json(highlights)?;

    let report = anchorer.refresh_highlights(&text, digest, &mut records);

    if let Some(path) = output {
        fs::write(path, serde_json::to_string_pretty(&records)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if report.content_changed {
            println!("{}", "Content changed since the stored digest".yellow());
        } else {
            println!("{}", "Content unchanged".dimmed());
        }
        println!("Digest: {}", report.content_hash);
        println!();
        println!("{}", "Summary:".bold());
        println!("  {} unchanged", format!("{}", report.unchanged).green());
        println!("  {} edited in place", format!("{}", report.edited).yellow());
        println!("  {} relocated", format!("{}", report.relocated).cyan());
        println!("  {} failed", format!("{}", report.failed.len()).red());
        for id in &report.failed {
            println!("    {} {} (left stale)", "✗".red(), id);
        }
    }

    if !report.failed.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_batch(anchorer: &Anchorer, document: &Path, quotes: &Path, json: bool) -> Result<()> {
    let text = read_document(document)?;
    let manifest = load_manifest_from_path(quotes)?;

    let outcomes = anchorer.anchor_quotes(&text, &manifest.quotes);
    let skipped = outcomes.iter().filter(|o| !o.is_anchored()).count();

    if json {
        let records: Vec<OutcomeRecord<'_>> = outcomes.iter().map(OutcomeRecord::from).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        if !manifest.meta.name.is_empty() {
            println!("Manifest: {}", manifest.meta.name);
            println!();
        }
        for outcome in &outcomes {
            match &outcome.result {
                Ok(selector) => println!(
                    "{} {}: [{}, {}) {:?}",
                    "✓".green(),
                    outcome.id,
                    selector.start_offset,
                    selector.end_offset,
                    selector.exact
                ),
                Err(e) => println!("{} {}: skipped - {}", "⊘".cyan(), outcome.id, e),
            }
        }
        println!();
        println!(
            "{} anchored, {} skipped",
            format!("{}", outcomes.len() - skipped).green(),
            format!("{}", skipped).cyan()
        );
    }

    Ok(())
}

fn cmd_check(document: &Path, digest: &str) -> Result<()> {
    let text = read_document(document)?;

    if has_content_changed(&text, digest) {
        println!("{} content changed; re-anchor its highlights", "✗".red());
        std::process::exit(1);
    }

    println!("{} content unchanged", "✓".green());
    Ok(())
}
