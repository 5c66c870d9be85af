mod annotation_file;

use annotpdf::{DocumentHistory, IncrementalWriter, ParsedHistory, WriteOptions};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "annotpdf",
    about = "Append annotations to PDF files as incremental updates",
    version,
    author
)]
struct Cli {
    /// Log every written object and xref run
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add annotations described in a JSON file
    Annotate {
        /// Input PDF file
        input: PathBuf,

        /// JSON array of annotations
        #[arg(short, long)]
        annotations: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Reject unknown annotation subtypes instead of writing an empty /Subtype
        #[arg(long)]
        strict_subtypes: bool,
    },

    /// Show the revision history and page annotations of a PDF file
    Inspect {
        /// Input PDF file
        input: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "annotpdf=debug" } else { "annotpdf=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Annotate {
            input,
            annotations,
            output,
            strict_subtypes,
        } => annotate(&input, &annotations, &output, strict_subtypes),
        Commands::Inspect { input } => inspect(&input),
    }
}

fn read_document(input: &Path) -> Result<(Vec<u8>, ParsedHistory)> {
    let data =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let history = ParsedHistory::from_bytes(&data)
        .with_context(|| format!("Failed to read the revision history of {}", input.display()))?;
    Ok((data, history))
}

fn annotate(input: &Path, annotations: &Path, output: &Path, strict_subtypes: bool) -> Result<()> {
    let (data, mut history) = read_document(input)?;
    let pages = history.pages(&data).context("Failed to read the page tree")?;
    let specs = annotation_file::load(annotations)?;
    tracing::debug!(
        "Loaded {} annotation(s) from {} for {} page(s)",
        specs.len(),
        annotations.display(),
        pages.len()
    );

    let now = Utc::now();
    let annotations = specs
        .into_iter()
        .enumerate()
        .map(|(index, spec)| {
            spec.into_annotation(&pages, &mut history, now)
                .with_context(|| format!("Annotation #{index}"))
        })
        .collect::<Result<Vec<_>>>()?;
    let count = annotations.len();

    let options = WriteOptions {
        strict_subtypes,
        ..Default::default()
    };
    let updated = IncrementalWriter::new(&data, annotations, &mut history)
        .with_options(options)
        .write()
        .context("Failed to write the incremental update")?;

    std::fs::write(output, &updated)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Added {} annotation(s): {} -> {} ({} bytes appended)",
        count,
        input.display(),
        output.display(),
        updated.len() - data.len()
    );
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let (data, history) = read_document(input)?;

    println!("PDF Revisions for: {}", input.display());
    println!("==========================================");
    println!("Revisions: {}", history.updates().len());
    for (index, update) in history.updates().iter().rev().enumerate() {
        println!(
            "  #{}: xref at {}, {} record(s), /Size {}",
            index + 1,
            update.start_pointer,
            update.refs.len(),
            update.trailer.size
        );
    }

    let recent = history.recent_update();
    println!("Size: {}", history.trailer_size());
    println!("Root: {}", recent.trailer.root);

    let pages = history.pages(&data).context("Failed to read the page tree")?;
    println!("Pages: {}", pages.len());
    for (index, page) in pages.iter().enumerate() {
        let object = page
            .object_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "?".to_string());
        let annots: Vec<String> = page.annots.iter().map(ToString::to_string).collect();
        match page.annots_pointer {
            Some(pointer) => println!(
                "  Page {index} ({object}): annots {pointer} [{}]",
                annots.join(", ")
            ),
            None if annots.is_empty() => println!("  Page {index} ({object}): no annotations"),
            None => println!("  Page {index} ({object}): inline [{}]", annots.join(", ")),
        }
    }
    Ok(())
}
