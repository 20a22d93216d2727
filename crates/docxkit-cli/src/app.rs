//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;

use docxkit_ooxml::{
    create_markdown_docx, update_docx, Docx, ImageInsertion, LoopExpansion, TextSubstitution,
};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "docxkit")]
#[command(author, version, about = "Assemble and fill DOCX documents", long_about = None)]
struct Cli {
    /// Configuration file (defaults to docxkit.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create new_file.docx from a title and a body
    New {
        /// Document title
        #[arg(long)]
        title: String,

        /// Body paragraph
        #[arg(long)]
        body: String,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a Markdown file to docx_markdown.docx
    Markdown {
        /// Input Markdown file
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace {{KEY}} placeholders from a JSON object
    Fill {
        /// DOCX file to rewrite in place
        docx: PathBuf,

        /// JSON file mapping keys to values
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Expand {{#each name}} regions from a JSON object of arrays
    Loop {
        /// DOCX file to rewrite in place
        docx: PathBuf,

        /// JSON file mapping loop names to lists of objects
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Embed an image at its {{%img%ID}} marker
    Image {
        /// DOCX file to rewrite in place
        docx: PathBuf,

        /// Image file to embed
        #[arg(long)]
        image: PathBuf,

        /// Marker id
        #[arg(long)]
        id: String,

        /// Width in EMU
        #[arg(long)]
        width: Option<i64>,

        /// Height in EMU
        #[arg(long)]
        height: Option<i64>,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");

    match cli.command {
        Commands::New {
            title,
            body,
            output,
        } => {
            let dir = output.unwrap_or_else(|| settings.output.dir.clone());
            new_command(&title, &body, &dir)?;
        }
        Commands::Markdown { input, output } => {
            let dir = output.unwrap_or_else(|| settings.output.dir.clone());
            markdown_command(&input, &dir)?;
        }
        Commands::Fill { docx, data } => {
            fill_command(&docx, &data)?;
        }
        Commands::Loop { docx, data } => {
            loop_command(&docx, &data)?;
        }
        Commands::Image {
            docx,
            image,
            id,
            width,
            height,
        } => {
            let width = width.unwrap_or(settings.image.width_emu);
            let height = height.unwrap_or(settings.image.height_emu);
            image_command(&docx, &image, &id, width, height)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // A subscriber may already be installed when embedded in another binary.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))
}

fn require_file(path: &Path, what: &str) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!("{} not found: {}", what, path.display());
    }
    Ok(())
}

/// Execute the new command
pub fn new_command(title: &str, body: &str, output_dir: &Path) -> Result<()> {
    println!("docxkit v{}", docxkit_ooxml::VERSION);

    let path = Docx::new()
        .with_title(title)
        .with_body(body)
        .create_new_docx(output_dir)
        .with_context(|| format!("Failed to create document in {}", output_dir.display()))?;

    println!("Created: {}", path.display());
    Ok(())
}

/// Execute the markdown command
pub fn markdown_command(input: &Path, output_dir: &Path) -> Result<()> {
    println!("docxkit v{}", docxkit_ooxml::VERSION);
    println!("Converting: {}", input.display());

    require_file(input, "Input file")?;
    let markdown = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    let path = create_markdown_docx(output_dir, &markdown)
        .with_context(|| format!("Failed to create document in {}", output_dir.display()))?;

    println!("Created: {}", path.display());
    Ok(())
}

/// Execute the fill command
pub fn fill_command(docx: &Path, data: &Path) -> Result<()> {
    require_file(docx, "Document")?;
    let fill = TextSubstitution::from_json(&read_json(data)?)
        .with_context(|| format!("Invalid placeholder data: {}", data.display()))?;

    update_docx(docx, &fill)
        .with_context(|| format!("Failed to update document: {}", docx.display()))?;

    println!(
        "Filled {} placeholder(s) in {}",
        fill.replacements().len(),
        docx.display()
    );
    Ok(())
}

/// Execute the loop command
pub fn loop_command(docx: &Path, data: &Path) -> Result<()> {
    require_file(docx, "Document")?;
    let expansion = LoopExpansion::from_json(&read_json(data)?)
        .with_context(|| format!("Invalid loop data: {}", data.display()))?;

    update_docx(docx, &expansion)
        .with_context(|| format!("Failed to update document: {}", docx.display()))?;

    println!(
        "Expanded {} loop(s) in {}",
        expansion.loops().len(),
        docx.display()
    );
    Ok(())
}

/// Execute the image command
pub fn image_command(
    docx: &Path,
    image: &Path,
    id: &str,
    width_emu: i64,
    height_emu: i64,
) -> Result<()> {
    require_file(docx, "Document")?;
    let insertion = ImageInsertion::from_file(image, id, width_emu, height_emu)
        .with_context(|| format!("Failed to load image: {}", image.display()))?;

    update_docx(docx, &insertion)
        .with_context(|| format!("Failed to update document: {}", docx.display()))?;

    println!("Embedded {} as {}", image.display(), insertion.media_path());
    Ok(())
}
