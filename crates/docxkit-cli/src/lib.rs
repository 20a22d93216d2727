//! docxkit CLI - Command-line interface library
//!
//! This library provides the CLI functionality for docxkit, including:
//! - New: Create a DOCX from a title and a body
//! - Markdown: Convert a Markdown file to DOCX
//! - Fill / Loop / Image: Rewrite placeholders in an existing DOCX
//!
//! # Binary Usage
//!
//! ```bash
//! # Title and body document
//! docxkit new --title "Report" --body "Quarterly numbers" -o out/
//!
//! # Markdown document
//! docxkit markdown notes.md -o out/
//!
//! # Fill placeholders from a JSON object
//! docxkit fill letter.docx --data values.json
//! ```

pub mod app;
pub mod config;

pub use app::{
    fill_command, image_command, loop_command, markdown_command, new_command, run_cli,
};
pub use config::Settings;
