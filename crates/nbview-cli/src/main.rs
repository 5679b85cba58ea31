//! nbview CLI - notebook listing and HTML conversion tool
//!
//! Converts Jupyter notebooks to embeddable HTML fragments outside the web
//! application, and prints the same directory listing the index view shows.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use nbview_core::{list_notebooks, parse_notebook, HtmlOptions, HtmlSerializer};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "nbview",
    version,
    about = "Render Jupyter notebooks to embeddable HTML fragments"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List notebooks in a directory, sorted by title
    List {
        /// Directory containing .ipynb files
        dir: PathBuf,

        /// Emit the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a notebook to HTML plus extracted image resources
    Convert {
        /// Path to the notebook file (.ipynb)
        notebook: PathBuf,

        /// Output directory (default: same directory as the notebook)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// URL prefix for image references in the generated HTML
        #[arg(long, default_value = "")]
        url_prefix: String,

        /// Keep a leading cell that only repeats the title heading
        #[arg(long)]
        keep_title_cell: bool,

        /// Include "In [n]:" prompt labels before code cells
        #[arg(long)]
        prompts: bool,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::List { dir, json } => run_list(&dir, json),
        Commands::Convert {
            notebook,
            output_dir,
            url_prefix,
            keep_title_cell,
            prompts,
            quiet,
        } => run_convert(
            &notebook,
            output_dir.as_deref(),
            &url_prefix,
            keep_title_cell,
            prompts,
            quiet,
        ),
    }
}

fn run_list(dir: &Path, json: bool) -> Result<()> {
    let notebooks = list_notebooks(dir)
        .with_context(|| format!("Failed to list notebooks in {}", dir.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&notebooks)?);
        return Ok(());
    }

    if notebooks.is_empty() {
        println!("No notebooks found in {}", dir.display());
        return Ok(());
    }

    for notebook in &notebooks {
        println!("{}  {}", notebook.title.bold(), notebook.id.dimmed());
    }
    Ok(())
}

fn run_convert(
    notebook: &Path,
    output_dir: Option<&Path>,
    url_prefix: &str,
    keep_title_cell: bool,
    prompts: bool,
    quiet: bool,
) -> Result<()> {
    let document = parse_notebook(notebook)
        .with_context(|| format!("Failed to read notebook {}", notebook.display()))?;

    let options = HtmlOptions::new()
        .with_resource_url_prefix(url_prefix)
        .with_strip_title_cell(!keep_title_cell)
        .with_execution_count(prompts);
    let rendered = HtmlSerializer::with_options(options)
        .render(&document)
        .with_context(|| format!("Failed to render notebook {}", notebook.display()))?;

    let stem = notebook
        .file_stem()
        .context("Notebook path has no filename")?
        .to_string_lossy();

    // Default next to the input, like the web app's static layout
    let output_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => notebook.parent().unwrap_or(Path::new(".")).to_path_buf(),
    };
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let html_path = output_dir.join(format!("{stem}.html"));
    fs::write(&html_path, &rendered.html_body)
        .with_context(|| format!("Failed to write {}", html_path.display()))?;

    for (filename, bytes) in &rendered.resources {
        let resource_path = output_dir.join(filename);
        fs::write(&resource_path, bytes)
            .with_context(|| format!("Failed to write {}", resource_path.display()))?;
    }

    if !quiet {
        println!(
            "{} {} -> {}",
            "Converted".green().bold(),
            notebook.display(),
            html_path.display()
        );
        if !rendered.resources.is_empty() {
            println!(
                "{} {} resource file(s) in {}",
                "Extracted".green(),
                rendered.resources.len(),
                output_dir.display()
            );
        }
    }

    Ok(())
}
