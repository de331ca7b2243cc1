//! Glyphsmith CLI
//!
//! Builds icon fonts, style sheets and preview pages from a directory of
//! SVG icons.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Glyphsmith - SVG icons to icon fonts
#[derive(Parser)]
#[command(name = "glyphsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML file with default build options
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Class naming options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ClassArgs {
    /// CSS class prefix for each icon (e.g. `icon-`)
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Shared base CSS class applied to every icon
    #[arg(short, long = "base")]
    pub base_class: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build fonts, style sheet, preview page and name map
    Build {
        /// Directory containing the icons
        input: Option<PathBuf>,

        /// Output directory (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Font family name (defaults to the input directory name)
        #[arg(short = 'n', long)]
        font_name: Option<String>,

        /// File name stem for every artifact (defaults to the font name)
        #[arg(short = 'f', long)]
        file_name: Option<String>,

        /// Design grid height in font units
        #[arg(long)]
        font_height: Option<u16>,

        #[command(flatten)]
        classes: ClassArgs,
    },

    /// Show code point assignments without writing anything
    List {
        /// Directory containing the icons
        input: Option<PathBuf>,

        #[command(flatten)]
        classes: ClassArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Build {
            input,
            output,
            font_name,
            file_name,
            font_height,
            classes,
        } => {
            let args = commands::build::BuildArgs {
                input,
                output,
                font_name,
                file_name,
                font_height,
                classes,
            };
            commands::build::run(cli.config.as_deref(), args).await?;
        }
        Commands::List { input, classes } => {
            commands::list::run(cli.config.as_deref(), input, classes).await?;
        }
    }

    Ok(())
}
