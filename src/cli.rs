use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "zipflow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate document archives and extract their record streams to CSV")]
#[command(
    long_about = "Zipflow either generates a population of ZIP archives filled with \
                       synthetic documents, or processes such a population in parallel and \
                       writes two CSV record streams (document levels and document objects)."
)]
#[command(after_help = "EXAMPLES:\n  \
    zipflow                                 # interactive menu\n  \
    zipflow --mode generate\n  \
    zipflow --mode extract --archives-dir data --levels-output out/levels.csv\n  \
    zipflow --mode extract --output-format json --quiet")]
pub struct Cli {
    /// Run one mode directly instead of showing the interactive menu
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Directory holding the archive population
    #[arg(short, long)]
    pub archives_dir: Option<PathBuf>,

    /// Output file for the (document id, level) record stream
    #[arg(long)]
    pub levels_output: Option<PathBuf>,

    /// Output file for the (document id, object name) record stream
    #[arg(long)]
    pub objects_output: Option<PathBuf>,

    /// Number of archives to generate
    #[arg(long, help = "Archives in the generated population")]
    pub archive_count: Option<usize>,

    /// Documents placed in each generated archive
    #[arg(long)]
    pub documents_per_archive: Option<usize>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate a sample configuration file
    #[arg(long, help = "Generate a sample configuration file and exit")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Create the archive population
    Generate,
    /// Process the archive population into the two CSV streams
    Extract,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_archives_dir(self.archives_dir.clone())
            .with_levels_output(self.levels_output.clone())
            .with_objects_output(self.objects_output.clone())
            .with_archive_count(self.archive_count)
            .with_documents_per_archive(self.documents_per_archive)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
