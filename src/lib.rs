pub mod archive;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, Mode, OutputFormat};
pub use config::{CliOverrides, Config, PathsConfig, PopulationConfig};
pub use error::{Result, UserFriendlyError, ZipflowError};

// Core functionality re-exports
pub use archive::{ArchiveReader, ArchiveWriter};
pub use document::{Document, DocumentObject};
pub use generator::{ArchiveGenerator, GenerationReport};
pub use pipeline::{ExtractionReport, LevelRecord, ObjectRecord, PipelineCoordinator};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;

/// Main library interface for the two pipeline modes.
pub struct Zipflow {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl Zipflow {
    /// Create a new instance with the provided configuration.
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Create an instance for testing (no signal handler conflicts).
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(false);
        let shutdown = GracefulShutdown::new_for_test();

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    /// Create an instance from parsed CLI arguments.
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbosity_level(), cli_args.quiet)
    }

    /// Generation mode: build the archive population.
    pub async fn generate_archives(&self) -> Result<GenerationReport> {
        self.shutdown.check_shutdown()?;
        self.output_formatter.start_operation("Generating archive population");

        let bar = self.progress_manager.create_archive_progress(
            self.config.population.archive_count as u64,
            "writing archives",
        );
        let progress = {
            let bar = bar.clone();
            move |_path: &Path| bar.inc(1)
        };

        let generator = ArchiveGenerator::new(&self.config);
        let report = generator.run(Some(&progress)).await?;

        ui::progress::finish_progress(
            &bar,
            &format!("{} archives written", report.archives_written),
        );

        self.output_formatter.print_generation_report(&report);
        Ok(report)
    }

    /// Extraction mode: run the parallel pipeline over the population.
    pub async fn extract_archives(&self) -> Result<ExtractionReport> {
        self.shutdown.check_shutdown()?;
        self.output_formatter.start_operation("Extracting record streams");

        let coordinator = PipelineCoordinator::new(&self.config);
        let archives = coordinator.discover_archives()?;

        self.output_formatter
            .info(&format!("Found {} archives", archives.len()));

        let bar = self
            .progress_manager
            .create_archive_progress(archives.len() as u64, "processing archives");
        let progress = {
            let bar = bar.clone();
            move |_outcome: &pipeline::ArchiveOutcome| bar.inc(1)
        };

        let report = coordinator.run(Some(&progress)).await?;

        ui::progress::finish_progress(
            &bar,
            &format!(
                "{} level rows, {} object rows",
                report.level_rows, report.object_rows
            ),
        );

        self.output_formatter.print_extraction_report(&report);
        Ok(report)
    }

    /// Generate a sample configuration file.
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(ZipflowError::Io)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn handle_error(&self, error: &ZipflowError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
