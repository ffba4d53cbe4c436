use crate::error::{UserFriendlyError, ZipflowError};
use crate::generator::GenerationReport;
use crate::pipeline::ExtractionReport;
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

pub struct OutputFormatter {
    #[allow(dead_code)]
    term: Term,
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            term,
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation", operation),
                OutputMode::Plain => println!("> {}", operation),
            }
        }
    }

    pub fn print_extraction_report(&self, report: &ExtractionReport) {
        match self.mode {
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string_pretty(report) {
                    println!("{}", json);
                }
            }
            _ => {
                if !self.quiet {
                    print!("{}", report.display_summary());
                }
                if report.archives_failed > 0 {
                    self.warning(&format!(
                        "{} of {} archives failed and were skipped",
                        report.archives_failed, report.archives_total
                    ));
                }
            }
        }
    }

    pub fn print_generation_report(&self, report: &GenerationReport) {
        match self.mode {
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string_pretty(report) {
                    println!("{}", json);
                }
            }
            _ => {
                if !self.quiet {
                    print!("{}", report.display_summary());
                }
                if report.archives_failed > 0 {
                    self.warning(&format!("{} archives failed", report.archives_failed));
                }
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &ZipflowError) {
        self.error(&error.user_message());
        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Json => self.print_json_message("suggestion", &suggestion),
                _ => eprintln!("  Suggestion: {}", suggestion),
            }
        }
    }

    fn print_human_message(&self, message_type: MessageType, message: &str) {
        let (emoji, styled) = match message_type {
            MessageType::Success => (CHECKMARK, style(message).green()),
            MessageType::Error => (CROSS, style(message).red()),
            MessageType::Warning => (WARNING, style(message).yellow()),
            MessageType::Info => (INFO, style(message).cyan()),
        };

        if self.use_colors {
            println!("{}{}", emoji, styled);
        } else {
            println!("{}", message);
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        let payload = serde_json::json!({
            "level": level,
            "message": message,
        });
        println!("{}", payload);
    }

    fn should_show_message(&self, required_level: u8) -> bool {
        if self.quiet {
            return false;
        }
        required_level == 0 || self.verbose_level >= required_level
    }
}
