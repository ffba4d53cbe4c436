use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process;
use zipflow::{Cli, Mode, OutputFormatter, OutputMode, UserFriendlyError, Zipflow};

#[tokio::main]
async fn main() {
    run().await;
    // Every terminal path reports success; failures are printed, not encoded
    // in the exit status.
    process::exit(0);
}

async fn run() {
    let cli = Cli::parse();

    if cli.generate_config {
        handle_generate_config(&cli);
        return;
    }

    let zipflow = match Zipflow::from_cli(&cli) {
        Ok(zipflow) => zipflow,
        Err(e) => {
            print_startup_error(&e);
            return;
        }
    };

    let mode = match cli.mode {
        Some(mode) => Some(mode),
        None => prompt_for_mode(),
    };

    match mode {
        Some(Mode::Generate) => {
            println!("Program is creating archives, please wait...");
            if let Err(e) = zipflow.generate_archives().await {
                zipflow.handle_error(&e);
            }
        }
        Some(Mode::Extract) => {
            println!("Program is processing archives, please wait...");
            if let Err(e) = zipflow.extract_archives().await {
                zipflow.handle_error(&e);
            }
        }
        None => {} // exit chosen from the menu
    }

    println!("Program was completed.");
}

/// Interactive three-way menu; loops until a valid choice arrives.
fn prompt_for_mode() -> Option<Mode> {
    println!("Available program mode:");
    println!("1 - create archives with documents");
    println!("2 - process archives with documents");
    println!("3 - exit");

    let stdin = io::stdin();
    loop {
        print!("Enter choice[1-3]:");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return None, // EOF behaves like exit
            Ok(_) => {}
            Err(_) => return None,
        }

        match line.trim() {
            "1" => return Some(Mode::Generate),
            "2" => return Some(Mode::Extract),
            "3" => return None,
            _ => println!("Please, type correct option, type 3 for exit"),
        }
    }
}

fn handle_generate_config(cli: &Cli) {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "zipflow.toml".to_string());

    match Zipflow::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  zipflow --config {}", config_path);
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
        }
    }
}

fn print_startup_error(error: &zipflow::ZipflowError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
