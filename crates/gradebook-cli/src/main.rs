//! gradebook CLI: interactive exam grading from the terminal.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gradebook", version, about = "Weighted exam grading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enter scores student by student
    Grade {
        /// Exam definition (YAML)
        #[arg(long)]
        exam: PathBuf,

        /// Results table (CSV), created if missing
        #[arg(long)]
        results: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the results table
    Show {
        /// Exam definition (YAML)
        #[arg(long)]
        exam: PathBuf,

        /// Results table (CSV)
        #[arg(long)]
        results: PathBuf,

        /// Per-task values: raw, percent, weighted
        #[arg(long)]
        mode: Option<String>,

        /// Output format: text, json, summary, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check an exam definition and optionally a results table against it
    Validate {
        /// Exam definition (YAML)
        #[arg(long)]
        exam: PathBuf,

        /// Results table (CSV) to check for column compatibility
        #[arg(long)]
        results: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and example exam
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradebook=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            exam,
            results,
            config,
        } => commands::grade::execute(exam, results, config),
        Commands::Show {
            exam,
            results,
            mode,
            format,
            output,
            config,
        } => commands::show::execute(exam, results, mode, format, output, config),
        Commands::Validate {
            exam,
            results,
            config,
        } => commands::validate::execute(exam, results, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
