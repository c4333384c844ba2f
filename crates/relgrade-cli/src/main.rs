mod commands;
mod reader;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "relgrade",
    version,
    about = "Grade relational schema design submissions and analyze relations"
)]
struct Cli {
    /// Log analyzer progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade one submission, or every submission in a directory, against a task
    Grade {
        /// Task file (.json, .yaml, .yml)
        task: PathBuf,

        /// Submission file or directory of submission files
        submission: PathBuf,

        /// Submission mode: submit (default) or run
        #[arg(long, default_value = "submit")]
        mode: String,

        /// Output format: human (default) or json
        #[arg(long, default_value = "human")]
        format: String,
    },

    /// Derive keys, minimal cover and normal form of a relation
    Analyze {
        /// Relation or task file (.json, .yaml, .yml)
        path: PathBuf,

        /// Also compute the closure of these comma-separated attributes
        #[arg(long, value_delimiter = ',')]
        closure: Option<Vec<String>>,

        /// Output format: human (default) or json
        #[arg(long, default_value = "human")]
        format: String,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Grade {
            task,
            submission,
            mode,
            format,
        } => commands::grade::run_grade(&task, &submission, &mode, &format),
        Commands::Analyze {
            path,
            closure,
            format,
        } => commands::analyze::run_analyze(&path, closure.as_deref(), &format),
    };

    match result {
        Ok(output) => {
            println!("{output}");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
