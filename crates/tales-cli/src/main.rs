//! CLI frontend for TALES branching-dialogue scripts.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tales",
    about = "Tools for TALES branching-dialogue scripts",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log interpreter and parser activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse scripts and report errors and dangling transitions
    Check {
        /// Files or directories of .tales files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Print a script in canonical form
    Fmt {
        /// The .tales file to format
        file: PathBuf,

        /// Rewrite the file in place instead of printing
        #[arg(short, long)]
        write: bool,
    },

    /// List the scenes of a script
    Scenes {
        /// A .tales file or a directory of them
        path: PathBuf,

        /// Print the parsed document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a script headlessly with scripted selections
    Trace {
        /// A .tales file or a directory of them
        path: PathBuf,

        /// Scene to start at
        #[arg(short, long)]
        scene: String,

        /// Menu option to pick, in order; repeat for each menu
        #[arg(long = "select", value_name = "INDEX")]
        selections: Vec<usize>,

        /// Seed the state, e.g. `stat:gold:10` or `var:met_guard:true`
        #[arg(long = "set", value_name = "KIND:KEY:VALUE")]
        assignments: Vec<String>,

        /// Continue in the current scene when a choice leads nowhere
        #[arg(long)]
        lenient: bool,

        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Check { paths } => commands::check::run(&paths),
        Commands::Fmt { file, write } => commands::fmt::run(&file, write),
        Commands::Scenes { path, json } => commands::scenes::run(&path, json),
        Commands::Trace {
            path,
            scene,
            selections,
            assignments,
            lenient,
            json,
        } => commands::trace::run(
            &path,
            &commands::trace::TraceOptions {
                scene,
                selections,
                assignments,
                lenient,
                json,
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
