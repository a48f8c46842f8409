mod error;
mod logging;
mod project;
mod stages;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::project::Project;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding plc.toml. Configured artifact paths are resolved
    /// against it.
    #[arg(long, global = true, value_name = "DIR")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyzes an AST dump, writing the annotated AST, the symbol table and
    /// the diagnostics report.
    Analyze {
        /// AST dump to analyze instead of the configured one.
        input: Option<PathBuf>,
    },
    /// Generates a register machine program from an annotated AST.
    Generate {
        /// Annotated AST to compile instead of the configured one.
        input: Option<PathBuf>,
    },
    /// Analyzes, then generates code if the analysis succeeded.
    Run {
        /// AST dump to compile instead of the configured one.
        input: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let project = Project::load(cli.config.as_deref());
    let _guard = logging::init_tracing(&project);

    let result = match &cli.command {
        Commands::Analyze { input } => stages::analyze(&project, input.as_deref()).map(|_| ()),
        Commands::Generate { input } => stages::generate(&project, input.as_deref()).map(|_| ()),
        Commands::Run { input } => stages::run(&project, input.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("plc: {err}");
            ExitCode::FAILURE
        }
    }
}
