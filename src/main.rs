use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rw", author, version = env!("CARGO_PKG_VERSION"), about = "The RedwoodJS CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new redwood project
    Create {
        #[command(flatten)]
        args: commands::create::CreateArgs,
    },

    /// Show version information
    Version {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,

        /// Show toolchain versions and the template cache location
        #[arg(short, long)]
        components: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // The debug log is a convenience; a read-only home must not block scaffolding
    if let Err(e) = rw::logging::init() {
        eprintln!("Warning: debug logging disabled: {e:#}");
    }

    let result = run(cli);
    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "command failed with an error");
    }
    rw::logging::finish();

    if let Err(e) = result {
        commands::output::print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Create { args } => {
            commands::create::execute(args)?;
        }
        Commands::Version { json, components } => {
            commands::version::execute(json, components)?;
        }
    }

    Ok(())
}
