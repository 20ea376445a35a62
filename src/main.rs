use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use srcref::{commands, diagnostics, logging, manifest};

#[derive(Parser)]
#[command(name = "srcref", about = "Resolve build-rule inputs and enforce package boundaries")]
struct Cli {
    /// Source root to index.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every package root
    Packages,
    /// Print the package that owns each directory
    Owner {
        /// Directories relative to the source root.
        #[arg(required = true)]
        directories: Vec<String>,
    },
    /// Print the canonical form of a target string
    Parse {
        /// Target string, `//pkg:name` or `:name`.
        raw: String,
        /// Package that `:name` forms resolve against.
        #[arg(long, default_value = "")]
        base: String,
    },
    /// Resolve the declared inputs of one rule
    Resolve {
        /// Fully qualified target of the rule being defined.
        #[arg(long)]
        target: String,
        /// Defined targets. Without any, a target is known if its package exists.
        #[arg(long)]
        known: Vec<String>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Raw inputs as written in the build definition.
        inputs: Vec<String>,
    },
    /// Resolve every rule in a rule manifest (exit 0/2)
    Check {
        /// Manifest path relative to the source root.
        #[arg(default_value = manifest::DEFAULT_MANIFEST)]
        manifest: PathBuf,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Packages => commands::cmd_packages(&cli.root).map(|()| ExitCode::SUCCESS),
        Commands::Owner { directories } => {
            commands::cmd_owner(&cli.root, &directories).map(|()| ExitCode::SUCCESS)
        },
        Commands::Parse { raw, base } => commands::cmd_parse(&raw, &base).map(|()| ExitCode::SUCCESS),
        Commands::Resolve { target, known, json, inputs } => {
            commands::cmd_resolve(&cli.root, &target, &known, &inputs, json)
        },
        Commands::Check { manifest, json } => commands::cmd_check(&cli.root, &manifest, json),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}
