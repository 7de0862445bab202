//! enigma - command-line rotor cipher machine.
//!
//! Configures an M3-style machine (or one built from a catalog file) and
//! encrypts text, validates settings, or prints state.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;

use commands::EncryptOptions;
use config::MachineArgs;
use error::CliError;

/// Three-rotor cipher machine.
///
/// Encryption is reciprocal: run the ciphertext through a machine with the
/// same settings to recover the plaintext.
#[derive(Parser)]
#[command(name = "enigma")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); otherwise RUST_LOG or warn
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    machine: MachineArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt or decrypt text
    Encrypt {
        /// Text to encrypt; reads standard input line by line when absent
        text: Option<String>,

        /// Copy symbols outside the alphabet unchanged, without stepping
        #[arg(long)]
        passthrough: bool,

        /// Print each keystroke's signal path to stderr
        #[arg(long)]
        trace: bool,

        /// Write the machine state after encryption to FILE (JSON)
        #[arg(long, value_name = "FILE")]
        save_state: Option<PathBuf>,
    },

    /// Check every given setting without encrypting
    Validate,

    /// Print the configured machine state as JSON
    State,

    /// List the catalog's rotors and reflectors
    Catalog,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    match cli.command {
        Commands::Encrypt {
            text,
            passthrough,
            trace,
            save_state,
        } => {
            let mut machine = cli.machine.build()?;
            let options = EncryptOptions {
                passthrough,
                trace,
                save_state,
            };
            commands::encrypt(&mut machine, text, &options, io::stdin().lock(), &mut out)
        }
        Commands::Validate => {
            let machine = cli.machine.base_machine()?;
            commands::validate(&cli.machine, &machine, &mut out)
        }
        Commands::State => commands::state(&cli.machine.build()?, &mut out),
        Commands::Catalog => commands::catalog(&cli.machine.catalog_or_default()?, &mut out),
    }
}
