use std::io;
use std::path::PathBuf;

use enigma_core::EnigmaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to read standard input: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("catalog {}: {source}", path.display())]
    Catalog { path: PathBuf, source: EnigmaError },

    #[error("{flag}: {source}")]
    Setting {
        flag: &'static str,
        source: EnigmaError,
    },

    #[error(transparent)]
    Machine(#[from] EnigmaError),

    #[error("{0} setting(s) failed validation")]
    Invalid(usize),
}
