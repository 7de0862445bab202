#![forbid(unsafe_code)]

//! Core of a three-rotor cipher machine in the style of the Enigma M3.
//!
//! This crate provides:
//! - [`Alphabet`] and [`Permutation`] for validated symbol substitutions
//! - [`Rotor`] and [`Plugboard`] stages
//! - [`Catalog`] for named rotor and reflector wirings, loaded once from a [`CatalogSpec`]
//! - [`Enigma`], the stepping machine, with [`MachineObserver`] change notifications
//! - [`FlatState`] for saving and restoring machine settings
//!
//! # Example
//!
//! ```
//! use enigma_core::Enigma;
//!
//! let mut machine = Enigma::m3();
//! let cipher = machine.encrypt_message("AAAAA").unwrap();
//! assert_eq!(cipher, "BDZGO");
//!
//! machine.set_indicator("AAA").unwrap();
//! assert_eq!(machine.encrypt_message(&cipher).unwrap(), "AAAAA");
//! ```

pub mod alphabet;
pub mod catalog;
pub mod error;
pub mod machine;
pub mod observer;
pub mod permutation;
pub mod plugboard;
pub mod position;
pub mod rotor;
pub mod state;

pub use alphabet::{Alphabet, Operand, circular_distance, modulo};
pub use catalog::{Catalog, CatalogSpec, Defaults, ReflectorDefinition, RotorDefinition, RotorSpec};
pub use error::{EnigmaError, RotorField};
pub use machine::Enigma;
pub use observer::{EncryptTrace, EventLog, MachineEvent, MachineObserver, StageTrace};
pub use permutation::{LastValue, Permutation};
pub use plugboard::Plugboard;
pub use position::RotorPosition;
pub use rotor::Rotor;
pub use state::{FlatState, StateDiagnostic};
