#![forbid(unsafe_code)]

//! Error type shared by every fallible operation in the crate.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown symbol | Symbol outside the alphabet | `InvalidSymbol`, state unchanged |
//! | Not a bijection | Wrong length or repeated image | Prior permutation retained |
//! | Bad plugboard | Malformed or reused pair | Prior plugboard retained |
//! | Unknown name | Rotor/reflector not in catalog | Prior selection retained |
//! | Bad catalog | Any definition invalid, or a name repeated | Load fails, nothing built |

use core::fmt;

/// Which per-rotor field a 3-symbol setting string addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotorField {
    Indicator,
    RingSetting,
}

impl RotorField {
    /// Field name as used in messages and flat state keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Indicator => "indicator",
            Self::RingSetting => "ring_setting",
        }
    }
}

impl fmt::Display for RotorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from alphabet, permutation, plugboard, catalog and machine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnigmaError {
    /// An alphabet was constructed from an empty string.
    EmptyAlphabet,
    /// An alphabet listed the same symbol twice (case-insensitively).
    DuplicateSymbol(char),
    /// A symbol is not part of the configured alphabet.
    InvalidSymbol(char),
    /// A permutation string does not have one image per alphabet symbol.
    InvalidPermutationLength { len: usize, expected: usize },
    /// A permutation string uses the same image more than once.
    DuplicateImage(char),
    /// A plugboard token is not two distinct symbols.
    InvalidPlugboardPair(String),
    /// A plugboard symbol appears in more than one pair.
    PlugboardLetterReused(char),
    /// A rotor order did not name exactly three rotors.
    ///
    /// Reported instead of [`UnknownRotorName`](Self::UnknownRotorName) when
    /// the token count is wrong, so the message can show the expected form.
    InvalidRotorOrder(String),
    /// A rotor name is not present in the catalog.
    UnknownRotorName(String),
    /// A reflector name is not present in the catalog.
    UnknownReflectorName(String),
    /// An indicator or ring setting string is not exactly three symbols.
    WrongFieldLength { field: RotorField, len: usize },
    /// A positional rotor accessor was given an index outside `0..3`.
    InvalidIndex(usize),
    /// Two catalog names of the same kind are equal after case folding.
    DuplicateName(String),
    /// A catalog entry failed validation while loading.
    InvalidCatalogEntry {
        entry: String,
        source: Box<EnigmaError>,
    },
}

impl fmt::Display for EnigmaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAlphabet => write!(f, "alphabet must not be empty"),
            Self::DuplicateSymbol(c) => write!(f, "alphabet symbol {c} used more than once"),
            Self::InvalidSymbol(c) => write!(f, "Invalid letter: {c}"),
            Self::InvalidPermutationLength { len, expected } => {
                write!(f, "Invalid permutation: length {len}, expected {expected}")
            }
            Self::DuplicateImage(c) => {
                write!(f, "Invalid permutation: letter {c} used more than once")
            }
            Self::InvalidPlugboardPair(pair) => write!(f, "Invalid plugboard pair: \"{pair}\""),
            Self::PlugboardLetterReused(c) => {
                write!(f, "Plugboard value \"{c}\" used more than once")
            }
            Self::InvalidRotorOrder(order) => {
                write!(f, "Rotor order must be specified as I-II-III, got \"{order}\"")
            }
            Self::UnknownRotorName(name) => write!(f, "Invalid rotor name: {name}"),
            Self::UnknownReflectorName(name) => write!(f, "Invalid reflector name: {name}"),
            Self::WrongFieldLength { field, len } => {
                write!(f, "{field} length must be 3, got {len}")
            }
            Self::InvalidIndex(index) => write!(f, "invalid rotor index: {index}"),
            Self::DuplicateName(name) => write!(f, "name {name} is defined more than once"),
            Self::InvalidCatalogEntry { entry, source } => {
                write!(f, "invalid catalog entry {entry}: {source}")
            }
        }
    }
}

impl std::error::Error for EnigmaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidCatalogEntry { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(EnigmaError::InvalidSymbol('X').to_string(), "Invalid letter: X");
        assert_eq!(
            EnigmaError::InvalidPermutationLength {
                len: 3,
                expected: 6
            }
            .to_string(),
            "Invalid permutation: length 3, expected 6"
        );
        assert_eq!(
            EnigmaError::PlugboardLetterReused('A').to_string(),
            "Plugboard value \"A\" used more than once"
        );
        assert_eq!(
            EnigmaError::WrongFieldLength {
                field: RotorField::RingSetting,
                len: 2
            }
            .to_string(),
            "ring_setting length must be 3, got 2"
        );
    }

    #[test]
    fn catalog_entry_exposes_source() {
        use std::error::Error;

        let err = EnigmaError::InvalidCatalogEntry {
            entry: "rotor IX".into(),
            source: Box::new(EnigmaError::DuplicateImage('Q')),
        };
        assert!(err.to_string().starts_with("invalid catalog entry rotor IX"));
        assert_eq!(
            err.source().map(ToString::to_string),
            Some("Invalid permutation: letter Q used more than once".into())
        );
    }
}
