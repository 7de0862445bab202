#![forbid(unsafe_code)]

//! Plugboard: a self-inverse permutation built from letter-pair swaps.
//!
//! Settings are written as whitespace-separated pairs, e.g. `"AB FX"`.
//! Letters not named in any pair map to themselves.
//!
//! # Invariants
//!
//! 1. The permutation is always an involution.
//! 2. A letter appears in at most one pair.
//! 3. [`Plugboard::set_to`] and [`Plugboard::validate`] run the same parser;
//!    only `set_to` commits, and only when the whole setting parsed.

use std::sync::Arc;

use crate::alphabet::{Alphabet, fold};
use crate::error::EnigmaError;
use crate::permutation::Permutation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugboard {
    permutation: Permutation,
    setting: String,
}

/// A parsed setting, ready to commit.
struct Wiring {
    images: String,
    canonical: String,
}

impl Plugboard {
    /// An empty plugboard (identity).
    #[must_use]
    pub fn new(alphabet: Arc<Alphabet>) -> Self {
        Self {
            permutation: Permutation::identity(alphabet),
            setting: String::new(),
        }
    }

    /// Replace the plugboard setting. On error the plugboard is unchanged.
    pub fn set_to(&mut self, pairs: &str) -> Result<(), EnigmaError> {
        let wiring = self.parse(pairs)?;
        self.permutation.set_to(&wiring.images)?;
        self.setting = wiring.canonical;
        Ok(())
    }

    /// Check a setting without applying it.
    pub fn validate(&self, pairs: &str) -> Result<(), EnigmaError> {
        self.parse(pairs).map(|_| ())
    }

    pub fn forward(&mut self, symbol: char) -> Result<char, EnigmaError> {
        self.permutation.forward(symbol)
    }

    pub fn inverse(&mut self, symbol: char) -> Result<char, EnigmaError> {
        self.permutation.inverse(symbol)
    }

    #[must_use]
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Canonical setting: uppercase pairs separated by single spaces.
    #[must_use]
    pub fn setting(&self) -> &str {
        &self.setting
    }

    fn parse(&self, pairs: &str) -> Result<Wiring, EnigmaError> {
        let alphabet = self.permutation.alphabet();
        let mut out: Vec<char> = alphabet.as_str().chars().collect();
        let mut tokens = Vec::new();
        for token in pairs.split_whitespace() {
            let token: String = token.chars().map(fold).collect();
            let mut symbols = token.chars();
            let (a, b) = match (symbols.next(), symbols.next(), symbols.next()) {
                (Some(a), Some(b), None) if a != b => (a, b),
                _ => return Err(EnigmaError::InvalidPlugboardPair(token)),
            };
            let i = alphabet.index_of(a)?;
            let j = alphabet.index_of(b)?;
            if out[i] != a {
                return Err(EnigmaError::PlugboardLetterReused(a));
            }
            if out[j] != b {
                return Err(EnigmaError::PlugboardLetterReused(b));
            }
            out.swap(i, j);
            tokens.push(token);
        }
        Ok(Wiring {
            images: out.into_iter().collect(),
            canonical: tokens.join(" "),
        })
    }
}
