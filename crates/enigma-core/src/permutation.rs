#![forbid(unsafe_code)]

//! Bijective substitutions over an [`Alphabet`].
//!
//! A [`Permutation`] is built from an image string: position `i` of the string
//! is the image of the alphabet's `i`-th symbol.
//!
//! # Invariants
//!
//! 1. `forward` and `inverse` tables are mutual inverses at all times.
//! 2. `set_to` builds a candidate table and commits only when the whole image
//!    string validated; a rejected string leaves the previous table in place.
//! 3. The most recent `(input, output)` pair per direction is recorded by
//!    [`Permutation::forward`] / [`Permutation::inverse`]. Nothing inside the
//!    crate reads it back except [`crate::machine::Enigma::last_values`].

use std::sync::Arc;

use crate::alphabet::{Alphabet, fold};
use crate::error::EnigmaError;

/// The most recent lookup through one direction of a substitution stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LastValue {
    pub input: char,
    pub output: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tables {
    text: String,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Tables {
    fn build(images: &str, alphabet: &Alphabet) -> Result<Self, EnigmaError> {
        let images: Vec<char> = images.chars().map(fold).collect();
        if images.len() != alphabet.len() {
            return Err(EnigmaError::InvalidPermutationLength {
                len: images.len(),
                expected: alphabet.len(),
            });
        }
        let mut forward = vec![0; images.len()];
        let mut inverse: Vec<Option<usize>> = vec![None; images.len()];
        for (plain, &cipher) in images.iter().enumerate() {
            let image = alphabet.index_of(cipher)?;
            if inverse[image].is_some() {
                return Err(EnigmaError::DuplicateImage(cipher));
            }
            forward[plain] = image;
            inverse[image] = Some(plain);
        }
        // Length matches and no image repeats, so every slot is filled.
        let inverse = inverse.into_iter().flatten().collect();
        Ok(Self {
            text: images.into_iter().collect(),
            forward,
            inverse,
        })
    }
}

/// A bijection over an alphabet's index space with recorded lookups.
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    tables: Tables,
    last_forward: Option<LastValue>,
    last_inverse: Option<LastValue>,
}

impl Permutation {
    /// Build a permutation from its image string.
    pub fn new(images: &str, alphabet: Arc<Alphabet>) -> Result<Self, EnigmaError> {
        let tables = Tables::build(images, &alphabet)?;
        Ok(Self {
            alphabet,
            tables,
            last_forward: None,
            last_inverse: None,
        })
    }

    /// The identity permutation over `alphabet`.
    #[must_use]
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let n = alphabet.len();
        Self {
            tables: Tables {
                text: alphabet.as_str().to_owned(),
                forward: (0..n).collect(),
                inverse: (0..n).collect(),
            },
            alphabet,
            last_forward: None,
            last_inverse: None,
        }
    }

    /// Replace the mapping. On error the permutation is unchanged.
    pub fn set_to(&mut self, images: &str) -> Result<(), EnigmaError> {
        self.tables = Tables::build(images, &self.alphabet)?;
        Ok(())
    }

    /// Apply the permutation, recording the pair.
    pub fn forward(&mut self, symbol: char) -> Result<char, EnigmaError> {
        let output = self.map_forward(symbol)?;
        self.last_forward = Some(LastValue {
            input: fold(symbol),
            output,
        });
        Ok(output)
    }

    /// Apply the inverse permutation, recording the pair.
    pub fn inverse(&mut self, symbol: char) -> Result<char, EnigmaError> {
        let output = self.map_inverse(symbol)?;
        self.last_inverse = Some(LastValue {
            input: fold(symbol),
            output,
        });
        Ok(output)
    }

    /// Forward lookup without recording.
    pub fn map_forward(&self, symbol: char) -> Result<char, EnigmaError> {
        let plain = self.alphabet.index_of(symbol)?;
        Ok(self.symbol_at(self.tables.forward[plain]))
    }

    /// Inverse lookup without recording.
    pub fn map_inverse(&self, symbol: char) -> Result<char, EnigmaError> {
        let cipher = self.alphabet.index_of(symbol)?;
        Ok(self.symbol_at(self.tables.inverse[cipher]))
    }

    #[must_use]
    pub fn last_forward(&self) -> Option<LastValue> {
        self.last_forward
    }

    #[must_use]
    pub fn last_inverse(&self) -> Option<LastValue> {
        self.last_inverse
    }

    /// `(plain, cipher)` for every symbol, in alphabet order.
    pub fn pairs(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.alphabet
            .iter()
            .map(|(i, plain)| (plain, self.symbol_at(self.tables.forward[i])))
    }

    /// Whether applying the permutation twice is the identity.
    #[must_use]
    pub fn is_involution(&self) -> bool {
        self.tables.forward == self.tables.inverse
    }

    /// Canonical uppercase image string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.tables.text
    }

    #[must_use]
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    fn symbol_at(&self, index: usize) -> char {
        self.alphabet.symbol(index)
    }
}

impl PartialEq for Permutation {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet && self.tables == other.tables
    }
}

impl Eq for Permutation {}
