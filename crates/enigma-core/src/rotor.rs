#![forbid(unsafe_code)]

//! A wired rotor with notches, an indicator and a ring setting.
//!
//! The signal enters at contact `x`, is shifted by `indicator - ring_setting`
//! before passing through the wiring, and is shifted back on the way out.
//!
//! # Invariants
//!
//! 1. `indicator` and `ring_setting` are always in `0..N`; setters reduce any
//!    signed value modulo `N`.
//! 2. The notch set never changes after construction.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;
use crate::permutation::Permutation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    permutation: Permutation,
    notch_string: String,
    notches: BTreeSet<usize>,
    alphabet: Arc<Alphabet>,
    indicator: usize,
    ring_setting: usize,
}

impl Rotor {
    /// Build a rotor from its wiring and notch letters.
    pub fn new(images: &str, notches: &str, alphabet: Arc<Alphabet>) -> Result<Self, EnigmaError> {
        let permutation = Permutation::new(images, Arc::clone(&alphabet))?;
        let notch_set = notches
            .chars()
            .map(|c| alphabet.index_of(c))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self {
            permutation,
            notch_string: notch_set.iter().map(|&i| alphabet.symbol(i)).collect(),
            notches: notch_set,
            alphabet,
            indicator: 0,
            ring_setting: 0,
        })
    }

    /// A rotor that never signals a notch, used as a reflector.
    pub fn reflector(images: &str, alphabet: Arc<Alphabet>) -> Result<Self, EnigmaError> {
        Self::new(images, "", alphabet)
    }

    #[must_use]
    pub fn indicator(&self) -> usize {
        self.indicator
    }

    pub fn set_indicator(&mut self, value: i64) {
        self.indicator = self.alphabet.wrap(value);
    }

    #[must_use]
    pub fn ring_setting(&self) -> usize {
        self.ring_setting
    }

    pub fn set_ring_setting(&mut self, value: i64) {
        self.ring_setting = self.alphabet.wrap(value);
    }

    /// Signal path from the entry side towards the reflector.
    pub fn forward(&mut self, symbol: char) -> Result<char, EnigmaError> {
        let offset = self.offset();
        let entry = self.alphabet.add(offset, symbol)?;
        let wired = self.permutation.forward(entry)?;
        self.alphabet.add(-offset, wired)
    }

    /// Signal path from the reflector back towards the entry side.
    pub fn inverse(&mut self, symbol: char) -> Result<char, EnigmaError> {
        let offset = self.offset();
        let entry = self.alphabet.add(offset, symbol)?;
        let wired = self.permutation.inverse(entry)?;
        self.alphabet.add(-offset, wired)
    }

    /// Advance the indicator by one position.
    pub fn step(&mut self) {
        self.set_indicator(self.indicator as i64 + 1);
    }

    #[must_use]
    pub fn is_on_notch(&self) -> bool {
        self.notches.contains(&self.indicator)
    }

    #[must_use]
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Notch letters in alphabet order.
    #[must_use]
    pub fn notches(&self) -> &str {
        &self.notch_string
    }

    fn offset(&self) -> i64 {
        self.indicator as i64 - self.ring_setting as i64
    }
}
