#![forbid(unsafe_code)]

//! Ordered symbol sets with case-insensitive lookup and modular arithmetic.
//!
//! # Invariants
//!
//! 1. Every symbol maps to exactly one index in `0..len()` and back.
//! 2. Symbols are stored uppercase; lookups accept either case.
//! 3. `add` always lands in `0..len()` (non-negative modulus).

use std::collections::HashMap;

use crate::error::EnigmaError;

/// Returns `a mod n`, never negative.
#[must_use]
pub fn modulo(a: i64, n: i64) -> i64 {
    a.rem_euclid(n)
}

/// Shortest signed distance around a circle of `divisor` positions.
///
/// Half-way resolves to the positive direction.
#[must_use]
pub fn circular_distance(difference: i64, divisor: i64) -> i64 {
    let d = modulo(difference, divisor);
    if d * 2 > divisor { d - divisor } else { d }
}

/// Single-symbol uppercase folding. Symbols whose uppercase form expands to
/// several chars are kept as-is.
pub(crate) fn fold(symbol: char) -> char {
    let mut upper = symbol.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => symbol,
    }
}

/// One side of [`Alphabet::add`]: a symbol, a signed offset or an unsigned
/// position. Offsets and positions may lie outside `0..len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Symbol(char),
    Index(i64),
    Position(usize),
}

impl From<char> for Operand {
    fn from(symbol: char) -> Self {
        Self::Symbol(symbol)
    }
}

impl From<i64> for Operand {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<usize> for Operand {
    fn from(index: usize) -> Self {
        Self::Position(index)
    }
}

/// A fixed, ordered sequence of unique symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    text: String,
    to_index: HashMap<char, usize>,
}

impl Alphabet {
    /// Build an alphabet from its symbols in order.
    pub fn new(symbols: &str) -> Result<Self, EnigmaError> {
        let symbols: Vec<char> = symbols.chars().map(fold).collect();
        if symbols.is_empty() {
            return Err(EnigmaError::EmptyAlphabet);
        }
        let mut to_index = HashMap::with_capacity(symbols.len() * 2);
        for (i, &symbol) in symbols.iter().enumerate() {
            if to_index.insert(symbol, i).is_some() {
                return Err(EnigmaError::DuplicateSymbol(symbol));
            }
            for lower in symbol.to_lowercase() {
                if *to_index.entry(lower).or_insert(i) != i {
                    return Err(EnigmaError::DuplicateSymbol(symbol));
                }
            }
        }
        Ok(Self {
            text: symbols.iter().collect(),
            symbols,
            to_index,
        })
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a constructed alphabet; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbols in order, uppercase.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether `symbol` belongs to the alphabet (either case).
    #[must_use]
    pub fn valid(&self, symbol: char) -> bool {
        self.to_index.contains_key(&symbol)
    }

    /// Whether every symbol of `text` belongs to the alphabet.
    #[must_use]
    pub fn all_valid(&self, text: &str) -> bool {
        self.first_invalid(text).is_none()
    }

    /// The first symbol of `text` outside the alphabet, if any.
    #[must_use]
    pub fn first_invalid(&self, text: &str) -> Option<char> {
        text.chars().find(|&c| !self.valid(c))
    }

    /// Zero-based index of `symbol`.
    pub fn index_of(&self, symbol: char) -> Result<usize, EnigmaError> {
        self.to_index
            .get(&symbol)
            .copied()
            .ok_or(EnigmaError::InvalidSymbol(symbol))
    }

    /// Symbol at `index`, or `None` outside `0..len()`.
    #[must_use]
    pub fn from_index(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// Symbols at each of `indices`, concatenated. Out-of-range indices are skipped.
    #[must_use]
    pub fn from_indices(&self, indices: &[usize]) -> String {
        indices.iter().filter_map(|&i| self.from_index(i)).collect()
    }

    /// Adds two operands by index, modulo the alphabet length.
    pub fn add(&self, a: impl Into<Operand>, b: impl Into<Operand>) -> Result<char, EnigmaError> {
        let sum = self.operand_index(a.into())? + self.operand_index(b.into())?;
        Ok(self.symbol(sum % self.len()))
    }

    /// Symbol at an index already known to be in range (table entries, wrapped sums).
    pub(crate) fn symbol(&self, index: usize) -> char {
        self.symbols[index]
    }

    /// Reduces any signed position into `0..len()`.
    #[must_use]
    pub fn wrap(&self, index: i64) -> usize {
        modulo(index, self.symbols.len() as i64) as usize
    }

    /// `(index, symbol)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, char)> + '_ {
        self.symbols.iter().copied().enumerate()
    }

    /// Operand reduced into `0..len()`, so two of them sum without overflow.
    fn operand_index(&self, operand: Operand) -> Result<usize, EnigmaError> {
        match operand {
            Operand::Symbol(c) => self.index_of(c),
            Operand::Index(i) => Ok(self.wrap(i)),
            Operand::Position(i) => Ok(i % self.len()),
        }
    }
}
