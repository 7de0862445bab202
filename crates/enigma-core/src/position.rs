#![forbid(unsafe_code)]

//! Addressing for the three stepping rotor slots.

use core::fmt;

/// A rotor slot, numbered left to right as `0`, `1`, `2`.
///
/// The signal enters at [`RotorPosition::Right`] and the rightmost rotor is
/// the one that steps on every keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RotorPosition {
    Left,
    Middle,
    Right,
}

impl RotorPosition {
    /// All positions in array order.
    pub const ALL: [Self; 3] = [Self::Left, Self::Middle, Self::Right];

    /// Array index of this position.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
        }
    }

    /// Position for an array index, or `None` outside `0..3`.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            _ => None,
        }
    }

    /// Single-letter tag (`l`, `m`, `r`).
    #[must_use]
    pub const fn tag(self) -> char {
        match self {
            Self::Left => 'l',
            Self::Middle => 'm',
            Self::Right => 'r',
        }
    }
}

impl fmt::Display for RotorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Middle => write!(f, "middle"),
            Self::Right => write!(f, "right"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_mapping_is_total_and_inverse() {
        for (i, position) in RotorPosition::ALL.into_iter().enumerate() {
            assert_eq!(position.index(), i);
            assert_eq!(RotorPosition::from_index(i), Some(position));
        }
        assert_eq!(RotorPosition::from_index(3), None);
    }

    #[test]
    fn tags_and_display() {
        assert_eq!(RotorPosition::Left.tag(), 'l');
        assert_eq!(RotorPosition::Right.tag(), 'r');
        assert_eq!(RotorPosition::Middle.to_string(), "middle");
    }
}
