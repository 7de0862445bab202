#![forbid(unsafe_code)]

//! Rotor and reflector catalogs.
//!
//! A [`CatalogSpec`] is the raw configuration record (alphabet, named rotor
//! wirings with notches, named reflector wirings, defaults). [`Catalog::load`]
//! validates it once and produces an immutable [`Catalog`] whose lookups
//! return `Option` instead of failing at use time.
//!
//! # Invariants
//!
//! 1. Every wiring in a loaded catalog is a bijection over the alphabet.
//! 2. Every notch letter belongs to the alphabet.
//! 3. The default rotor order names three catalog rotors and the default
//!    reflector exists.
//! 4. Rotor and reflector names are stored uppercase; lookups fold case.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Bad alphabet | Empty or repeated symbol | `InvalidCatalogEntry { entry: "alphabet" }` |
//! | Bad wiring | Wrong length, unknown or repeated image | `InvalidCatalogEntry { entry: "rotor NAME" }` |
//! | Bad default | Unknown rotor/reflector name | `InvalidCatalogEntry { entry: "defaults" }` |

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// Separator between rotor names in a rotor order, e.g. `"I-II-III"`.
pub const ROTOR_ORDER_SEPARATOR: &str = "-";

/// Raw rotor definition: wiring plus notch letters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RotorSpec {
    pub permutation: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub notch: String,
}

/// Default selections applied when a machine is built.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Defaults {
    pub rotor_order: String,
    pub reflector: String,
}

/// Unvalidated catalog record, as read from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogSpec {
    pub alphabet: String,
    pub rotors: BTreeMap<String, RotorSpec>,
    pub reflectors: BTreeMap<String, String>,
    pub defaults: Defaults,
}

impl CatalogSpec {
    /// Wehrmacht/Kriegsmarine M3 rotors I–VIII and reflectors A–C.
    ///
    /// Wirings from the Crypto Museum rotor tables.
    #[must_use]
    pub fn m3() -> Self {
        let rotor = |permutation: &str, notch: &str| RotorSpec {
            permutation: permutation.into(),
            notch: notch.into(),
        };
        let rotors = BTreeMap::from([
            ("I".into(), rotor("EKMFLGDQVZNTOWYHXUSPAIBRCJ", "Q")),
            ("II".into(), rotor("AJDKSIRUXBLHWTMCQGZNPYFVOE", "E")),
            ("III".into(), rotor("BDFHJLCPRTXVZNYEIWGAKMUSQO", "V")),
            ("IV".into(), rotor("ESOVPZJAYQUIRHXLNFTGKDCMWB", "J")),
            ("V".into(), rotor("VZBRGITYUPSDNHLXAWMJQOFECK", "Z")),
            ("VI".into(), rotor("JPGVOUMFYQBENHZRDKASXLICTW", "ZM")),
            ("VII".into(), rotor("NZJHGRCXMYSWBOUFAIVLPEKQDT", "ZM")),
            ("VIII".into(), rotor("FKQHTLXOCBJSPDZRAMEWNIUYGV", "ZM")),
        ]);
        let reflectors = BTreeMap::from([
            ("A".into(), "EJMZALYXVBWFCRQUONTSPIKHGD".into()),
            ("B".into(), "YRUHQSLDPXNGOKMIEBFZCWVJAT".into()),
            ("C".into(), "FVPJIAOYEDRZXWGCTKUQSBNMHL".into()),
        ]);
        Self {
            alphabet: "ABCDEFGHIJKLMNOPQRSTUVWXYZ".into(),
            rotors,
            reflectors,
            defaults: Defaults {
                rotor_order: "I-II-III".into(),
                reflector: "B".into(),
            },
        }
    }
}

/// A validated rotor wiring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotorDefinition {
    permutation: String,
    notches: String,
}

impl RotorDefinition {
    #[must_use]
    pub fn permutation(&self) -> &str {
        &self.permutation
    }

    #[must_use]
    pub fn notches(&self) -> &str {
        &self.notches
    }

    /// A fresh rotor at indicator and ring setting zero.
    pub fn build(&self, alphabet: &Arc<Alphabet>) -> Result<Rotor, EnigmaError> {
        Rotor::new(&self.permutation, &self.notches, Arc::clone(alphabet))
    }
}

/// A validated reflector wiring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectorDefinition {
    permutation: String,
}

impl ReflectorDefinition {
    #[must_use]
    pub fn permutation(&self) -> &str {
        &self.permutation
    }

    pub fn build(&self, alphabet: &Arc<Alphabet>) -> Result<Rotor, EnigmaError> {
        Rotor::reflector(&self.permutation, Arc::clone(alphabet))
    }
}

/// Immutable, validated catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    alphabet: Arc<Alphabet>,
    rotors: BTreeMap<String, RotorDefinition>,
    reflectors: BTreeMap<String, ReflectorDefinition>,
    default_rotor_order: [String; 3],
    default_reflector: String,
}

impl Catalog {
    /// Validate a catalog record. Fails on the first invalid entry.
    pub fn load(spec: &CatalogSpec) -> Result<Self, EnigmaError> {
        let alphabet = Arc::new(
            Alphabet::new(&spec.alphabet).map_err(|e| entry_error("alphabet".into(), e))?,
        );

        let mut rotors = BTreeMap::new();
        for (name, rotor) in &spec.rotors {
            let entry = || format!("rotor {name}");
            let definition = RotorDefinition {
                permutation: canonical_wiring(&rotor.permutation, &alphabet)
                    .map_err(|e| entry_error(entry(), e))?,
                notches: rotor.notch.clone(),
            };
            let built = definition
                .build(&alphabet)
                .map_err(|e| entry_error(entry(), e))?;
            let definition = RotorDefinition {
                notches: built.notches().to_owned(),
                ..definition
            };
            let key = normalize_name(name);
            if rotors.insert(key.clone(), definition).is_some() {
                return Err(entry_error(entry(), EnigmaError::DuplicateName(key)));
            }
        }

        let mut reflectors = BTreeMap::new();
        for (name, permutation) in &spec.reflectors {
            let entry = || format!("reflector {name}");
            let definition = ReflectorDefinition {
                permutation: canonical_wiring(permutation, &alphabet)
                    .map_err(|e| entry_error(entry(), e))?,
            };
            let key = normalize_name(name);
            if reflectors.insert(key.clone(), definition).is_some() {
                return Err(entry_error(entry(), EnigmaError::DuplicateName(key)));
            }
        }

        let mut catalog = Self {
            alphabet,
            rotors,
            reflectors,
            default_rotor_order: Default::default(),
            default_reflector: normalize_name(&spec.defaults.reflector),
        };
        catalog.default_rotor_order = catalog
            .parse_rotor_order(&spec.defaults.rotor_order)
            .map_err(|e| entry_error("defaults".into(), e))?;
        if catalog.reflector(&catalog.default_reflector).is_none() {
            return Err(entry_error(
                "defaults".into(),
                EnigmaError::UnknownReflectorName(catalog.default_reflector.clone()),
            ));
        }
        tracing::debug!(
            rotors = catalog.rotors.len(),
            reflectors = catalog.reflectors.len(),
            symbols = catalog.alphabet.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// The standard M3 catalog.
    #[must_use]
    pub fn m3() -> Self {
        Self::load(&CatalogSpec::m3()).expect("built-in M3 catalog is valid")
    }

    #[must_use]
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Look up a rotor by name (case-insensitive).
    #[must_use]
    pub fn rotor(&self, name: &str) -> Option<&RotorDefinition> {
        self.rotors.get(&normalize_name(name))
    }

    /// Look up a reflector by name (case-insensitive).
    #[must_use]
    pub fn reflector(&self, name: &str) -> Option<&ReflectorDefinition> {
        self.reflectors.get(&normalize_name(name))
    }

    /// Rotor names in sorted order.
    pub fn rotor_names(&self) -> impl Iterator<Item = &str> {
        self.rotors.keys().map(String::as_str)
    }

    /// Reflector names in sorted order.
    pub fn reflector_names(&self) -> impl Iterator<Item = &str> {
        self.reflectors.keys().map(String::as_str)
    }

    /// Default rotor order, left to right.
    #[must_use]
    pub fn default_rotor_order(&self) -> &[String; 3] {
        &self.default_rotor_order
    }

    #[must_use]
    pub fn default_reflector(&self) -> &str {
        &self.default_reflector
    }

    /// Split a rotor order such as `"I-II-III"` into three known rotor names.
    pub fn parse_rotor_order(&self, order: &str) -> Result<[String; 3], EnigmaError> {
        let names: Vec<String> = order
            .split(ROTOR_ORDER_SEPARATOR)
            .map(normalize_name)
            .collect();
        let names: [String; 3] = names
            .try_into()
            .map_err(|_| EnigmaError::InvalidRotorOrder(order.trim().to_owned()))?;
        if let Some(unknown) = names.iter().find(|name| !self.rotors.contains_key(*name)) {
            return Err(EnigmaError::UnknownRotorName(unknown.clone()));
        }
        Ok(names)
    }
}

fn entry_error(entry: String, source: EnigmaError) -> EnigmaError {
    EnigmaError::InvalidCatalogEntry {
        entry,
        source: Box::new(source),
    }
}

fn canonical_wiring(images: &str, alphabet: &Arc<Alphabet>) -> Result<String, EnigmaError> {
    Permutation::new(images, Arc::clone(alphabet)).map(|p| p.as_str().to_owned())
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_spec() -> CatalogSpec {
        CatalogSpec {
            alphabet: "ABCDEF".into(),
            rotors: BTreeMap::from([
                (
                    "x".into(),
                    RotorSpec {
                        permutation: "BFADCE".into(),
                        notch: "cb".into(),
                    },
                ),
                (
                    "Y".into(),
                    RotorSpec {
                        permutation: "CDEFAB".into(),
                        notch: "A".into(),
                    },
                ),
            ]),
            reflectors: BTreeMap::from([("r".into(), "badcfe".into())]),
            defaults: Defaults {
                rotor_order: "X-Y-X".into(),
                reflector: "R".into(),
            },
        }
    }

    #[test]
    fn m3_catalog_loads() {
        let catalog = Catalog::m3();
        assert_eq!(catalog.alphabet().len(), 26);
        assert_eq!(catalog.rotor_names().count(), 8);
        assert_eq!(
            catalog.reflector_names().collect::<Vec<_>>(),
            vec!["A", "B", "C"]
        );
        assert_eq!(catalog.default_rotor_order(), &["I", "II", "III"].map(String::from));
        assert_eq!(catalog.default_reflector(), "B");
        assert_eq!(catalog.rotor("vi").map(RotorDefinition::notches), Some("MZ"));
    }

    #[test]
    fn names_and_wirings_are_normalized() {
        let catalog = Catalog::load(&toy_spec()).unwrap();
        assert_eq!(catalog.rotor_names().collect::<Vec<_>>(), vec!["X", "Y"]);
        assert_eq!(catalog.rotor("x").map(RotorDefinition::notches), Some("BC"));
        assert_eq!(
            catalog.reflector("R").map(ReflectorDefinition::permutation),
            Some("BADCFE")
        );
        assert!(catalog.rotor("Z").is_none());
    }

    #[test]
    fn bad_wiring_names_the_entry() {
        let mut spec = toy_spec();
        spec.rotors.get_mut("Y").unwrap().permutation = "CDEFAA".into();
        let err = Catalog::load(&spec).unwrap_err();
        assert_eq!(
            err,
            EnigmaError::InvalidCatalogEntry {
                entry: "rotor Y".into(),
                source: Box::new(EnigmaError::DuplicateImage('A')),
            }
        );
    }

    #[test]
    fn bad_notch_fails_fast() {
        let mut spec = toy_spec();
        spec.rotors.get_mut("x").unwrap().notch = "Q".into();
        assert!(matches!(
            Catalog::load(&spec),
            Err(EnigmaError::InvalidCatalogEntry { ref entry, .. }) if entry == "rotor x"
        ));
    }

    #[test]
    fn bad_reflector_wiring_fails_fast() {
        let mut spec = toy_spec();
        spec.reflectors.insert("S".into(), "ABC".into());
        let err = Catalog::load(&spec).unwrap_err();
        assert!(err.to_string().contains("reflector S"));
    }

    #[test]
    fn names_equal_after_folding_are_rejected() {
        let mut spec = toy_spec();
        let y = spec.rotors["Y"].clone();
        spec.rotors.insert("X".into(), y);
        assert_eq!(
            Catalog::load(&spec),
            Err(EnigmaError::InvalidCatalogEntry {
                entry: "rotor x".into(),
                source: Box::new(EnigmaError::DuplicateName("X".into())),
            })
        );

        let mut spec = toy_spec();
        spec.reflectors.insert("R".into(), "FEDCBA".into());
        let err = Catalog::load(&spec).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid catalog entry reflector r: name R is defined more than once"
        );
    }

    #[test]
    fn defaults_are_checked() {
        let mut spec = toy_spec();
        spec.defaults.rotor_order = "X-Y".into();
        assert!(matches!(
            Catalog::load(&spec),
            Err(EnigmaError::InvalidCatalogEntry { ref source, .. })
                if **source == EnigmaError::InvalidRotorOrder("X-Y".into())
        ));

        let mut spec = toy_spec();
        spec.defaults.reflector = "Q".into();
        assert!(matches!(
            Catalog::load(&spec),
            Err(EnigmaError::InvalidCatalogEntry { ref source, .. })
                if **source == EnigmaError::UnknownReflectorName("Q".into())
        ));
    }

    #[test]
    fn parse_rotor_order() {
        let catalog = Catalog::m3();
        assert_eq!(
            catalog.parse_rotor_order(" iv - v-i "),
            Ok(["IV", "V", "I"].map(String::from))
        );
        assert_eq!(
            catalog.parse_rotor_order("I-II"),
            Err(EnigmaError::InvalidRotorOrder("I-II".into()))
        );
        assert_eq!(
            catalog.parse_rotor_order("I-II-III-IV"),
            Err(EnigmaError::InvalidRotorOrder("I-II-III-IV".into()))
        );
        assert_eq!(
            catalog.parse_rotor_order("I-II-IX"),
            Err(EnigmaError::UnknownRotorName("IX".into()))
        );
    }

    #[test]
    fn bad_alphabet() {
        let mut spec = toy_spec();
        spec.alphabet = "ABCA".into();
        assert!(matches!(
            Catalog::load(&spec),
            Err(EnigmaError::InvalidCatalogEntry { ref entry, .. }) if entry == "alphabet"
        ));
    }
}
