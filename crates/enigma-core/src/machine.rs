#![forbid(unsafe_code)]

//! The three-rotor machine: configuration, stepping, and the encryption path.
//!
//! [`Enigma`] owns a [`Catalog`], a plugboard, three rotors (left, middle,
//! right), a reflector and its observers. Every setter has a `validate_*`
//! twin that runs the same checks without committing.
//!
//! # Invariants
//!
//! 1. A failed setter leaves the machine exactly as it was and notifies nobody.
//! 2. Stepping is evaluated against the pre-step state: a middle rotor on its
//!    notch advances itself and the left rotor (the double step).
//! 3. An invalid symbol never steps the machine; [`Enigma::encrypt_message`]
//!    rejects the whole message before the first step.
//! 4. Changing the rotor order keeps indicators and ring settings per position.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Bad rotor order | Not three names, or unknown name | `InvalidRotorOrder` / `UnknownRotorName` |
//! | Bad field string | Length ≠ 3 or unknown symbol | `WrongFieldLength` / `InvalidSymbol` |
//! | Bad position | Index outside `0..3` | `InvalidIndex` |
//! | Bad state entry | Any of the above while loading | [`StateDiagnostic`], entry skipped |

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::catalog::{Catalog, ROTOR_ORDER_SEPARATOR, normalize_name};
use crate::error::{EnigmaError, RotorField};
use crate::observer::{EncryptTrace, MachineObserver, StageTrace};
use crate::permutation::Permutation;
use crate::plugboard::Plugboard;
use crate::position::RotorPosition;
use crate::rotor::Rotor;
use crate::state::{
    FlatState, INDICATOR, KEYS, LOCKED, PLUGBOARD, RING_SETTING, ROTOR_ORDER, StateDiagnostic,
    decode_bool, encode_bool,
};

pub struct Enigma {
    catalog: Catalog,
    alphabet: Arc<Alphabet>,
    plugboard: Plugboard,
    /// Left, middle, right.
    rotors: [Rotor; 3],
    reflector: Rotor,
    rotor_order: String,
    reflector_name: String,
    ring_locked: bool,
    observers: Vec<Box<dyn MachineObserver>>,
}

impl fmt::Debug for Enigma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enigma")
            .field("rotor_order", &self.rotor_order)
            .field("reflector", &self.reflector_name)
            .field("indicator", &self.indicator())
            .field("ring_setting", &self.ring_setting())
            .field("plugboard", &self.plugboard.setting())
            .field("ring_locked", &self.ring_locked)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Enigma {
    /// Build a machine from the catalog defaults, with every indicator and
    /// ring setting at the first symbol and an empty plugboard.
    pub fn new(catalog: Catalog) -> Result<Self, EnigmaError> {
        let alphabet = Arc::clone(catalog.alphabet());
        let names = catalog.default_rotor_order().clone();
        let rotors = build_rotors(&catalog, &names)?;
        let reflector_name = catalog.default_reflector().to_owned();
        let reflector = build_reflector(&catalog, &reflector_name)?;
        Ok(Self {
            plugboard: Plugboard::new(Arc::clone(&alphabet)),
            rotor_order: names.join(ROTOR_ORDER_SEPARATOR),
            catalog,
            alphabet,
            rotors,
            reflector,
            reflector_name,
            ring_locked: true,
            observers: Vec::new(),
        })
    }

    /// A machine over the standard M3 catalog.
    #[must_use]
    pub fn m3() -> Self {
        Self::new(Catalog::m3()).expect("M3 catalog defaults are valid")
    }

    /// Register an observer. Observers are notified in registration order.
    pub fn add_observer(&mut self, observer: impl MachineObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ---- configuration ----

    /// Select three catalog rotors, e.g. `"IV-II-V"`.
    ///
    /// Indicators and ring settings stay with their positions.
    pub fn set_rotor_order(&mut self, order: &str) -> Result<(), EnigmaError> {
        let names = self.catalog.parse_rotor_order(order)?;
        let mut rotors = build_rotors(&self.catalog, &names)?;
        for (new, old) in rotors.iter_mut().zip(&self.rotors) {
            new.set_indicator(old.indicator() as i64);
            new.set_ring_setting(old.ring_setting() as i64);
        }
        self.rotors = rotors;
        self.rotor_order = names.join(ROTOR_ORDER_SEPARATOR);
        tracing::debug!(rotor_order = %self.rotor_order, "rotor order set");

        for observer in &mut self.observers {
            observer.on_rotor_order_change(&self.rotor_order);
        }
        for position in RotorPosition::ALL {
            let name = &names[position.index()];
            for observer in &mut self.observers {
                observer.on_rotor_change(position, name);
            }
        }
        Ok(())
    }

    pub fn validate_rotor_order(&self, order: &str) -> Result<(), EnigmaError> {
        let names = self.catalog.parse_rotor_order(order)?;
        build_rotors(&self.catalog, &names).map(|_| ())
    }

    pub fn set_reflector(&mut self, name: &str) -> Result<(), EnigmaError> {
        let name = normalize_name(name);
        self.reflector = build_reflector(&self.catalog, &name)?;
        self.reflector_name = name;
        tracing::debug!(reflector = %self.reflector_name, "reflector set");

        for observer in &mut self.observers {
            observer.on_reflector_change(&self.reflector_name);
        }
        Ok(())
    }

    pub fn validate_reflector(&self, name: &str) -> Result<(), EnigmaError> {
        build_reflector(&self.catalog, &normalize_name(name)).map(|_| ())
    }

    /// Set all three indicators from a 3-symbol string, left to right.
    pub fn set_indicator(&mut self, value: &str) -> Result<(), EnigmaError> {
        self.set_field(RotorField::Indicator, value)
    }

    pub fn validate_indicator(&self, value: &str) -> Result<(), EnigmaError> {
        self.parse_field(RotorField::Indicator, value).map(|_| ())
    }

    /// Set all three ring settings from a 3-symbol string, left to right.
    pub fn set_ring_setting(&mut self, value: &str) -> Result<(), EnigmaError> {
        self.set_field(RotorField::RingSetting, value)
    }

    pub fn validate_ring_setting(&self, value: &str) -> Result<(), EnigmaError> {
        self.parse_field(RotorField::RingSetting, value).map(|_| ())
    }

    pub fn set_indicator_at(
        &mut self,
        position: RotorPosition,
        symbol: char,
    ) -> Result<(), EnigmaError> {
        self.set_field_at(RotorField::Indicator, position, symbol)
    }

    pub fn set_ring_setting_at(
        &mut self,
        position: RotorPosition,
        symbol: char,
    ) -> Result<(), EnigmaError> {
        self.set_field_at(RotorField::RingSetting, position, symbol)
    }

    /// Positional form of [`Enigma::set_indicator_at`]: 0 is left, 2 is right.
    pub fn set_indicator_at_index(&mut self, index: usize, symbol: char) -> Result<(), EnigmaError> {
        let position = RotorPosition::from_index(index).ok_or(EnigmaError::InvalidIndex(index))?;
        self.set_indicator_at(position, symbol)
    }

    pub fn set_ring_setting_at_index(
        &mut self,
        index: usize,
        symbol: char,
    ) -> Result<(), EnigmaError> {
        let position = RotorPosition::from_index(index).ok_or(EnigmaError::InvalidIndex(index))?;
        self.set_ring_setting_at(position, symbol)
    }

    /// Replace the plugboard wiring, e.g. `"AB CD EF"`.
    pub fn set_plugboard(&mut self, value: &str) -> Result<(), EnigmaError> {
        self.plugboard.set_to(value)?;
        tracing::debug!(plugboard = %self.plugboard.setting(), "plugboard set");

        for observer in &mut self.observers {
            observer.on_plugboard_change(self.plugboard.permutation(), self.plugboard.setting());
        }
        Ok(())
    }

    pub fn validate_plugboard(&self, value: &str) -> Result<(), EnigmaError> {
        self.plugboard.validate(value)
    }

    /// Store the ring-lock flag. It has no effect on encryption.
    pub fn set_ring_locked(&mut self, locked: bool) {
        self.ring_locked = locked;
        tracing::debug!(locked, "ring lock set");

        for observer in &mut self.observers {
            observer.on_ring_locked(locked);
        }
    }

    // ---- queries ----

    #[must_use]
    pub fn ring_locked(&self) -> bool {
        self.ring_locked
    }

    /// Current indicators, left to right, e.g. `"ADU"`.
    #[must_use]
    pub fn indicator(&self) -> String {
        self.field_summary(RotorField::Indicator)
    }

    #[must_use]
    pub fn ring_setting(&self) -> String {
        self.field_summary(RotorField::RingSetting)
    }

    /// Canonical rotor order, e.g. `"I-II-III"`.
    #[must_use]
    pub fn rotor_order(&self) -> &str {
        &self.rotor_order
    }

    #[must_use]
    pub fn reflector(&self) -> &str {
        &self.reflector_name
    }

    /// Canonical plugboard setting.
    #[must_use]
    pub fn plugboard(&self) -> &str {
        self.plugboard.setting()
    }

    #[must_use]
    pub fn plugboard_permutation(&self) -> &Permutation {
        self.plugboard.permutation()
    }

    #[must_use]
    pub fn reflector_permutation(&self) -> &Permutation {
        self.reflector.permutation()
    }

    #[must_use]
    pub fn rotor(&self, position: RotorPosition) -> &Rotor {
        &self.rotors[position.index()]
    }

    #[must_use]
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn is_valid_symbol(&self, symbol: char) -> bool {
        self.alphabet.valid(symbol)
    }

    /// Signal path of the most recent encryption.
    ///
    /// `None` until a symbol has passed through every current stage; a rotor
    /// order or reflector change clears the affected stages.
    #[must_use]
    pub fn last_values(&self) -> Option<EncryptTrace> {
        let [left, middle, right] = &self.rotors;
        Some(EncryptTrace {
            plugboard: stage_trace(self.plugboard.permutation())?,
            rotors: [
                stage_trace(left.permutation())?,
                stage_trace(middle.permutation())?,
                stage_trace(right.permutation())?,
            ],
            reflector: self.reflector.permutation().last_forward()?,
        })
    }

    // ---- stepping and encryption ----

    /// Advance the rotors by one keystroke.
    pub fn step(&mut self) {
        let [left, middle, right] = &mut self.rotors;
        let middle_on_notch = middle.is_on_notch();
        let right_on_notch = right.is_on_notch();
        if middle_on_notch {
            left.step();
        }
        if middle_on_notch || right_on_notch {
            middle.step();
        }
        right.step();
        self.notify_field(RotorField::Indicator);
    }

    /// Encrypt one symbol at the current rotor positions.
    pub fn encrypt_single_no_step(&mut self, symbol: char) -> Result<char, EnigmaError> {
        self.alphabet.index_of(symbol)?;
        let output = self.scramble(symbol)?;
        if let Some(trace) = self.last_values() {
            for observer in &mut self.observers {
                observer.on_encrypt(&trace);
            }
        }
        Ok(output)
    }

    /// Step, then encrypt one symbol. An invalid symbol does not step.
    pub fn step_and_encrypt_single(&mut self, symbol: char) -> Result<char, EnigmaError> {
        self.alphabet.index_of(symbol)?;
        self.step();
        let output = self.encrypt_single_no_step(symbol)?;
        tracing::trace!(
            input = %symbol,
            output = %output,
            indicator = %self.indicator(),
            "keystroke"
        );
        Ok(output)
    }

    /// Encrypt a message, stepping before every symbol.
    ///
    /// The whole message is checked first; on error the machine has not moved.
    pub fn encrypt_message(&mut self, text: &str) -> Result<String, EnigmaError> {
        let _span = tracing::debug_span!(
            "encrypt_message",
            len = text.chars().count(),
            indicator = %self.indicator()
        )
        .entered();

        if let Some(symbol) = self.alphabet.first_invalid(text) {
            return Err(EnigmaError::InvalidSymbol(symbol));
        }
        text.chars()
            .map(|symbol| self.step_and_encrypt_single(symbol))
            .collect()
    }

    // ---- flat state ----

    /// Snapshot every setting as flat key-value pairs.
    #[must_use]
    pub fn save_state(&self) -> FlatState {
        let mut state = FlatState::new();
        state.set(ROTOR_ORDER, self.rotor_order.as_str());
        state.set(RING_SETTING, self.ring_setting());
        state.set(INDICATOR, self.indicator());
        state.set(PLUGBOARD, self.plugboard.setting());
        state.set(LOCKED, encode_bool(self.ring_locked));
        state
    }

    /// Apply every recognized key present in `state`.
    ///
    /// Keys are applied one by one in [`KEYS`] order; a value that fails to
    /// apply is skipped and reported. Unrecognized keys are ignored.
    pub fn load_state(&mut self, state: &FlatState) -> Vec<StateDiagnostic> {
        let mut diagnostics = Vec::new();
        for key in KEYS {
            let Some(value) = state.get(key) else {
                continue;
            };
            let applied = match key {
                ROTOR_ORDER => self.set_rotor_order(value).map_err(|e| e.to_string()),
                RING_SETTING => self.set_ring_setting(value).map_err(|e| e.to_string()),
                INDICATOR => self.set_indicator(value).map_err(|e| e.to_string()),
                PLUGBOARD => self.set_plugboard(value).map_err(|e| e.to_string()),
                _ => match decode_bool(value) {
                    Some(locked) => {
                        self.set_ring_locked(locked);
                        Ok(())
                    }
                    None => Err("must be \"0\" or \"1\"".to_owned()),
                },
            };
            if let Err(reason) = applied {
                tracing::warn!(key, value, %reason, "skipping invalid state value");
                diagnostics.push(StateDiagnostic {
                    key,
                    value: value.to_owned(),
                    reason,
                });
            }
        }
        diagnostics
    }

    // ---- internals ----

    fn scramble(&mut self, symbol: char) -> Result<char, EnigmaError> {
        let [left, middle, right] = &mut self.rotors;
        let mut signal = self.plugboard.forward(symbol)?;
        signal = right.forward(signal)?;
        signal = middle.forward(signal)?;
        signal = left.forward(signal)?;
        signal = self.reflector.forward(signal)?;
        signal = left.inverse(signal)?;
        signal = middle.inverse(signal)?;
        signal = right.inverse(signal)?;
        self.plugboard.inverse(signal)
    }

    fn parse_field(&self, field: RotorField, value: &str) -> Result<[usize; 3], EnigmaError> {
        let len = value.chars().count();
        if len != 3 {
            return Err(EnigmaError::WrongFieldLength { field, len });
        }
        let mut indices = [0; 3];
        for (slot, symbol) in indices.iter_mut().zip(value.chars()) {
            *slot = self.alphabet.index_of(symbol)?;
        }
        Ok(indices)
    }

    fn set_field(&mut self, field: RotorField, value: &str) -> Result<(), EnigmaError> {
        let indices = self.parse_field(field, value)?;
        for (rotor, index) in self.rotors.iter_mut().zip(indices) {
            set_rotor_field(rotor, field, index);
        }
        self.commit_field(field);
        Ok(())
    }

    fn set_field_at(
        &mut self,
        field: RotorField,
        position: RotorPosition,
        symbol: char,
    ) -> Result<(), EnigmaError> {
        let index = self.alphabet.index_of(symbol)?;
        set_rotor_field(&mut self.rotors[position.index()], field, index);
        self.commit_field(field);
        Ok(())
    }

    fn commit_field(&mut self, field: RotorField) {
        tracing::debug!(%field, value = %self.field_summary(field), "rotor field set");
        self.notify_field(field);
    }

    fn notify_field(&mut self, field: RotorField) {
        if self.observers.is_empty() {
            return;
        }
        let value = self.field_summary(field);
        for observer in &mut self.observers {
            match field {
                RotorField::Indicator => observer.on_indicator_change(&value),
                RotorField::RingSetting => observer.on_ring_setting_change(&value),
            }
        }
    }

    fn field_summary(&self, field: RotorField) -> String {
        let indices = self.rotors.each_ref().map(|rotor| match field {
            RotorField::Indicator => rotor.indicator(),
            RotorField::RingSetting => rotor.ring_setting(),
        });
        self.alphabet.from_indices(&indices)
    }
}

fn set_rotor_field(rotor: &mut Rotor, field: RotorField, index: usize) {
    match field {
        RotorField::Indicator => rotor.set_indicator(index as i64),
        RotorField::RingSetting => rotor.set_ring_setting(index as i64),
    }
}

fn build_rotors(catalog: &Catalog, names: &[String; 3]) -> Result<[Rotor; 3], EnigmaError> {
    let build = |name: &String| -> Result<Rotor, EnigmaError> {
        catalog
            .rotor(name)
            .ok_or_else(|| EnigmaError::UnknownRotorName(name.clone()))?
            .build(catalog.alphabet())
    };
    Ok([build(&names[0])?, build(&names[1])?, build(&names[2])?])
}

fn build_reflector(catalog: &Catalog, name: &str) -> Result<Rotor, EnigmaError> {
    catalog
        .reflector(name)
        .ok_or_else(|| EnigmaError::UnknownReflectorName(name.to_owned()))?
        .build(catalog.alphabet())
}

fn stage_trace(permutation: &Permutation) -> Option<StageTrace> {
    Some(StageTrace {
        forward: permutation.last_forward()?,
        inverse: permutation.last_inverse()?,
    })
}
