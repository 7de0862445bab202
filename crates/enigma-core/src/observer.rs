#![forbid(unsafe_code)]

//! Change notifications from an [`Enigma`](crate::machine::Enigma).
//!
//! Observers implement [`MachineObserver`], overriding only the callbacks they
//! care about. The machine owns its observers and calls them synchronously, in
//! registration order, after each committed change.
//!
//! # Invariants
//!
//! 1. Callbacks fire only after the change is committed; a failed mutation
//!    notifies nobody.
//! 2. A rotor-order change emits `on_rotor_order_change` first, then one
//!    `on_rotor_change` per position, left to right.
//! 3. Observers receive shared views of machine data and cannot reach the
//!    machine itself.
//! 4. Observers are `Send`, so a machine can move between threads behind a
//!    lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::permutation::{LastValue, Permutation};
use crate::position::RotorPosition;

/// Forward and inverse lookups through one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTrace {
    pub forward: LastValue,
    pub inverse: LastValue,
}

/// Per-stage signal path of the most recent encryption.
///
/// Rotor pairs are taken at the wiring itself, after the indicator/ring
/// offset has been applied, which is what a wiring diagram highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptTrace {
    pub plugboard: StageTrace,
    /// Left, middle, right.
    pub rotors: [StageTrace; 3],
    pub reflector: LastValue,
}

impl EncryptTrace {
    #[must_use]
    pub fn rotor(&self, position: RotorPosition) -> &StageTrace {
        &self.rotors[position.index()]
    }
}

/// Listener for machine changes. Every method defaults to a no-op.
pub trait MachineObserver: Send {
    fn on_plugboard_change(&mut self, _permutation: &Permutation, _setting: &str) {}
    fn on_reflector_change(&mut self, _name: &str) {}
    fn on_rotor_order_change(&mut self, _order: &str) {}
    fn on_rotor_change(&mut self, _position: RotorPosition, _name: &str) {}
    fn on_ring_setting_change(&mut self, _value: &str) {}
    fn on_indicator_change(&mut self, _value: &str) {}
    fn on_ring_locked(&mut self, _locked: bool) {}
    fn on_encrypt(&mut self, _trace: &EncryptTrace) {}
}

/// Tagged form of every [`MachineObserver`] callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineEvent {
    /// New plugboard wiring (image string) and canonical setting.
    PlugboardChanged { wiring: String, setting: String },
    ReflectorChanged(String),
    RotorOrderChanged(String),
    RotorChanged {
        position: RotorPosition,
        name: String,
    },
    RingSettingChanged(String),
    IndicatorChanged(String),
    RingLockChanged(bool),
    Encrypted(EncryptTrace),
}

/// Observer that records every callback as a [`MachineEvent`].
///
/// Clones share one log, so a test or UI can keep a handle after handing a
/// clone to [`Enigma::add_observer`](crate::machine::Enigma::add_observer).
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<MachineEvent>>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<MachineEvent> {
        self.lock().clone()
    }

    /// Remove and return the recorded events.
    pub fn take(&self) -> Vec<MachineEvent> {
        std::mem::take(&mut *self.lock())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn push(&self, event: MachineEvent) {
        self.lock().push(event);
    }

    // A panicking observer elsewhere must not hide what was recorded.
    fn lock(&self) -> MutexGuard<'_, Vec<MachineEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MachineObserver for EventLog {
    fn on_plugboard_change(&mut self, permutation: &Permutation, setting: &str) {
        self.push(MachineEvent::PlugboardChanged {
            wiring: permutation.as_str().to_owned(),
            setting: setting.to_owned(),
        });
    }

    fn on_reflector_change(&mut self, name: &str) {
        self.push(MachineEvent::ReflectorChanged(name.to_owned()));
    }

    fn on_rotor_order_change(&mut self, order: &str) {
        self.push(MachineEvent::RotorOrderChanged(order.to_owned()));
    }

    fn on_rotor_change(&mut self, position: RotorPosition, name: &str) {
        self.push(MachineEvent::RotorChanged {
            position,
            name: name.to_owned(),
        });
    }

    fn on_ring_setting_change(&mut self, value: &str) {
        self.push(MachineEvent::RingSettingChanged(value.to_owned()));
    }

    fn on_indicator_change(&mut self, value: &str) {
        self.push(MachineEvent::IndicatorChanged(value.to_owned()));
    }

    fn on_ring_locked(&mut self, locked: bool) {
        self.push(MachineEvent::RingLockChanged(locked));
    }

    fn on_encrypt(&mut self, trace: &EncryptTrace) {
        self.push(MachineEvent::Encrypted(*trace));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Quiet;
    impl MachineObserver for Quiet {}

    #[test]
    fn clones_share_one_log() {
        let log = EventLog::new();
        let mut handle = log.clone();
        handle.on_indicator_change("ABC");
        handle.on_ring_locked(false);
        assert_eq!(
            log.events(),
            vec![
                MachineEvent::IndicatorChanged("ABC".into()),
                MachineEvent::RingLockChanged(false)
            ]
        );
        assert_eq!(log.take().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn log_is_shared_across_threads() {
        let log = EventLog::new();
        let mut handle = log.clone();
        std::thread::spawn(move || handle.on_reflector_change("C"))
            .join()
            .unwrap();
        assert_eq!(log.events(), vec![MachineEvent::ReflectorChanged("C".into())]);
    }

    #[test]
    fn default_methods_are_no_ops() {
        let mut quiet = Quiet;
        quiet.on_reflector_change("B");
        quiet.on_rotor_change(RotorPosition::Left, "I");
    }
}
