#![no_main]

use libfuzzer_sys::fuzz_target;

use enigma_core::Enigma;

fuzz_target!(|data: &str| {
    let mut machine = Enigma::m3();
    let before = machine.plugboard().to_owned();
    let valid = machine.validate_plugboard(data).is_ok();

    match machine.set_plugboard(data) {
        Ok(()) => {
            assert!(valid);
            assert!(machine.plugboard_permutation().is_involution());
            // The canonical setting parses back to the same wiring.
            let canonical = machine.plugboard().to_owned();
            let wiring = machine.plugboard_permutation().as_str().to_owned();
            machine.set_plugboard(&canonical).unwrap();
            assert_eq!(machine.plugboard_permutation().as_str(), wiring);
        }
        Err(_) => {
            assert!(!valid);
            assert_eq!(machine.plugboard(), before);
        }
    }
});
