#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use enigma_core::Enigma;

#[derive(Debug, Arbitrary)]
struct Settings {
    rotor_order: String,
    reflector: String,
    rings: String,
    indicator: String,
    plugboard: String,
    position: usize,
    symbol: char,
    text: String,
}

fuzz_target!(|settings: Settings| {
    let mut machine = Enigma::m3();

    // Each setter either commits or leaves the machine untouched.
    let before = machine.save_state();
    if machine.set_rotor_order(&settings.rotor_order).is_err() {
        assert_eq!(machine.save_state(), before);
    }
    let before = machine.save_state();
    if machine.set_reflector(&settings.reflector).is_err() {
        assert_eq!(machine.reflector(), "B");
    }
    if machine.set_ring_setting(&settings.rings).is_err() {
        assert_eq!(machine.save_state(), before);
    }
    let before = machine.save_state();
    if machine.set_indicator(&settings.indicator).is_err() {
        assert_eq!(machine.save_state(), before);
    }
    let _ = machine.set_plugboard(&settings.plugboard);
    let before = machine.save_state();
    if machine
        .set_indicator_at_index(settings.position, settings.symbol)
        .is_err()
    {
        assert_eq!(machine.save_state(), before);
    }

    let start = machine.save_state();
    match machine.encrypt_message(&settings.text) {
        Ok(cipher) => {
            assert_eq!(cipher.chars().count(), settings.text.chars().count());
            let mut receiver = Enigma::m3();
            receiver.set_reflector(machine.reflector()).unwrap();
            assert!(receiver.load_state(&start).is_empty());
            let plain = receiver.encrypt_message(&cipher).unwrap();
            let expected: String = settings.text.chars().map(|c| c.to_ascii_uppercase()).collect();
            assert_eq!(plain, expected);
        }
        Err(_) => assert_eq!(machine.save_state(), start),
    }
});
