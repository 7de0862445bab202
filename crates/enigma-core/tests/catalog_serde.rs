//! Catalog and flat-state records through serde (requires the `serde` feature).

#![cfg(feature = "serde")]

use enigma_core::{Catalog, CatalogSpec, Enigma, EnigmaError, FlatState};

const TOY_CATALOG: &str = r#"{
    "alphabet": "ABCDEF",
    "rotors": {
        "n": { "permutation": "BFADCE", "notch": "C" },
        "plain": { "permutation": "ABCDEF" }
    },
    "reflectors": { "r": "BADCFE" },
    "defaults": { "rotor_order": "N-N-PLAIN", "reflector": "R" }
}"#;

#[test]
fn json_catalog_builds_a_machine() {
    let spec: CatalogSpec = serde_json::from_str(TOY_CATALOG).unwrap();
    assert_eq!(spec.rotors["plain"].notch, "");

    let catalog = Catalog::load(&spec).unwrap();
    assert_eq!(catalog.rotor_names().collect::<Vec<_>>(), ["N", "PLAIN"]);

    let mut machine = Enigma::new(catalog).unwrap();
    assert_eq!(machine.rotor_order(), "N-N-PLAIN");
    let cipher = machine.encrypt_message("ABCDEF").unwrap();
    machine.set_indicator("AAA").unwrap();
    assert_eq!(machine.encrypt_message(&cipher).unwrap(), "ABCDEF");
}

#[test]
fn m3_spec_survives_json() {
    let json = serde_json::to_string(&CatalogSpec::m3()).unwrap();
    let spec: CatalogSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(Catalog::load(&spec).unwrap(), Catalog::m3());
}

#[test]
fn invalid_json_catalog_names_the_entry() {
    let json = TOY_CATALOG.replace("BADCFE", "BADCFF");
    let spec: CatalogSpec = serde_json::from_str(&json).unwrap();
    let err = Catalog::load(&spec).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid catalog entry reflector r: Invalid permutation: letter F used more than once"
    );
    assert!(matches!(err, EnigmaError::InvalidCatalogEntry { .. }));
}

#[test]
fn saved_state_as_json() {
    let mut machine = Enigma::m3();
    machine.set_indicator("QEV").unwrap();
    machine.set_ring_locked(false);
    let json = serde_json::to_value(machine.save_state()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "indicator": "QEV",
            "locked": "0",
            "plugboard": "",
            "ring_setting": "AAA",
            "rotor_order": "I-II-III",
        })
    );

    let state: FlatState = serde_json::from_value(json).unwrap();
    let mut restored = Enigma::m3();
    assert!(restored.load_state(&state).is_empty());
    assert_eq!(restored.indicator(), "QEV");
    assert!(!restored.ring_locked());
}
