//! Machine configuration from files and flags.
//!
//! Precedence, lowest to highest: catalog defaults, `--state` file, individual
//! setting flags.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use enigma_core::{Catalog, CatalogSpec, Enigma, EnigmaError, FlatState};

use crate::error::CliError;

#[derive(Debug, Default, Args)]
pub struct MachineArgs {
    /// Catalog file (JSON, or TOML with a `.toml` extension); defaults to the M3 catalog
    #[arg(long, global = true, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Flat machine state (JSON) applied before the individual setting flags
    #[arg(long, global = true, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Rotor order, left to right, e.g. `IV-II-V`
    #[arg(long, global = true)]
    pub rotors: Option<String>,

    /// Reflector name, e.g. `B`
    #[arg(long, global = true)]
    pub reflector: Option<String>,

    /// Ring settings, left to right, e.g. `BUL`
    #[arg(long, global = true)]
    pub rings: Option<String>,

    /// Start indicators, left to right, e.g. `AAA`
    #[arg(long, global = true)]
    pub indicator: Option<String>,

    /// Plugboard pairs, e.g. `"AV BS CG"`
    #[arg(long, global = true)]
    pub plugboard: Option<String>,

    /// Clear the ring-lock flag
    #[arg(long, global = true)]
    pub unlocked: bool,
}

/// Outcome of checking one setting flag.
#[derive(Debug)]
pub struct Check {
    pub flag: &'static str,
    pub value: String,
    pub result: Result<(), EnigmaError>,
}

impl MachineArgs {
    /// The `--catalog` file, or the built-in M3 catalog.
    pub fn catalog_or_default(&self) -> Result<Catalog, CliError> {
        match &self.catalog {
            Some(path) => load_catalog(path),
            None => Ok(Catalog::m3()),
        }
    }

    /// Catalog and state file applied; setting flags not yet applied.
    pub fn base_machine(&self) -> Result<Enigma, CliError> {
        let mut machine = Enigma::new(self.catalog_or_default()?)?;
        if let Some(path) = &self.state {
            let diagnostics = machine.load_state(&load_state(path)?);
            tracing::debug!(
                path = %path.display(),
                skipped = diagnostics.len(),
                "state file applied"
            );
        }
        Ok(machine)
    }

    /// Fully configured machine.
    pub fn build(&self) -> Result<Enigma, CliError> {
        let mut machine = self.base_machine()?;
        self.apply(&mut machine)?;
        Ok(machine)
    }

    /// Apply every given flag; stops at the first invalid one.
    pub fn apply(&self, machine: &mut Enigma) -> Result<(), CliError> {
        let setting = |flag: &'static str| {
            move |source: EnigmaError| CliError::Setting { flag, source }
        };
        if let Some(order) = &self.rotors {
            machine.set_rotor_order(order).map_err(setting("--rotors"))?;
        }
        if let Some(name) = &self.reflector {
            machine.set_reflector(name).map_err(setting("--reflector"))?;
        }
        if let Some(rings) = &self.rings {
            machine.set_ring_setting(rings).map_err(setting("--rings"))?;
        }
        if let Some(indicator) = &self.indicator {
            machine.set_indicator(indicator).map_err(setting("--indicator"))?;
        }
        if let Some(pairs) = &self.plugboard {
            machine.set_plugboard(pairs).map_err(setting("--plugboard"))?;
        }
        if self.unlocked {
            machine.set_ring_locked(false);
        }
        Ok(())
    }

    /// Validate every given flag against `machine` without applying any.
    pub fn checks(&self, machine: &Enigma) -> Vec<Check> {
        let mut checks = Vec::new();
        push_check(&mut checks, "--rotors", &self.rotors, |v| {
            machine.validate_rotor_order(v)
        });
        push_check(&mut checks, "--reflector", &self.reflector, |v| {
            machine.validate_reflector(v)
        });
        push_check(&mut checks, "--rings", &self.rings, |v| {
            machine.validate_ring_setting(v)
        });
        push_check(&mut checks, "--indicator", &self.indicator, |v| {
            machine.validate_indicator(v)
        });
        push_check(&mut checks, "--plugboard", &self.plugboard, |v| {
            machine.validate_plugboard(v)
        });
        checks
    }
}

fn push_check(
    checks: &mut Vec<Check>,
    flag: &'static str,
    value: &Option<String>,
    validate: impl Fn(&str) -> Result<(), EnigmaError>,
) {
    if let Some(value) = value {
        checks.push(Check {
            flag,
            value: value.clone(),
            result: validate(value),
        });
    }
}

pub fn load_catalog(path: &Path) -> Result<Catalog, CliError> {
    let text = read(path)?;
    let spec: CatalogSpec = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&text).map_err(|source| CliError::Toml {
            path: path.to_owned(),
            source,
        })?
    } else {
        serde_json::from_str(&text).map_err(|source| CliError::Json {
            path: path.to_owned(),
            source,
        })?
    };
    Catalog::load(&spec).map_err(|source| CliError::Catalog {
        path: path.to_owned(),
        source,
    })
}

pub fn load_state(path: &Path) -> Result<FlatState, CliError> {
    serde_json::from_str(&read(path)?).map_err(|source| CliError::Json {
        path: path.to_owned(),
        source,
    })
}

pub fn save_state(path: &Path, state: &FlatState) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(state).map_err(CliError::Encode)?;
    fs::write(path, json + "\n").map_err(|source| CliError::Write {
        path: path.to_owned(),
        source,
    })
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOY_TOML: &str = r#"
alphabet = "ABCDEF"

[rotors.N]
permutation = "BFADCE"
notch = "C"

[rotors.F]
permutation = "CDEFAB"
notch = "F"

[reflectors]
R = "BADCFE"

[defaults]
rotor_order = "N-N-F"
reflector = "R"
"#;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn toml_catalog_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let args = MachineArgs {
            catalog: Some(write(&dir, "toy.toml", TOY_TOML)),
            ..MachineArgs::default()
        };
        let machine = args.build().unwrap();
        assert_eq!(machine.rotor_order(), "N-N-F");
        assert_eq!(machine.alphabet().as_str(), "ABCDEF");
    }

    #[test]
    fn bad_catalog_reports_path_and_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bad.toml", &TOY_TOML.replace("CDEFAB", "CDEFAA"));
        let err = load_catalog(&path).unwrap_err().to_string();
        assert!(err.contains("bad.toml"), "{err}");
        assert!(err.contains("rotor F"), "{err}");
    }

    #[test]
    fn json_is_the_default_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "catalog.cfg", "{ not json");
        assert!(matches!(load_catalog(&path), Err(CliError::Json { .. })));
    }

    #[test]
    fn flags_override_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = write(
            &dir,
            "state.json",
            r#"{ "rotor_order": "IV-V-VI", "indicator": "XYZ", "locked": "1" }"#,
        );
        let args = MachineArgs {
            state: Some(state),
            indicator: Some("ABC".into()),
            unlocked: true,
            ..MachineArgs::default()
        };
        let machine = args.build().unwrap();
        assert_eq!(machine.rotor_order(), "IV-V-VI");
        assert_eq!(machine.indicator(), "ABC");
        assert!(!machine.ring_locked());
    }

    #[test]
    fn state_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.json");
        let mut machine = Enigma::m3();
        machine.set_plugboard("AB CD").unwrap();
        save_state(&path, &machine.save_state()).unwrap();
        assert_eq!(load_state(&path).unwrap(), machine.save_state());
    }

    #[test]
    fn first_bad_flag_names_itself() {
        let args = MachineArgs {
            rings: Some("AB".into()),
            plugboard: Some("AA".into()),
            ..MachineArgs::default()
        };
        let err = args.build().unwrap_err();
        assert_eq!(err.to_string(), "--rings: ring_setting length must be 3, got 2");
    }

    #[test]
    fn checks_cover_every_given_flag() {
        let args = MachineArgs {
            rotors: Some("I-II-III".into()),
            indicator: Some("A1C".into()),
            plugboard: Some("AB AC".into()),
            ..MachineArgs::default()
        };
        let machine = Enigma::m3();
        let checks = args.checks(&machine);
        let flags: Vec<_> = checks.iter().map(|c| c.flag).collect();
        assert_eq!(flags, ["--rotors", "--indicator", "--plugboard"]);
        assert!(checks[0].result.is_ok());
        assert_eq!(checks[1].result, Err(EnigmaError::InvalidSymbol('1')));
        assert_eq!(checks[2].result, Err(EnigmaError::PlugboardLetterReused('A')));
    }
}
