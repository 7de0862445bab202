//! Subcommand implementations. Each writes its report to `out`.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use enigma_core::{Catalog, EncryptTrace, Enigma, EnigmaError, MachineObserver, RotorPosition};

use crate::config::{self, MachineArgs};
use crate::error::CliError;

#[derive(Debug, Default)]
pub struct EncryptOptions {
    pub passthrough: bool,
    pub trace: bool,
    pub save_state: Option<PathBuf>,
}

/// Prints the signal path of every keystroke to stderr.
struct TracePrinter;

impl MachineObserver for TracePrinter {
    fn on_encrypt(&mut self, trace: &EncryptTrace) {
        eprintln!("{}", format_trace(trace));
    }
}

/// The signal path as one line, stages in signal order.
pub fn format_trace(trace: &EncryptTrace) -> String {
    let stage = |label: &str, input: char, output: char| format!("{label} {input}>{output}");
    let mut stages = vec![stage(
        "plugboard",
        trace.plugboard.forward.input,
        trace.plugboard.forward.output,
    )];
    for position in [RotorPosition::Right, RotorPosition::Middle, RotorPosition::Left] {
        let pair = trace.rotor(position).forward;
        stages.push(stage(&position.to_string(), pair.input, pair.output));
    }
    stages.push(stage(
        "reflector",
        trace.reflector.input,
        trace.reflector.output,
    ));
    for position in RotorPosition::ALL {
        let pair = trace.rotor(position).inverse;
        stages.push(stage(&position.to_string(), pair.input, pair.output));
    }
    stages.push(stage(
        "plugboard",
        trace.plugboard.inverse.input,
        trace.plugboard.inverse.output,
    ));
    stages.join(" | ")
}

/// Encrypt `text`, or each line of `input` when no text is given.
pub fn encrypt(
    machine: &mut Enigma,
    text: Option<String>,
    options: &EncryptOptions,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if options.trace {
        machine.add_observer(TracePrinter);
    }
    let lines = match text {
        Some(text) => vec![text],
        None => input
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(CliError::Stdin)?,
    };
    for line in &lines {
        let cipher = if options.passthrough {
            encrypt_passthrough(machine, line)?
        } else {
            machine.encrypt_message(line)?
        };
        writeln!(out, "{cipher}")?;
    }
    if let Some(path) = &options.save_state {
        config::save_state(path, &machine.save_state())?;
    }
    Ok(())
}

/// Symbols outside the alphabet are copied unchanged and do not step.
fn encrypt_passthrough(machine: &mut Enigma, text: &str) -> Result<String, EnigmaError> {
    text.chars()
        .map(|symbol| {
            if machine.is_valid_symbol(symbol) {
                machine.step_and_encrypt_single(symbol)
            } else {
                Ok(symbol)
            }
        })
        .collect()
}

/// Report every setting flag's validation result without applying any.
pub fn validate(
    args: &MachineArgs,
    machine: &Enigma,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let checks = args.checks(machine);
    let mut failed = 0;
    for check in &checks {
        match &check.result {
            Ok(()) => writeln!(out, "ok     {} {}", check.flag, check.value)?,
            Err(err) => {
                failed += 1;
                writeln!(out, "error  {} {}: {err}", check.flag, check.value)?;
            }
        }
    }
    if failed > 0 {
        return Err(CliError::Invalid(failed));
    }
    if checks.is_empty() {
        writeln!(out, "no settings given")?;
    }
    Ok(())
}

pub fn state(machine: &Enigma, out: &mut impl Write) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(&machine.save_state()).map_err(CliError::Encode)?;
    writeln!(out, "{json}")?;
    Ok(())
}

pub fn catalog(catalog: &Catalog, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "alphabet   {}", catalog.alphabet().as_str())?;
    for name in catalog.rotor_names() {
        if let Some(rotor) = catalog.rotor(name) {
            writeln!(
                out,
                "rotor      {name:<5} {}  notch {}",
                rotor.permutation(),
                rotor.notches()
            )?;
        }
    }
    for name in catalog.reflector_names() {
        if let Some(reflector) = catalog.reflector(name) {
            writeln!(out, "reflector  {name:<5} {}", reflector.permutation())?;
        }
    }
    writeln!(
        out,
        "default    {} / {}",
        catalog.default_rotor_order().join("-"),
        catalog.default_reflector()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_encrypt(
        machine: &mut Enigma,
        text: Option<&str>,
        stdin: &str,
        options: &EncryptOptions,
    ) -> Result<String, CliError> {
        let mut out = Vec::new();
        encrypt(machine, text.map(String::from), options, stdin.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn encrypts_argument_text() {
        let mut machine = Enigma::m3();
        let options = EncryptOptions::default();
        let out = run_encrypt(&mut machine, Some("AAAAA"), "", &options).unwrap();
        assert_eq!(out, "BDZGO\n");
    }

    #[test]
    fn encrypts_stdin_line_by_line() {
        let mut machine = Enigma::m3();
        let options = EncryptOptions::default();
        let out = run_encrypt(&mut machine, None, "AAA\nAA\n", &options).unwrap();
        assert_eq!(out, "BDZ\nGO\n");
    }

    #[test]
    fn passthrough_keeps_foreign_symbols() {
        let mut machine = Enigma::m3();
        let options = EncryptOptions {
            passthrough: true,
            ..EncryptOptions::default()
        };
        let out = run_encrypt(&mut machine, Some("AA, A-AA!"), "", &options).unwrap();
        assert_eq!(out, "BD, Z-GO!\n");
        assert_eq!(machine.indicator(), "AAF");
    }

    #[test]
    fn strict_mode_rejects_foreign_symbols() {
        let mut machine = Enigma::m3();
        let options = EncryptOptions::default();
        let err = run_encrypt(&mut machine, Some("AA A"), "", &options).unwrap_err();
        assert_eq!(err.to_string(), "Invalid letter:  ");
        assert_eq!(machine.indicator(), "AAA");
    }

    #[test]
    fn save_state_after_encrypting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("after.json");
        let options = EncryptOptions {
            save_state: Some(path.clone()),
            ..EncryptOptions::default()
        };
        let mut machine = Enigma::m3();
        run_encrypt(&mut machine, Some("AAAA"), "", &options).unwrap();
        let saved = config::load_state(&path).unwrap();
        assert_eq!(saved.get("indicator"), Some("AAE"));
    }

    #[test]
    fn trace_lists_stages_in_signal_order() {
        let mut machine = Enigma::m3();
        machine.set_plugboard("AQ").unwrap();
        machine.step_and_encrypt_single('A').unwrap();
        let line = format_trace(&machine.last_values().unwrap());
        let labels: Vec<&str> = line
            .split(" | ")
            .map(|stage| stage.split(' ').next().unwrap())
            .collect();
        assert_eq!(
            labels,
            [
                "plugboard", "right", "middle", "left", "reflector", "left", "middle", "right",
                "plugboard"
            ]
        );
        assert!(line.starts_with("plugboard A>Q | "));
    }

    #[test]
    fn validate_reports_each_flag() {
        let args = MachineArgs {
            rotors: Some("II-I-III".into()),
            reflector: Some("Z".into()),
            ..MachineArgs::default()
        };
        let mut out = Vec::new();
        let err = validate(&args, &Enigma::m3(), &mut out).unwrap_err();
        assert!(matches!(err, CliError::Invalid(1)));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ok     --rotors II-I-III\nerror  --reflector Z: Invalid reflector name: Z\n"
        );
    }

    #[test]
    fn state_prints_json() {
        let mut out = Vec::new();
        state(&Enigma::m3(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["rotor_order"], "I-II-III");
        assert_eq!(value["locked"], "1");
    }

    #[test]
    fn catalog_lists_everything() {
        let mut out = Vec::new();
        catalog(&Catalog::m3(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("rotor      VIII  FKQHTLXOCBJSPDZRAMEWNIUYGV  notch MZ\n"));
        assert!(text.contains("reflector  B     YRUHQSLDPXNGOKMIEBFZCWVJAT\n"));
        assert!(text.ends_with("default    I-II-III / B\n"));
    }
}
