//! CLI argument parsing and end-to-end tests.
//!
//! Parsing is tested on a mirror of the CLI structs via clap's
//! `try_parse_from`. The end-to-end tests run the built binary on temporary
//! instruction files.

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand, ValueEnum};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum TestFormat {
        Text,
        Json,
    }

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "dualrail")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[arg(short, long, global = true)]
        config: Option<String>,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Convert {
            #[arg(short, long)]
            input: String,
            #[arg(short, long)]
            output: Option<String>,
            #[arg(short = 'n', long)]
            num_qubits: Option<usize>,
            #[arg(long)]
            postselect: bool,
            #[arg(short, long, value_enum, default_value = "text")]
            format: TestFormat,
        },
        Simulate {
            #[arg(short, long)]
            input: String,
            #[arg(short = 'n', long)]
            num_qubits: Option<usize>,
            #[arg(long)]
            postselect: bool,
            #[arg(long)]
            input_bits: Option<String>,
            #[arg(short, long, default_value = "1024")]
            shots: usize,
            #[arg(long)]
            seed: Option<u64>,
            #[arg(short, long, value_enum, default_value = "text")]
            format: TestFormat,
        },
        Catalog,
        Version,
    }

    #[test]
    fn test_parse_convert_minimal() {
        let cli = TestCli::try_parse_from(["dualrail", "convert", "-i", "bell.json"]).unwrap();
        match cli.command {
            TestCommands::Convert {
                input,
                output,
                num_qubits,
                postselect,
                format,
            } => {
                assert_eq!(input, "bell.json");
                assert!(output.is_none());
                assert!(num_qubits.is_none());
                assert!(!postselect);
                assert_eq!(format, TestFormat::Text);
            }
            _ => panic!("Expected Convert command"),
        }
    }

    #[test]
    fn test_parse_convert_full() {
        let cli = TestCli::try_parse_from([
            "dualrail",
            "-vv",
            "convert",
            "-i",
            "bell.json",
            "-o",
            "out.json",
            "-n",
            "3",
            "--postselect",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            TestCommands::Convert {
                output,
                num_qubits,
                postselect,
                format,
                ..
            } => {
                assert_eq!(output.as_deref(), Some("out.json"));
                assert_eq!(num_qubits, Some(3));
                assert!(postselect);
                assert_eq!(format, TestFormat::Json);
            }
            _ => panic!("Expected Convert command"),
        }
    }

    #[test]
    fn test_parse_simulate_defaults() {
        let cli = TestCli::try_parse_from([
            "dualrail",
            "simulate",
            "-i",
            "bell.json",
            "--input-bits",
            "10",
            "--config",
            "dualrail.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("dualrail.yaml"));
        match cli.command {
            TestCommands::Simulate {
                shots,
                seed,
                input_bits,
                ..
            } => {
                assert_eq!(shots, 1024);
                assert!(seed.is_none());
                assert_eq!(input_bits.as_deref(), Some("10"));
            }
            _ => panic!("Expected Simulate command"),
        }
    }

    #[test]
    fn test_parse_unit_commands() {
        assert!(matches!(
            TestCli::try_parse_from(["dualrail", "catalog"]).unwrap().command,
            TestCommands::Catalog
        ));
        assert!(matches!(
            TestCli::try_parse_from(["dualrail", "version"]).unwrap().command,
            TestCommands::Version
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(TestCli::try_parse_from(["dualrail", "convert"]).is_err());
        assert!(TestCli::try_parse_from(["dualrail", "convert", "-i", "a", "-f", "xml"]).is_err());
        assert!(TestCli::try_parse_from(["dualrail", "simulate", "-i", "a", "-s", "many"]).is_err());
        assert!(TestCli::try_parse_from(["dualrail", "frobnicate"]).is_err());
    }
}

// ============================================================================
// End-to-end runs of the binary
// ============================================================================

mod end_to_end {
    use std::fs;
    use std::path::Path;
    use std::process::{Command, Output};

    const BELL: &str = r#"[
        {"name": "Hadamard", "wires": [0]},
        {"name": "CNOT", "wires": [0, 1]}
    ]"#;

    fn dualrail(args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_dualrail"))
            .args(args)
            .env_clear()
            .output()
            .unwrap()
    }

    fn write(dir: &Path, name: &str, contents: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_convert_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bell.json", BELL);

        let out = dualrail(&["convert", "-i", &input, "-n", "2", "--postselect", "-f", "json"]);
        assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

        let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
        assert_eq!(report["num_modes"], 6);
        assert_eq!(report["input_state"], "|1,0,1,0,0,0⟩");
        assert_eq!(report["placements"].as_array().unwrap().len(), 2);
        assert_eq!(report["postselections"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_convert_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            dir.path(),
            "bell.json",
            &format!(r#"{{"num_qubits": 2, "instructions": {BELL}}}"#),
        );
        let output = dir.path().join("bell.txt");

        let out = dualrail(&["convert", "-i", &input, "-o", &output.to_string_lossy()]);
        assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("OpticalCircuit: 2 qubits, 6 modes"));
        assert!(text.contains("Heralded CNOT"));
    }

    #[test]
    fn test_simulate_bell_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bell.json", BELL);

        let out = dualrail(&["simulate", "-i", &input, "-n", "2", "--postselect", "-f", "json"]);
        assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

        let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
        let p00 = report["probabilities"]["00"].as_f64().unwrap();
        let p11 = report["probabilities"]["11"].as_f64().unwrap();
        assert!((p00 - 0.5).abs() < 1e-9);
        assert!((p11 - 0.5).abs() < 1e-9);
        let performance = report["physical_performance"].as_f64().unwrap();
        assert!((performance - 1.0 / 9.0).abs() < 1e-9);

        assert_eq!(report["samples"].as_array().unwrap().len(), 1024);
        assert_eq!(report["rejected_shots"], 0);
        let counts = report["counts"].as_object().unwrap();
        assert!(counts.keys().all(|k| k == "00" || k == "11"));
        assert_eq!(counts.values().map(|v| v.as_u64().unwrap()).sum::<u64>(), 1024);
    }

    #[test]
    fn test_simulate_draws_rare_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            dir.path(),
            "rx.json",
            r#"[{"name": "RX", "wires": [0], "params": [0.2]}]"#,
        );

        let run = |seed: &str| {
            let out = dualrail(&[
                "simulate", "-i", &input, "-n", "1", "-s", "5000", "--seed", seed, "-f", "json",
            ]);
            assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
            serde_json::from_slice::<serde_json::Value>(&out.stdout).unwrap()
        };

        let report = run("11");
        let ones = report["counts"]["1"].as_u64().unwrap_or(0);
        let zeros = report["counts"]["0"].as_u64().unwrap_or(0);
        assert_eq!(ones + zeros, 5000);
        // p(1) = sin²(0.1) ≈ 0.01
        assert!(ones > 0 && ones < 150, "{ones}");
        assert_eq!(report["samples"], run("11")["samples"]);
    }

    #[test]
    fn test_simulate_with_input_bits() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "cnot.json", r#"[{"name": "CNOT", "wires": [0, 1]}]"#);

        let out = dualrail(&[
            "simulate", "-i", &input, "-n", "2", "--input-bits", "10", "-f", "json",
        ]);
        assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

        let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
        let p11 = report["probabilities"]["11"].as_f64().unwrap();
        assert!((p11 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_config_file_supplies_qubit_count() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bell.json", BELL);
        let config = write(
            dir.path(),
            "dualrail.yaml",
            "converter:\n  num_qubits: 2\n  backend_name: sim:local\n",
        );

        let out = dualrail(&["convert", "-c", &config, "-i", &input, "-f", "json"]);
        assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

        let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
        assert_eq!(report["num_qubits"], 2);
        assert_eq!(report["backend_name"], "sim:local");
    }

    #[test]
    fn test_missing_qubit_count_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bell.json", BELL);

        let out = dualrail(&["convert", "-i", &input]);
        assert!(!out.status.success());
        assert!(String::from_utf8_lossy(&out.stderr).contains("Error:"));
    }

    #[test]
    fn test_unsupported_gate_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "ccx.json", r#"[{"name": "Toffoli", "wires": [0, 1, 2]}]"#);

        let out = dualrail(&["convert", "-i", &input, "-n", "3"]);
        assert!(!out.status.success());
    }

    #[test]
    fn test_missing_input_file_fails() {
        let out = dualrail(&["convert", "-i", "/nonexistent/dualrail/circuit.json", "-n", "2"]);
        assert!(!out.status.success());
        assert!(String::from_utf8_lossy(&out.stderr).contains("File not found"));
    }

    #[test]
    fn test_catalog_lists_gadgets() {
        let out = dualrail(&["catalog"]);
        assert!(out.status.success());
        let stdout = String::from_utf8_lossy(&out.stdout);
        assert!(stdout.contains("Heralded CNOT"));
        assert!(stdout.contains("Post-selected CZ"));
    }

    #[test]
    fn test_version() {
        let out = dualrail(&["version"]);
        assert!(out.status.success());
        assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));
    }
}
