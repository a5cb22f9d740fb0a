//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - gate-to-linear-optics conversion for dual-rail photonic qubits",
        style("Dualrail").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  dualrail-ir      Gate instructions and single-qubit unitaries");
    println!("  dualrail-optics  Converter, gadget catalog and reference simulator");
    println!("  dualrail-cli     Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
