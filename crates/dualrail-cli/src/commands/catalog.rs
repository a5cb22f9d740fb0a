//! Catalog command implementation.

use console::style;

use dualrail_optics::{Catalog, GadgetKind, StandardCatalog};

/// Execute the catalog command.
pub fn execute() {
    let catalog = StandardCatalog::new();

    println!(
        "{} Gadget catalog '{}':",
        style("→").cyan().bold(),
        style(catalog.name()).yellow()
    );
    println!();
    println!(
        "  {:<22} {:<6} {:<14} {:>8} {:>8}  {}",
        "Gadget", "Gate", "Kind", "Modes", "Heralds", "Success"
    );

    for gate in catalog.gates() {
        for kind in [GadgetKind::Heralded, GadgetKind::PostSelected] {
            let Some(gadget) = catalog.gadget(&gate, kind) else {
                continue;
            };
            println!(
                "  {:<22} {:<6} {:<14} {:>8} {:>8}  {:.4}",
                style(&gadget.name).green(),
                gadget.gate,
                kind.to_string(),
                gadget.num_modes(),
                format!("{:?}", gadget.heralds),
                gadget.success_probability
            );
        }
    }
}
