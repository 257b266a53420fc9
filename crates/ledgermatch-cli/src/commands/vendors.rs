//! Vendors command - list the vendor registry.

use console::style;

use ledgermatch_core::vendor::registry;

pub fn run() -> anyhow::Result<()> {
    for profile in registry() {
        println!(
            "{}  {} ({:?}) -> {} [{}]",
            style(profile.id.as_str()).cyan().bold(),
            profile.display_name,
            profile.format,
            profile.ledger_vendor_name,
            profile.expense_category
        );
        println!("    detects: {}", profile.detection_patterns.join(", "));
    }
    Ok(())
}
