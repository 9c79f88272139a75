//! List rules command implementation.

use index_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<10} {:<25} {:<8} {:<8} Description",
        "Code", "Name", "Kind", "Default"
    );
    println!("{}", "-".repeat(90));

    for rule in all_rules() {
        let meta = rule.meta();
        let default = if meta.enabled_by_default { "on" } else { "off" };
        println!(
            "{:<10} {:<25} {:<8} {:<8} {}",
            meta.code, meta.name, meta.kind, default, meta.description
        );
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  index-lint check --rules only-import-from-index");
    println!("  index-lint check --rules IDX001");
    println!("\nRules that are off by default need `enabled = true` in their config section.");
}
