//! Rule listing command

use anyhow::Result;
use keel_constraint::RuleRegistry;

pub fn run() -> Result<()> {
    let registry = RuleRegistry::with_builtin_rules();

    println!("Rules ({}):", registry.len());
    for rule in registry.all() {
        let meta = rule.meta();
        println!(
            "  {} [{}] {}",
            meta.id, meta.severity, meta.short_description
        );
        println!("    {}", meta.description);
        if !meta.tags.is_empty() {
            println!("    tags: {}", meta.tags.join(", "));
        }
    }

    Ok(())
}
