//! Rules command - manage the priority-rule document.

use std::path::PathBuf;

use colored::Colorize;
use worktable::{Rule, RuleStore};

use crate::cli::RulesAction;

pub fn run(
    file: PathBuf,
    action: RulesAction,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = RuleStore::new(file);

    match action {
        RulesAction::List => {
            let rules = store.load_rules();
            let settings = store.load_settings();

            println!(
                "{} {}",
                "Rules in".cyan().bold(),
                store.path().display().to_string().white()
            );
            println!(
                "Base heuristic: {}",
                if settings.enable_base_heuristic {
                    "enabled".green()
                } else {
                    "disabled".red()
                }
            );
            println!();

            if rules.is_empty() {
                println!("{}", "No rules defined.".dimmed());
                return Ok(());
            }

            for rule in &rules {
                let state = if rule.active {
                    "on ".green()
                } else {
                    "off".red()
                };
                println!(
                    "  [{}] {} {} {} -> {}  {}",
                    state,
                    rule.column,
                    rule.op,
                    rule.value,
                    rule.priority.label(),
                    rule.reason.dimmed()
                );
            }
        }

        RulesAction::Add {
            column,
            value,
            priority,
            op,
            reason,
        } => {
            store.save_rule(Rule::new(&column, op, &value, priority, &reason))?;
            println!(
                "{} {} {} {} -> {}",
                "Saved rule:".green().bold(),
                column,
                op,
                value,
                priority.label()
            );
        }

        RulesAction::Remove { column, value, op } => {
            if store.delete_rule(&column, &value, op)? {
                println!("{}", "Rule removed.".green());
            } else {
                return Err(format!("No rule matches {} {} {}", column, op, value).into());
            }
        }

        RulesAction::Toggle {
            column,
            value,
            op,
            off,
        } => {
            if store.toggle_rule(&column, &value, op, !off)? {
                println!(
                    "Rule {}.",
                    if off {
                        "disabled".yellow()
                    } else {
                        "enabled".green()
                    }
                );
            } else {
                return Err(format!("No rule matches {} {} {}", column, op, value).into());
            }
        }
    }

    Ok(())
}
