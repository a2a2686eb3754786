//! Filters command implementation

use crate::cli::commands::redact::load_policy_document;
use crate::engine::filters::{active_filters, ALL_FILTERS};
use crate::domain::ALL_PHI_TYPES;
use anyhow::Result;
use clap::Args;

/// Arguments for the filters command
#[derive(Args, Debug)]
pub struct FiltersArgs {
    /// Show only the filters active under this policy (template or file)
    #[arg(short, long)]
    pub policy: Option<String>,
}

impl FiltersArgs {
    /// Execute the filters command
    pub fn execute(&self) -> Result<i32> {
        match &self.policy {
            Some(selector) => {
                let policy = match load_policy_document(selector).and_then(|d| d.into_policy()) {
                    Ok(p) => p,
                    Err(e) => {
                        eprintln!("Policy error: {e}");
                        return Ok(2);
                    }
                };

                println!("Filters active under '{}':", policy.name);
                for filter in active_filters(&policy) {
                    println!("  {:16} -> {}", filter.name(), filter.category().label());
                }
            }
            None => {
                println!("Detection filters:");
                for filter in ALL_FILTERS {
                    println!("  {:16} -> {}", filter.name(), filter.category().label());
                }
                println!();
                println!("PHI categories:");
                for category in ALL_PHI_TYPES {
                    println!("  {}", category.label());
                }
            }
        }
        Ok(0)
    }
}
