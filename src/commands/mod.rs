//! Command handlers module.
//!
//! - `io.rs`: `import` and `export`
//! - `tree.rs`: `list` and `restore-defaults`
//! - `config.rs`: configuration display

mod config;
mod io;
mod tree;

pub use config::cmd_config;
pub use io::{ImportArgs, cmd_export, cmd_import};
pub use tree::{cmd_list, cmd_restore_defaults};

/// Most warnings or errors printed per summary.
const MAX_LISTED: usize = 10;

/// Prints a titled list, truncated to [`MAX_LISTED`] entries.
fn print_issues(title: &str, issues: &[String]) {
    if issues.is_empty() {
        return;
    }
    println!();
    println!("{title} ({}):", issues.len());
    for issue in issues.iter().take(MAX_LISTED) {
        println!("  - {issue}");
    }
    if issues.len() > MAX_LISTED {
        println!("  ... and {} more", issues.len() - MAX_LISTED);
    }
}
