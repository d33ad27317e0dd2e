//! Command implementations

pub mod avail;
pub mod cache;
pub mod completions;
pub mod context;
pub mod list;
pub mod load;
pub mod purge;
pub mod swap;
pub mod unload;
pub mod version;

use console::Style;

use crate::domain::Plan;

/// Describe a plan's actions on stderr, keeping stdout eval-safe
pub(crate) fn report_actions(plan: &Plan) {
    let dim = Style::new().dim();
    for action in &plan.actions {
        eprintln!("{}", dim.apply_to(action));
    }
}
