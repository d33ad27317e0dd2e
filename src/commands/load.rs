//! Load command implementation

use crate::cli::{Cli, LoadArgs};
use crate::commands::context::Session;
use crate::commands::report_actions;
use crate::domain::{ModuleSpec, Plan, Request};
use crate::error::Result;
use crate::resolver;
use crate::shell;

/// Load the requested modules and print the shell mutations
///
/// Several modules resolve left to right against the loaded set the previous
/// one produced; the combined plan is emitted once, so `eval` sees a single
/// consistent script.
pub fn run(args: &LoadArgs, cli: &Cli) -> Result<()> {
    let session = Session::prepare(cli)?;
    let auto_unload = args.auto_unload || session.config.auto_unload;

    let mut loaded = session.env.loaded_set();
    let mut actions = Vec::new();

    for raw in &args.modules {
        let spec: ModuleSpec = raw.parse()?;
        let plan = resolver::resolve(
            &session.index,
            &session.profile,
            &loaded,
            &Request::Load { spec, auto_unload },
        )?;
        loaded = plan.loaded;
        actions.extend(plan.actions);
    }

    let plan = Plan { actions, loaded };
    if session.verbose {
        report_actions(&plan);
    }
    print!("{}", shell::emit(&plan, &session.env, session.dialect));

    Ok(())
}
