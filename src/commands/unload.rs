//! Unload command implementation

use crate::cli::{Cli, UnloadArgs};
use crate::commands::context::Session;
use crate::commands::report_actions;
use crate::domain::{ModuleSpec, Plan, Request};
use crate::error::Result;
use crate::resolver;
use crate::shell;

pub fn run(args: &UnloadArgs, cli: &Cli) -> Result<()> {
    let session = Session::prepare(cli)?;

    let mut loaded = session.env.loaded_set();
    let mut actions = Vec::new();

    for raw in &args.modules {
        let spec: ModuleSpec = raw.parse()?;
        let plan = resolver::resolve(
            &session.index,
            &session.profile,
            &loaded,
            &Request::Unload {
                spec,
                cascade: args.cascade,
            },
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
