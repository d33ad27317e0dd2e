//! Swap command implementation

use crate::cli::{Cli, SwapArgs};
use crate::commands::context::Session;
use crate::commands::report_actions;
use crate::domain::{ModuleSpec, Request};
use crate::error::Result;
use crate::resolver;
use crate::shell;

pub fn run(args: &SwapArgs, cli: &Cli) -> Result<()> {
    let session = Session::prepare(cli)?;

    let from: ModuleSpec = args.from.parse()?;
    let to: ModuleSpec = args.to.parse()?;

    let loaded = session.env.loaded_set();
    let plan = resolver::resolve(
        &session.index,
        &session.profile,
        &loaded,
        &Request::Swap { from, to },
    )?;

    if session.verbose {
        report_actions(&plan);
    }
    print!("{}", shell::emit(&plan, &session.env, session.dialect));

    Ok(())
}
