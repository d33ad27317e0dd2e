//! Purge command implementation

use crate::cli::Cli;
use crate::commands::context::Session;
use crate::commands::report_actions;
use crate::domain::Request;
use crate::error::Result;
use crate::resolver;
use crate::shell;

/// Unload every loaded module, tolerating entries the index no longer knows
pub fn run(cli: &Cli) -> Result<()> {
    let session = Session::prepare(cli)?;

    let loaded = session.env.loaded_set();
    let plan = resolver::resolve(&session.index, &session.profile, &loaded, &Request::Purge)?;

    if session.verbose {
        report_actions(&plan);
    }
    print!("{}", shell::emit(&plan, &session.env, session.dialect));

    Ok(())
}
