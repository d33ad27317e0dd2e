//! Avail command implementation

use console::Style;

use crate::cli::{AvailArgs, Cli};
use crate::commands::context::Session;
use crate::error::{Result, module_not_found};

/// List modules the repositories offer, marking what this host cannot run
pub fn run(args: &AvailArgs, cli: &Cli) -> Result<()> {
    let session = Session::prepare(cli)?;

    match &args.name {
        Some(name) => list_family(&session, name),
        None => list_families(&session),
    }
}

fn list_families(session: &Session) -> Result<()> {
    let families = session.index.families();
    if families.is_empty() {
        println!("No modules available");
        return Ok(());
    }

    let bold = Style::new().bold();
    for (name, count) in families {
        let versions = if count == 1 { "version" } else { "versions" };
        println!("{} ({count} {versions})", bold.apply_to(name));
    }

    Ok(())
}

fn list_family(session: &Session, name: &str) -> Result<()> {
    let versions = session.index.versions_of(name);
    if versions.is_empty() {
        return Err(module_not_found(name));
    }

    let loaded = session.env.loaded_set();
    let dim = Style::new().dim();
    let green = Style::new().green();

    for def in versions {
        let missing = session.profile.missing_tags(&def.capabilities);
        if !missing.is_empty() {
            println!(
                "{} {}",
                def.id,
                dim.apply_to(format!("(requires {})", missing.join(", ")))
            );
        } else if loaded.contains(&def.id) {
            println!("{} {}", def.id, green.apply_to("(loaded)"));
        } else {
            println!("{}", def.id);
        }
    }

    Ok(())
}
