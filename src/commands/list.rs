//! List command implementation

use console::Style;

use crate::cli::{Cli, ListArgs};
use crate::commands::context::Session;
use crate::error::Result;

/// Show the modules loaded in the calling session
pub fn run(args: &ListArgs, cli: &Cli) -> Result<()> {
    let session = Session::prepare(cli)?;
    let loaded = session.env.loaded_set();

    if loaded.is_empty() {
        println!("No modules loaded");
        return Ok(());
    }

    let bold = Style::new().bold();
    let dim = Style::new().dim();

    for id in loaded.iter() {
        match session.index.get(id) {
            Some(def) if args.detailed => {
                println!("{}", bold.apply_to(id));
                if !def.capabilities.is_empty() {
                    let tags: Vec<&str> = def.capabilities.iter().map(String::as_str).collect();
                    println!("  capabilities: {}", tags.join(", "));
                }
                if !def.requires.is_empty() {
                    let deps: Vec<String> = def.requires.iter().map(ToString::to_string).collect();
                    println!("  requires: {}", deps.join(", "));
                }
                for effect in &def.effects {
                    println!("  {effect}");
                }
            }
            Some(_) => println!("{id}"),
            // Loaded before the definition was removed from the repository
            None => println!("{id} {}", dim.apply_to("(not in repository)")),
        }
    }

    Ok(())
}
