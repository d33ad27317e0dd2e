//! Cache command implementation

use crate::cli::{CacheArgs, Cli};
use crate::commands::context::Session;
use crate::config::SiteConfig;
use crate::error::Result;

pub fn run(args: &CacheArgs, _cli: &Cli) -> Result<()> {
    let config = SiteConfig::load()?;
    let cache = Session::cache(&config)?;

    if args.clear {
        cache.clear()?;
        println!("Cache cleared");
        return Ok(());
    }

    println!("Location: {}", cache.dir().display());
    println!("Size: {}", human_size(cache.size_bytes()));

    Ok(())
}

fn human_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;

    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}
