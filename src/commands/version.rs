//! Version command implementation

use crate::error::Result;

pub fn run() -> Result<()> {
    println!("modenv {}", env!("CARGO_PKG_VERSION"));
    println!(
        "platform: {}-{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    Ok(())
}
