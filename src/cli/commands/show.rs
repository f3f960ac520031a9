//! Display a previously saved palace.

use std::path::Path;

use super::super::helpers::{load_palace, print_palace};

pub fn cmd_show(path: &Path) -> anyhow::Result<()> {
    let palace = load_palace(path)?;
    print_palace(&palace);
    Ok(())
}
