use std::fs;

use anyhow::{anyhow, Context};

use jade::compiler;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: jade <source-file>"))?;
    let source = fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;

    let output = compiler::compile(&source).map_err(|err| anyhow!("{err}"))?;
    println!("{output}");
    Ok(())
}
