use std::error::Error;

use opmap_table::CompiledTable;

use crate::{compile::Sources, emit::signature, Input};

pub fn check(input: &Input, list: bool) -> Result<(), Box<dyn Error>> {
    let sources = Sources::read(input)?;
    let compiled = sources.compile(input.prefixes())?;
    print!("{}", summary(&compiled, list));
    Ok(())
}

fn summary(compiled: &CompiledTable, list: bool) -> String {
    let mut s = format!(
        "{} mnemonics, {} encodings\nradix {}: {} operand types, {} condition types\n",
        compiled.table.len(),
        compiled.table.record_count(),
        compiled.layout.radix,
        compiled.registry.operands().len(),
        compiled.registry.conditions().len(),
    );
    if list {
        for (mnemonic, keys) in compiled.table.iter() {
            s += &format!("{}\n", mnemonic);
            for (&key, record) in keys {
                let sig = signature(compiled, key);
                s += &format!("  {:>6} {:<16} {}\n", key, sig, record);
            }
        }
    }
    s
}
