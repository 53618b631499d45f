use std::{collections::BTreeMap, error::Error, io::Write};

use opmap_table::{CompiledTable, EncodingRecord, Key, KeyLayout, RegisteredType};
use serde::Serialize;

/// The type names a key was derived from, e.g. `NOT_ZERO, IMM`.
pub fn signature(compiled: &CompiledTable, key: Key) -> String {
    compiled.layout.invert(key).map_or_else(String::new, |codes| {
        let condition = compiled.registry.condition(codes.condition);
        let operands = codes
            .operands
            .iter()
            .filter_map(|&c| compiled.registry.operand(c));
        condition
            .into_iter()
            .chain(operands)
            .map(|t| t.name)
            .collect::<Vec<_>>()
            .join(", ")
    })
}

fn js_str(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        if matches!(c, '\'' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

fn js_codes(out: &mut dyn Write, name: &str, types: &[RegisteredType]) -> Result<(), Box<dyn Error>> {
    writeln!(out, "const {} = {{", name)?;
    for t in types {
        writeln!(out, "\t{}: {}, // {}", js_str(t.name), t.code, t.tokens.join(", "))?;
    }
    writeln!(out, "}};\n")?;
    Ok(())
}

/// Writes the table as a CommonJS module exporting `Arguments`, `Conditions`, `lookup`,
/// `conditional` and `Instructions`.
pub fn js(compiled: &CompiledTable, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
    let layout = compiled.layout;
    writeln!(out, "const RADIX = {};\n", layout.radix)?;
    js_codes(out, "Arguments", compiled.registry.operands())?;
    js_codes(out, "Conditions", compiled.registry.conditions())?;

    let pad = vec!["0"; usize::try_from(layout.slots)?].join(", ");
    writeln!(
        out,
        "const lookup = (...args) => [...args, {}].slice(0, {}).reduce((acc, i) => acc * RADIX + i, 0);",
        pad, layout.slots
    )?;
    writeln!(
        out,
        "const conditional = (cond, ...args) => cond * RADIX ** {} + lookup(0, ...args);\n",
        layout.condition_power
    )?;

    writeln!(out, "const Instructions = {{")?;
    for (mnemonic, keys) in compiled.table.iter() {
        writeln!(out, "\t{}: {{", js_str(mnemonic))?;
        for (&key, record) in keys {
            let code = record
                .opcode_bytes
                .iter()
                .map(|b| format!("0x{:02X}", b))
                .collect::<Vec<_>>()
                .join(", ");
            let immediates = record
                .immediates
                .iter()
                .map(|i| format!("{{ size: {}, signed: {} }}", i.byte_width, i.signed))
                .collect::<Vec<_>>()
                .join(", ");
            let sig = signature(compiled, key);
            write!(
                out,
                "\t\t{}: {{ code: new Uint8Array([{}]), size: {}, immediates: [{}] }},",
                key, code, record.total_size, immediates
            )?;
            if sig.is_empty() {
                writeln!(out)?;
            } else {
                writeln!(out, " // {}", sig)?;
            }
        }
        writeln!(out, "\t}},")?;
    }
    writeln!(out, "}};\n")?;

    writeln!(
        out,
        "module.exports = {{ RADIX, lookup, conditional, Arguments, Conditions, Instructions }};"
    )?;
    Ok(())
}

#[derive(Serialize)]
struct Document<'t, 'a> {
    radix: u32,
    layout: KeyLayout,
    arguments: &'t [RegisteredType<'a>],
    conditions: &'t [RegisteredType<'a>],
    /// An array rather than an object so mnemonics keep their order.
    instructions: Vec<Instruction<'t, 'a>>,
}

#[derive(Serialize)]
struct Instruction<'t, 'a> {
    mnemonic: &'a str,
    encodings: &'t BTreeMap<Key, EncodingRecord>,
}

/// Writes the table as pretty-printed JSON.
pub fn json(compiled: &CompiledTable, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
    let doc = Document {
        radix: compiled.layout.radix,
        layout: compiled.layout,
        arguments: compiled.registry.operands(),
        conditions: compiled.registry.conditions(),
        instructions: compiled
            .table
            .iter()
            .map(|(mnemonic, encodings)| Instruction {
                mnemonic,
                encodings,
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opmap_loader::load_rows;
    use opmap_table::{compile, PagePrefixes, Vocabulary};
    use pretty_assertions::assert_eq;

    const MAP: &str = "\
Code,Cycles,Op,Arg1,Arg2,Cycles,Op,Arg1,Arg2,Cycles,Op,Arg1,Arg2
00,1,NOP,,,,undefined,,,,undefined,,
B0,2,LD,A,#nn,,undefined,,,,undefined,,
E4,2,JRS,NZ,rr,,undefined,,,,undefined,,
";

    macro_rules! emit_test {
        ($emit:path, $expected:expr) => {{
            let rows = load_rows(MAP).unwrap();
            let compiled = compile(&rows, &Vocabulary::s1c88(), PagePrefixes::S1C88).unwrap();
            let mut out = Vec::new();
            $emit(&compiled, &mut out).unwrap();
            assert_eq!(String::from_utf8(out).unwrap(), $expected);
        }};
    }

    #[test]
    fn quoting() {
        assert_eq!(js_str("[IX+dd]"), "'[IX+dd]'");
        assert_eq!(js_str(r"it's\"), r"'it\'s\\'");
    }

    #[test]
    fn js_module() {
        emit_test!(
            js,
            r#"const RADIX = 3;

const Arguments = {
	'REG_A': 1, // A
	'IMM': 2, // #nn, rr
};

const Conditions = {
	'NOT_ZERO': 1, // NZ
};

const lookup = (...args) => [...args, 0, 0].slice(0, 2).reduce((acc, i) => acc * RADIX + i, 0);
const conditional = (cond, ...args) => cond * RADIX ** 2 + lookup(0, ...args);

const Instructions = {
	'NOP': {
		0: { code: new Uint8Array([0x00]), size: 1, immediates: [] },
	},
	'LD': {
		5: { code: new Uint8Array([0xB0]), size: 2, immediates: [{ size: 1, signed: false }] }, // REG_A, IMM
	},
	'JRS': {
		11: { code: new Uint8Array([0xE4]), size: 2, immediates: [{ size: 1, signed: true }] }, // NOT_ZERO, IMM
	},
};

module.exports = { RADIX, lookup, conditional, Arguments, Conditions, Instructions };
"#
        );
    }

    #[test]
    fn json_document() {
        let rows = load_rows(MAP).unwrap();
        let compiled = compile(&rows, &Vocabulary::s1c88(), PagePrefixes::S1C88).unwrap();
        let mut out = Vec::new();
        json(&compiled, &mut out).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(doc["radix"], 3);
        assert_eq!(doc["layout"]["condition_power"], 2);
        assert_eq!(doc["arguments"][1]["name"], "IMM");
        assert_eq!(doc["arguments"][1]["tokens"], serde_json::json!(["#nn", "rr"]));
        assert_eq!(doc["conditions"][0]["name"], "NOT_ZERO");
        assert_eq!(doc["instructions"][1]["mnemonic"], "LD");
        assert_eq!(
            doc["instructions"][2]["encodings"]["11"],
            serde_json::json!({
                "opcode_bytes": [0xE4],
                "total_size": 2,
                "immediates": [{ "byte_width": 1, "signed": true }]
            })
        );
    }
}
