//! Property tests over randomly generated opcode maps.

use std::collections::HashMap;

use opmap_table::{
    compile, immediate::immediates, EncodingRecord, PagePrefixes, PageSlot, Row, Signature,
    TableError, Vocabulary,
};
use proptest::prelude::*;

const MNEMONICS: &[&str] = &["LD", "ADD", "JP", "CP", "INC"];
const OPERANDS: &[&str] = &[
    "A", "B", "BA", "HL", "[HL]", "[IX+dd]", "[kk]", "[hhll]", "#nn", "#mmnn", "rr", "qqrr",
];
const CONDITIONS: &[&str] = &["Z", "NZ", "C", "NC", "F0"];

fn mnemonic() -> impl Strategy<Value = &'static str> {
    prop::sample::select(MNEMONICS)
}

fn operand() -> impl Strategy<Value = &'static str> {
    prop::sample::select(OPERANDS)
}

fn condition() -> impl Strategy<Value = &'static str> {
    prop::sample::select(CONDITIONS)
}

fn slot() -> impl Strategy<Value = PageSlot<'static>> {
    prop_oneof![
        Just(PageSlot::undefined()),
        mnemonic().prop_map(|m| PageSlot::new(m, [None, None])),
        (mnemonic(), operand()).prop_map(|(m, a)| PageSlot::new(m, [Some(a), None])),
        (mnemonic(), operand(), operand()).prop_map(|(m, a, b)| PageSlot::new(m, [Some(a), Some(b)])),
        (mnemonic(), condition(), prop::option::of(operand()))
            .prop_map(|(m, c, a)| PageSlot::new(m, [Some(c), a])),
    ]
}

fn rows() -> impl Strategy<Value = Vec<Row<'static>>> {
    prop::collection::vec((any::<u8>(), slot(), slot(), slot()), 1..48).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (opcode, base, a, b))| Row::new(i + 2, opcode, base, a, b))
            .collect()
    })
}

/// `sig` with every token replaced by its type name.
fn names(sig: &Signature<'static>, vocab: &Vocabulary<'static>) -> Signature<'static> {
    let name = |t: &'static str| vocab.get(t).unwrap().name;
    Signature {
        condition: sig.condition.map(name),
        operands: sig.operands.map(|t| t.map(name)),
    }
}

type Model = HashMap<(&'static str, Signature<'static>), (Signature<'static>, EncodingRecord)>;

/// What the table should contain, built the slow way: one entry per distinct signature of type
/// names, along with the first token signature seen for it. The flag is set if a signature was
/// given two different encodings.
fn model(rows: &[Row<'static>], vocab: &Vocabulary<'static>) -> (Model, bool) {
    let mut expected = Model::new();
    let mut conflict = false;
    for row in rows {
        for v in row.variants(PagePrefixes::S1C88).unwrap() {
            let sig = Signature::resolve(&v, vocab).unwrap();
            let record = EncodingRecord::new(v.opcode_bytes.clone(), immediates(&v, vocab).unwrap());
            match expected.get(&(v.mnemonic, names(&sig, vocab))) {
                Some((_, existing)) => conflict |= *existing != record,
                None => {
                    expected.insert((v.mnemonic, names(&sig, vocab)), (sig, record));
                }
            }
        }
    }
    (expected, conflict)
}

proptest! {
    #[test]
    fn keys_are_injective(rows in rows()) {
        let vocab = Vocabulary::s1c88();
        let (expected, conflict) = model(&rows, &vocab);

        match compile(&rows, &vocab, PagePrefixes::S1C88) {
            Ok(compiled) => {
                prop_assert!(!conflict);
                // one key per distinct signature, so no two signatures were merged
                prop_assert_eq!(compiled.table.record_count(), expected.len());
                for ((mnemonic, _), (sig, record)) in &expected {
                    let codes = sig.codes(&compiled.registry).unwrap();
                    let key = compiled.layout.derive(&codes).unwrap();
                    prop_assert_eq!(compiled.table.lookup(mnemonic, key), Some(record));
                }
            }
            Err(TableError::KeyCollision { .. }) => prop_assert!(conflict),
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }

    #[test]
    fn sizes_add_up(rows in rows()) {
        if let Ok(compiled) = compile(&rows, &Vocabulary::s1c88(), PagePrefixes::S1C88) {
            for (_, keys) in compiled.table.iter() {
                for record in keys.values() {
                    let widths: usize = record
                        .immediates
                        .iter()
                        .map(|i| usize::from(i.byte_width))
                        .sum();
                    prop_assert_eq!(record.total_size, record.opcode_bytes.len() + widths);
                }
            }
        }
    }

    #[test]
    fn deterministic(rows in rows()) {
        let vocab = Vocabulary::s1c88();
        let a = compile(&rows, &vocab, PagePrefixes::S1C88);
        let b = compile(&rows, &vocab, PagePrefixes::S1C88);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn condition_band_separation(rows in rows()) {
        let vocab = Vocabulary::s1c88();
        let (expected, _) = model(&rows, &vocab);
        if let Ok(compiled) = compile(&rows, &vocab, PagePrefixes::S1C88) {
            let r = compiled.layout.radix;
            prop_assert_eq!(compiled.layout.condition_base(), Some(r * r));
            for (sig, _) in expected.values() {
                let key = compiled.layout.derive(&sig.codes(&compiled.registry).unwrap()).unwrap();
                if sig.condition.is_some() {
                    prop_assert!(key >= r * r);
                } else {
                    prop_assert!(key < r * r);
                }
            }
        }
    }

    #[test]
    fn keys_invert(rows in rows()) {
        let vocab = Vocabulary::s1c88();
        if let Ok(compiled) = compile(&rows, &vocab, PagePrefixes::S1C88) {
            for (_, keys) in compiled.table.iter() {
                for &key in keys.keys() {
                    let codes = compiled.layout.invert(key).unwrap();
                    prop_assert_eq!(compiled.layout.derive(&codes), Some(key));
                }
            }
        }
    }
}
