use alloc::vec::Vec;
use hashbrown::HashMap;
use log::{debug, info, warn};
use opmap_util::UnreachableUnwrap;

use crate::{
    immediate::immediates,
    key::{Key, KeyLayout, Signature, SignatureCodes},
    registry::TypeRegistry,
    row::{InstructionVariant, PagePrefixes, Row},
    table::{EncodingRecord, InstructionTable},
    vocab::Vocabulary,
    TableError,
};

/// Where a key came from, kept around for [`TableBuilder::verify`].
#[derive(Debug, Clone, Copy)]
struct Provenance<'a> {
    mnemonic: &'a str,
    key: Key,
    codes: SignatureCodes,
    line: usize,
}

/// Accumulates encodings into an [`InstructionTable`] over a finished [`TypeRegistry`].
#[derive(Debug, Clone)]
pub struct TableBuilder<'a> {
    registry: TypeRegistry<'a>,
    layout: KeyLayout,
    table: InstructionTable<'a>,
    provenance: Vec<Provenance<'a>>,
}

/// The output of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTable<'a> {
    pub registry: TypeRegistry<'a>,
    pub layout: KeyLayout,
    pub table: InstructionTable<'a>,
}

impl<'a> TableBuilder<'a> {
    pub fn new(registry: TypeRegistry<'a>) -> Self {
        Self {
            layout: KeyLayout::new(registry.radix()),
            registry,
            table: InstructionTable::new(),
            provenance: Vec::new(),
        }
    }

    /// Adds `record` under `(mnemonic, key)`. Adding the same record twice is fine, adding a
    /// different one under a taken key is not.
    pub fn insert(
        &mut self,
        mnemonic: &'a str,
        key: Key,
        record: EncodingRecord,
    ) -> Result<(), TableError<'a>> {
        if let Some(existing) = self.table.lookup(mnemonic, key) {
            if *existing == record {
                warn!("{} key {}: duplicate definition of {}", mnemonic, key, record);
                return Ok(());
            }
            return Err(TableError::KeyCollision {
                mnemonic,
                key,
                existing: existing.clone(),
                new: record,
            });
        }
        debug!("{} key {}: {}", mnemonic, key, record);
        self.table.insert(mnemonic, key, record);
        Ok(())
    }

    /// Derives the key and record of `variant` and adds them. Every token of `variant` must
    /// already be registered.
    pub fn insert_variant(
        &mut self,
        variant: &InstructionVariant<'a>,
        vocab: &Vocabulary<'a>,
    ) -> Result<Key, TableError<'a>> {
        let sig = Signature::resolve(variant, vocab)?;
        let codes = match sig.codes(&self.registry) {
            Some(codes) => codes,
            None => {
                // resolve succeeded, so some token is in the vocabulary but wasn't registered
                // with the same kind
                let token = variant
                    .tokens()
                    .find(|t| {
                        self.registry.get(t).map(|(kind, _)| kind)
                            != vocab.get(t).map(|e| e.kind)
                    })
                    .unreachable_unwrap();
                return Err(TableError::UnknownOperandToken {
                    line: variant.line,
                    token,
                });
            }
        };
        let key = self
            .layout
            .derive(&codes)
            .ok_or(TableError::KeyOverflow {
                line: variant.line,
                mnemonic: variant.mnemonic,
            })?;
        let record = EncodingRecord::new(variant.opcode_bytes.clone(), immediates(variant, vocab)?);

        self.insert(variant.mnemonic, key, record)?;
        self.provenance.push(Provenance {
            mnemonic: variant.mnemonic,
            key,
            codes,
            line: variant.line,
        });
        Ok(key)
    }

    /// Checks the invariants of the table built so far: keys of one mnemonic map to one
    /// signature each, sizes add up, conditional keys sit in the condition band and all others
    /// below it, and every key decodes to assigned codes.
    pub fn verify(&self) -> Result<(), TableError<'a>> {
        let band = self.layout.condition_base();
        let mut seen: HashMap<(&str, Key), &Provenance> = HashMap::new();
        for p in &self.provenance {
            match seen.get(&(p.mnemonic, p.key)) {
                Some(first) if first.codes != p.codes => {
                    return Err(TableError::SignatureCollision {
                        mnemonic: p.mnemonic,
                        key: p.key,
                        first_line: first.line,
                        second_line: p.line,
                    });
                }
                Some(_) => {}
                None => {
                    seen.insert((p.mnemonic, p.key), p);
                }
            }

            let in_band = matches!(band, Some(b) if p.key >= b);
            if in_band != (p.codes.condition != 0) {
                return Err(TableError::ConditionBand {
                    mnemonic: p.mnemonic,
                    key: p.key,
                });
            }
        }

        for (mnemonic, keys) in self.table.iter() {
            for (&key, record) in keys {
                if !record.is_consistent() {
                    return Err(TableError::InconsistentSize { mnemonic, key });
                }
                if !self.assigned(key) {
                    return Err(TableError::DanglingKey { mnemonic, key });
                }
            }
        }
        Ok(())
    }

    fn assigned(&self, key: Key) -> bool {
        let Some(codes) = self.layout.invert(key) else {
            return false;
        };
        (codes.condition == 0 || self.registry.condition(codes.condition).is_some())
            && codes
                .operands
                .iter()
                .all(|&c| c == 0 || self.registry.operand(c).is_some())
    }

    pub fn finish(self) -> Result<CompiledTable<'a>, TableError<'a>> {
        self.verify()?;
        Ok(CompiledTable {
            registry: self.registry,
            layout: self.layout,
            table: self.table,
        })
    }
}

/// Compiles opcode map rows into an instruction table.
///
/// The rows are scanned twice. The first pass registers every token in row order, then page
/// order, then column order, which fixes the radix. The second derives keys and inserts records
/// in the same order.
pub fn compile<'a>(
    rows: &[Row<'a>],
    vocab: &Vocabulary<'a>,
    prefixes: PagePrefixes,
) -> Result<CompiledTable<'a>, TableError<'a>> {
    let mut variants = Vec::new();
    for row in rows {
        variants.extend(row.variants(prefixes)?);
    }

    let mut registry = TypeRegistry::new();
    for variant in &variants {
        for token in variant.tokens() {
            let entry = vocab.get(token).ok_or(TableError::UnknownOperandToken {
                line: variant.line,
                token,
            })?;
            registry.register(token, entry.name, entry.kind)?;
        }
    }

    let mut builder = TableBuilder::new(registry);
    for variant in &variants {
        builder.insert_variant(variant, vocab)?;
    }
    let compiled = builder.finish()?;

    info!(
        "compiled {} rows into {} encodings of {} mnemonics (radix {})",
        rows.len(),
        compiled.table.record_count(),
        compiled.table.len(),
        compiled.layout.radix
    );
    Ok(compiled)
}
