use alloc::{collections::BTreeMap, vec::Vec};
use core::fmt;
use hashbrown::HashMap;

use crate::{immediate::total_size, key::Key, vocab::ImmediateDescriptor};

/// The compiled encoding of one signature of one mnemonic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EncodingRecord {
    pub opcode_bytes: Vec<u8>,
    /// Opcode bytes plus the widths of all immediates.
    pub total_size: usize,
    pub immediates: Vec<ImmediateDescriptor>,
}

impl EncodingRecord {
    pub fn new(opcode_bytes: Vec<u8>, immediates: Vec<ImmediateDescriptor>) -> Self {
        Self {
            total_size: total_size(&opcode_bytes, &immediates),
            opcode_bytes,
            immediates,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.total_size == total_size(&self.opcode_bytes, &self.immediates)
    }
}

impl fmt::Display for EncodingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, b) in self.opcode_bytes.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        write!(f, "]")?;
        for i in &self.immediates {
            write!(f, " {}", i)?;
        }
        write!(f, " ({} bytes)", self.total_size)
    }
}

/// Mnemonic to key to encoding. Mnemonics iterate in the order they were first inserted, keys
/// in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionTable<'a> {
    mnemonics: Vec<(&'a str, BTreeMap<Key, EncodingRecord>)>,
    index: HashMap<&'a str, usize>,
}

impl<'a> InstructionTable<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` under `key`, replacing whatever was there. Callers check for an
    /// existing record first.
    pub(crate) fn insert(&mut self, mnemonic: &'a str, key: Key, record: EncodingRecord) {
        let i = match self.index.get(mnemonic) {
            Some(&i) => i,
            None => {
                self.index.insert(mnemonic, self.mnemonics.len());
                self.mnemonics.push((mnemonic, BTreeMap::new()));
                self.mnemonics.len() - 1
            }
        };
        self.mnemonics[i].1.insert(key, record);
    }

    pub fn get(&self, mnemonic: &str) -> Option<&BTreeMap<Key, EncodingRecord>> {
        self.index.get(mnemonic).map(|&i| &self.mnemonics[i].1)
    }

    pub fn lookup(&self, mnemonic: &str, key: Key) -> Option<&EncodingRecord> {
        self.get(mnemonic)?.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &BTreeMap<Key, EncodingRecord>)> {
        self.mnemonics.iter().map(|(m, keys)| (*m, keys))
    }

    /// Number of mnemonics.
    pub fn len(&self) -> usize {
        self.mnemonics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mnemonics.is_empty()
    }

    /// Number of encodings across all mnemonics.
    pub fn record_count(&self) -> usize {
        self.mnemonics.iter().map(|(_, keys)| keys.len()).sum()
    }
}
