use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;
use strum_macros::Display;

use crate::TableError;

/// Width and signedness of a value trailing the opcode bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImmediateDescriptor {
    pub byte_width: u8,
    pub signed: bool,
}

impl ImmediateDescriptor {
    pub const U8: Self = Self::new(1, false);
    pub const S8: Self = Self::new(1, true);
    pub const U16: Self = Self::new(2, false);
    pub const S16: Self = Self::new(2, true);

    pub const fn new(byte_width: u8, signed: bool) -> Self {
        Self { byte_width, signed }
    }
}

impl fmt::Display for ImmediateDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.signed { 's' } else { 'u' };
        write!(f, "{}{}", sign, u32::from(self.byte_width) * 8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenKind {
    #[strum(serialize = "operand")]
    Operand,
    #[strum(serialize = "condition")]
    Condition,
}

/// One token of the closed vocabulary that opcode map rows may use in their argument columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabEntry<'a> {
    /// The literal text of the token, as it appears in the opcode map, e.g. `[IX+dd]`.
    pub token: &'a str,
    /// The semantic name of the token, e.g. `MEM_IX_DISP`. Several tokens may share a name.
    pub name: &'a str,
    pub kind: TokenKind,
    /// Set for tokens that stand for a value encoded after the opcode bytes.
    pub immediate: Option<ImmediateDescriptor>,
}

impl<'a> VocabEntry<'a> {
    pub const fn operand(token: &'a str, name: &'a str) -> Self {
        Self {
            token,
            name,
            kind: TokenKind::Operand,
            immediate: None,
        }
    }

    pub const fn immediate(token: &'a str, name: &'a str, immediate: ImmediateDescriptor) -> Self {
        Self {
            token,
            name,
            kind: TokenKind::Operand,
            immediate: Some(immediate),
        }
    }

    pub const fn condition(token: &'a str, name: &'a str) -> Self {
        Self {
            token,
            name,
            kind: TokenKind::Condition,
            immediate: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary<'a> {
    entries: Vec<VocabEntry<'a>>,
    index: HashMap<&'a str, usize>,
}

impl<'a> Vocabulary<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`. Re-adding an identical entry is a no-op, but redefining a token in any
    /// other way is rejected.
    pub fn insert(&mut self, entry: VocabEntry<'a>) -> Result<(), TableError<'a>> {
        match self.index.get(entry.token) {
            Some(&i) if self.entries[i] == entry => Ok(()),
            Some(&i) => Err(TableError::DuplicateTokenConflict {
                token: entry.token,
                existing: self.entries[i].name,
                new: entry.name,
            }),
            None => {
                self.index.insert(entry.token, self.entries.len());
                self.entries.push(entry);
                Ok(())
            }
        }
    }

    pub fn get(&self, token: &str) -> Option<&VocabEntry<'a>> {
        self.index.get(token).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &VocabEntry<'a>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Vocabulary<'static> {
    /// The operand and condition tokens of the Epson S1C88 opcode map.
    pub fn s1c88() -> Self {
        let mut v = Self::new();
        for entry in S1C88 {
            // the table below has no repeated tokens
            v.index.insert(entry.token, v.entries.len());
            v.entries.push(*entry);
        }
        v
    }
}

const S1C88: &[VocabEntry<'static>] = &[
    VocabEntry::condition("LT", "LESS_THAN"),
    VocabEntry::condition("LE", "LESS_EQUAL"),
    VocabEntry::condition("GT", "GREATER_THAN"),
    VocabEntry::condition("GE", "GREATER_EQUAL"),
    VocabEntry::condition("V", "OVERFLOW"),
    VocabEntry::condition("NV", "NOT_OVERFLOW"),
    VocabEntry::condition("P", "POSITIVE"),
    VocabEntry::condition("M", "MINUS"),
    VocabEntry::condition("C", "CARRY"),
    VocabEntry::condition("NC", "NOT_CARRY"),
    VocabEntry::condition("Z", "ZERO"),
    VocabEntry::condition("NZ", "NOT_ZERO"),
    VocabEntry::condition("F0", "SPECIAL_FLAG_0"),
    VocabEntry::condition("F1", "SPECIAL_FLAG_1"),
    VocabEntry::condition("F2", "SPECIAL_FLAG_2"),
    VocabEntry::condition("F3", "SPECIAL_FLAG_3"),
    VocabEntry::condition("NF0", "NOT_SPECIAL_FLAG_0"),
    VocabEntry::condition("NF1", "NOT_SPECIAL_FLAG_1"),
    VocabEntry::condition("NF2", "NOT_SPECIAL_FLAG_2"),
    VocabEntry::condition("NF3", "NOT_SPECIAL_FLAG_3"),
    VocabEntry::operand("ALL", "REG_ALL"),
    VocabEntry::operand("ALE", "REG_ALE"),
    VocabEntry::operand("A", "REG_A"),
    VocabEntry::operand("B", "REG_B"),
    VocabEntry::operand("L", "REG_L"),
    VocabEntry::operand("H", "REG_H"),
    VocabEntry::operand("BA", "REG_BA"),
    VocabEntry::operand("HL", "REG_HL"),
    VocabEntry::operand("IX", "REG_IX"),
    VocabEntry::operand("IY", "REG_IY"),
    VocabEntry::operand("NB", "REG_NB"),
    VocabEntry::operand("BR", "REG_BR"),
    VocabEntry::operand("EP", "REG_EP"),
    VocabEntry::operand("IP", "REG_IP"),
    VocabEntry::operand("XP", "REG_XP"),
    VocabEntry::operand("YP", "REG_YP"),
    VocabEntry::operand("SC", "REG_SC"),
    VocabEntry::operand("SP", "REG_SP"),
    VocabEntry::operand("PC", "REG_PC"),
    VocabEntry::operand("[HL]", "MEM_HL"),
    VocabEntry::operand("[IX]", "MEM_IX"),
    VocabEntry::operand("[IY]", "MEM_IY"),
    VocabEntry::operand("[IX+L]", "MEM_IX_OFF"),
    VocabEntry::operand("[IY+L]", "MEM_IY_OFF"),
    VocabEntry::immediate("[SP+dd]", "MEM_SP_DISP", ImmediateDescriptor::S8),
    VocabEntry::immediate("[IX+dd]", "MEM_IX_DISP", ImmediateDescriptor::S8),
    VocabEntry::immediate("[IY+dd]", "MEM_IY_DISP", ImmediateDescriptor::S8),
    VocabEntry::immediate("[BR:ll]", "MEM_BR", ImmediateDescriptor::U8),
    VocabEntry::immediate("[kk]", "MEM_VECTOR", ImmediateDescriptor::U8),
    VocabEntry::immediate("[hhll]", "MEM_ABS", ImmediateDescriptor::U16),
    VocabEntry::immediate("rr", "IMM", ImmediateDescriptor::S8),
    VocabEntry::immediate("qqrr", "IMM", ImmediateDescriptor::S16),
    VocabEntry::immediate("#nn", "IMM", ImmediateDescriptor::U8),
    VocabEntry::immediate("#mmnn", "IMM", ImmediateDescriptor::U16),
];
