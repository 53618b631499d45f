use core::fmt;

use crate::{key::Key, row::Page, table::EncodingRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError<'a> {
    /// A row uses a token that isn't in the vocabulary.
    UnknownOperandToken { line: usize, token: &'a str },
    /// Two different encodings of one mnemonic derive the same key.
    KeyCollision {
        mnemonic: &'a str,
        key: Key,
        existing: EncodingRecord,
        new: EncodingRecord,
    },
    /// A token was given two different meanings.
    DuplicateTokenConflict {
        token: &'a str,
        existing: &'a str,
        new: &'a str,
    },
    /// A condition token appeared after the first argument column.
    MisplacedCondition { line: usize, token: &'a str },
    /// An extension page slot is marked as a page prefix.
    MisplacedExpansion { line: usize, page: Page },
    /// Two different signatures of one mnemonic share a key, with identical encodings.
    SignatureCollision {
        mnemonic: &'a str,
        key: Key,
        first_line: usize,
        second_line: usize,
    },
    /// A key doesn't fit in a [`Key`].
    KeyOverflow { line: usize, mnemonic: &'a str },
    /// More tokens than codes.
    TooManyTokens { token: &'a str },
    /// A record's total size disagrees with its opcode bytes and immediates.
    InconsistentSize { mnemonic: &'a str, key: Key },
    /// A key is in the wrong band for whether its signature has a condition.
    ConditionBand { mnemonic: &'a str, key: Key },
    /// A key decodes to codes that were never assigned.
    DanglingKey { mnemonic: &'a str, key: Key },
}

impl fmt::Display for TableError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::UnknownOperandToken { line, token } => {
                write!(f, "line {}: unknown operand token {:?}", line, token)
            }
            TableError::KeyCollision {
                mnemonic,
                key,
                existing,
                new,
            } => write!(
                f,
                "{} key {}: {} collides with {}",
                mnemonic, key, new, existing
            ),
            TableError::DuplicateTokenConflict {
                token,
                existing,
                new,
            } => write!(
                f,
                "token {:?} is already defined as {}, can't redefine it as {}",
                token, existing, new
            ),
            TableError::MisplacedCondition { line, token } => write!(
                f,
                "line {}: condition {:?} must be the first argument",
                line, token
            ),
            TableError::MisplacedExpansion { line, page } => write!(
                f,
                "line {}: only the base page can be an expansion prefix, but {} is",
                line, page
            ),
            TableError::SignatureCollision {
                mnemonic,
                key,
                first_line,
                second_line,
            } => write!(
                f,
                "{} key {}: signatures on lines {} and {} derive the same key",
                mnemonic, key, first_line, second_line
            ),
            TableError::KeyOverflow { line, mnemonic } => {
                write!(f, "line {}: {} key overflows", line, mnemonic)
            }
            TableError::TooManyTokens { token } => {
                write!(f, "no code left for token {:?}", token)
            }
            TableError::InconsistentSize { mnemonic, key } => {
                write!(f, "{} key {}: inconsistent total size", mnemonic, key)
            }
            TableError::ConditionBand { mnemonic, key } => {
                write!(f, "{} key {}: key is outside its condition band", mnemonic, key)
            }
            TableError::DanglingKey { mnemonic, key } => {
                write!(f, "{} key {}: key decodes to unassigned codes", mnemonic, key)
            }
        }
    }
}
