#![no_std]
#![deny(clippy::alloc_instead_of_core)]
#![deny(clippy::allow_attributes_without_reason)]
#![deny(clippy::cast_possible_truncation)]
#![deny(clippy::dbg_macro)]
#![deny(clippy::equatable_if_let)]
#![deny(clippy::filter_map_next)]
#![deny(clippy::flat_map_option)]
#![deny(clippy::map_unwrap_or)]
#![deny(clippy::missing_panics_doc)]
#![deny(clippy::option_if_let_else)]
#![deny(clippy::panic)]
#![deny(clippy::std_instead_of_alloc)]
#![deny(clippy::std_instead_of_core)]
#![deny(clippy::todo)]
#![deny(clippy::wildcard_enum_match_arm)]
#![deny(clippy::wildcard_imports)]
#![deny(macro_use_extern_crate)]
// TODO: enable this when things are stable
// #![deny(missing_docs)]
#![deny(unused_extern_crates)]
#![deny(unused_lifetimes)]
#![deny(unused_qualifications)]

//! Loaders for opcode map CSV files and vocabulary files. Everything loaded borrows from the
//! input text.

extern crate alloc;

mod lex;
mod rows;
mod vocab;

use core::{fmt, num::IntErrorKind};

pub use lex::{LexError, LexErrorKind};
use opmap_table::TableError;
pub use rows::{load_rows, FIELDS};
pub use vocab::load_vocabulary;

#[derive(Debug, PartialEq, Eq)]
pub struct LoadError<'a> {
    /// 1-based line of the input the error was found on.
    pub line: usize,
    pub kind: LoadErrorKind<'a>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum LoadErrorKind<'a> {
    LexError(LexErrorKind),
    /// A record with the wrong number of fields. Holds the number found.
    FieldCount(usize),
    ParseIntError(IntErrorKind),
    UnknownKeyword(&'a str),
    ExpectedField,
    UnexpectedField(&'a str),
    UnknownImmediate(&'a str),
    ConditionImmediate(&'a str),
    Table(TableError<'a>),
}

impl fmt::Display for LoadError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            LoadErrorKind::LexError(k) => match k {
                LexErrorKind::UnterminatedQuote => write!(f, "unterminated quoted field"),
                LexErrorKind::EscapedQuote => {
                    write!(f, "escaped quotes are not supported in quoted fields")
                }
                LexErrorKind::UnexpectedQuote => write!(f, "unexpected quote"),
            },
            LoadErrorKind::FieldCount(n) => {
                write!(f, "expected {} fields, found {}", FIELDS, n)
            }
            LoadErrorKind::ParseIntError(k) => write!(f, "invalid opcode byte: {:?}", k),
            LoadErrorKind::UnknownKeyword(w) => {
                write!(f, "unknown keyword \"{}\", expected \"arg\" or \"cond\"", w)
            }
            LoadErrorKind::ExpectedField => write!(f, "expected a token and a name"),
            LoadErrorKind::UnexpectedField(w) => write!(f, "unexpected \"{}\"", w),
            LoadErrorKind::UnknownImmediate(w) => write!(
                f,
                "unknown immediate \"{}\", expected one of u8, s8, u16, s16",
                w
            ),
            LoadErrorKind::ConditionImmediate(t) => {
                write!(f, "condition \"{}\" cannot carry an immediate", t)
            }
            LoadErrorKind::Table(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages() {
        assert_eq!(
            LoadError {
                line: 4,
                kind: LoadErrorKind::FieldCount(12)
            }
            .to_string(),
            "line 4: expected 13 fields, found 12"
        );
        assert_eq!(
            LoadError {
                line: 1,
                kind: LoadErrorKind::LexError(LexErrorKind::UnterminatedQuote)
            }
            .to_string(),
            "line 1: unterminated quoted field"
        );
        assert_eq!(
            LoadError {
                line: 7,
                kind: LoadErrorKind::ConditionImmediate("NZ")
            }
            .to_string(),
            "line 7: condition \"NZ\" cannot carry an immediate"
        );
    }
}
