use core::str::FromStr;

use log::debug;
use opmap_table::{ImmediateDescriptor, VocabEntry, Vocabulary};
use strum_macros::EnumString;

use crate::{LoadError, LoadErrorKind};

#[derive(Debug, PartialEq, Eq, Clone, Copy, EnumString)]
#[strum(serialize_all = "lowercase")]
enum Keyword {
    Arg,
    Cond,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, EnumString)]
#[strum(serialize_all = "lowercase")]
enum Width {
    U8,
    S8,
    U16,
    S16,
}

impl From<Width> for ImmediateDescriptor {
    fn from(w: Width) -> Self {
        match w {
            Width::U8 => ImmediateDescriptor::U8,
            Width::S8 => ImmediateDescriptor::S8,
            Width::U16 => ImmediateDescriptor::U16,
            Width::S16 => ImmediateDescriptor::S16,
        }
    }
}

/// Loads a vocabulary file. Each non-blank line that doesn't start with `#` is one of
///
/// ```text
/// cond <token> <name>
/// arg <token> <name> [u8|s8|u16|s16]
/// ```
///
/// with words separated by whitespace.
pub fn load_vocabulary(input: &str) -> Result<Vocabulary<'_>, LoadError<'_>> {
    let mut vocab = Vocabulary::new();
    for (i, text) in input.lines().enumerate() {
        let line = i + 1;
        let text = text.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let err = |kind| LoadError { line, kind };

        let mut words = text.split_whitespace();
        let keyword = match words.next() {
            Some(w) => Keyword::from_str(w).map_err(|_| err(LoadErrorKind::UnknownKeyword(w)))?,
            None => continue,
        };
        let token = words.next().ok_or(err(LoadErrorKind::ExpectedField))?;
        let name = words.next().ok_or(err(LoadErrorKind::ExpectedField))?;
        let immediate = words
            .next()
            .map(|w| {
                Width::from_str(w)
                    .map(ImmediateDescriptor::from)
                    .map_err(|_| err(LoadErrorKind::UnknownImmediate(w)))
            })
            .transpose()?;
        if let Some(w) = words.next() {
            return Err(err(LoadErrorKind::UnexpectedField(w)));
        }

        let entry = match (keyword, immediate) {
            (Keyword::Cond, None) => VocabEntry::condition(token, name),
            (Keyword::Cond, Some(_)) => {
                return Err(err(LoadErrorKind::ConditionImmediate(token)));
            }
            (Keyword::Arg, None) => VocabEntry::operand(token, name),
            (Keyword::Arg, Some(imm)) => VocabEntry::immediate(token, name, imm),
        };
        vocab
            .insert(entry)
            .map_err(|e| err(LoadErrorKind::Table(e)))?;
    }

    debug!("loaded {} vocabulary entries", vocab.len());
    Ok(vocab)
}
