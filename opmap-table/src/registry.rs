use alloc::{vec, vec::Vec};
use hashbrown::HashMap;
use log::debug;

use crate::{vocab::TokenKind, TableError};

/// An operand or condition type that has been assigned a code, along with the tokens that
/// stand for it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RegisteredType<'a> {
    pub name: &'a str,
    pub code: u32,
    /// In first-seen order.
    pub tokens: Vec<&'a str>,
}

/// Dense, first-seen-order codes for the operand and condition types used by an opcode map.
///
/// Codes belong to semantic type names, not tokens: `#nn` and `#mmnn` are both `IMM` and share
/// a code, since an assembler can't tell from a literal which of them it is looking at. The
/// record under the key says how wide the immediate is.
///
/// Operand codes and condition codes are separate bands, each starting at 1. Code 0 stands for
/// an absent operand or condition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRegistry<'a> {
    operands: Vec<RegisteredType<'a>>,
    conditions: Vec<RegisteredType<'a>>,
    names: HashMap<(TokenKind, &'a str), usize>,
    tokens: HashMap<&'a str, (TokenKind, usize)>,
}

impl<'a> TypeRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the code of `token`'s type, assigning the next free code in its band if `name`
    /// hasn't been seen yet.
    pub fn register(
        &mut self,
        token: &'a str,
        name: &'a str,
        kind: TokenKind,
    ) -> Result<u32, TableError<'a>> {
        if let Some(&(existing_kind, i)) = self.tokens.get(token) {
            let existing = &self.band(existing_kind)[i];
            return if existing.name == name && existing_kind == kind {
                Ok(existing.code)
            } else {
                Err(TableError::DuplicateTokenConflict {
                    token,
                    existing: existing.name,
                    new: name,
                })
            };
        }

        let band = match kind {
            TokenKind::Operand => &mut self.operands,
            TokenKind::Condition => &mut self.conditions,
        };
        let i = match self.names.get(&(kind, name)) {
            Some(&i) => {
                band[i].tokens.push(token);
                i
            }
            None => {
                let i = band.len();
                let code = u32::try_from(i + 1).map_err(|_| TableError::TooManyTokens { token })?;
                band.push(RegisteredType {
                    name,
                    code,
                    tokens: vec![token],
                });
                self.names.insert((kind, name), i);
                i
            }
        };
        self.tokens.insert(token, (kind, i));
        let code = band[i].code;
        debug!("registered {} {:?} ({}) as {}", kind, token, name, code);
        Ok(code)
    }

    fn band(&self, kind: TokenKind) -> &[RegisteredType<'a>] {
        match kind {
            TokenKind::Operand => &self.operands,
            TokenKind::Condition => &self.conditions,
        }
    }

    pub fn get(&self, token: &str) -> Option<(TokenKind, &RegisteredType<'a>)> {
        self.tokens
            .get(token)
            .map(|&(kind, i)| (kind, &self.band(kind)[i]))
    }

    pub fn operand_code(&self, token: &str) -> Option<u32> {
        match self.get(token) {
            Some((TokenKind::Operand, t)) => Some(t.code),
            Some((TokenKind::Condition, _)) | None => None,
        }
    }

    pub fn condition_code(&self, token: &str) -> Option<u32> {
        match self.get(token) {
            Some((TokenKind::Condition, t)) => Some(t.code),
            Some((TokenKind::Operand, _)) | None => None,
        }
    }

    /// The operand type with `code`, or `None` for 0 and unassigned codes.
    pub fn operand(&self, code: u32) -> Option<&RegisteredType<'a>> {
        let i = usize::try_from(code).ok()?.checked_sub(1)?;
        self.operands.get(i)
    }

    /// The condition type with `code`, or `None` for 0 and unassigned codes.
    pub fn condition(&self, code: u32) -> Option<&RegisteredType<'a>> {
        let i = usize::try_from(code).ok()?.checked_sub(1)?;
        self.conditions.get(i)
    }

    /// Operand types in code order.
    pub fn operands(&self) -> &[RegisteredType<'a>] {
        &self.operands
    }

    /// Condition types in code order.
    pub fn conditions(&self) -> &[RegisteredType<'a>] {
        &self.conditions
    }

    /// The positional base of signature keys: one more than the number of operand types, so
    /// that every operand code and the absent code 0 fit in one digit.
    pub fn radix(&self) -> u32 {
        // register refuses to hand out codes that don't fit in a u32
        self.operands.last().map_or(1, |t| t.code.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dense_first_seen_codes() {
        let mut r = TypeRegistry::new();
        assert_eq!(r.register("A", "REG_A", TokenKind::Operand), Ok(1));
        assert_eq!(r.register("#nn", "IMM", TokenKind::Operand), Ok(2));
        assert_eq!(r.register("Z", "ZERO", TokenKind::Condition), Ok(1));
        assert_eq!(r.register("[HL]", "MEM_HL", TokenKind::Operand), Ok(3));
        assert_eq!(r.register("C", "CARRY", TokenKind::Condition), Ok(2));
        assert_eq!(r.radix(), 4);
    }

    #[test]
    fn idempotent() {
        let mut r = TypeRegistry::new();
        assert_eq!(r.register("A", "REG_A", TokenKind::Operand), Ok(1));
        assert_eq!(r.register("B", "REG_B", TokenKind::Operand), Ok(2));
        assert_eq!(r.register("A", "REG_A", TokenKind::Operand), Ok(1));
        assert_eq!(r.operands().len(), 2);
        assert_eq!(r.radix(), 3);
    }

    #[test]
    fn shared_names_share_a_code() {
        let mut r = TypeRegistry::new();
        assert_eq!(r.register("#nn", "IMM", TokenKind::Operand), Ok(1));
        assert_eq!(r.register("A", "REG_A", TokenKind::Operand), Ok(2));
        assert_eq!(r.register("#mmnn", "IMM", TokenKind::Operand), Ok(1));
        assert_eq!(r.register("rr", "IMM", TokenKind::Operand), Ok(1));
        assert_eq!(r.radix(), 3);
        assert_eq!(
            r.operands(),
            [
                RegisteredType {
                    name: "IMM",
                    code: 1,
                    tokens: vec!["#nn", "#mmnn", "rr"],
                },
                RegisteredType {
                    name: "REG_A",
                    code: 2,
                    tokens: vec!["A"],
                },
            ]
        );
        assert_eq!(r.operand_code("rr"), r.operand_code("#nn"));
    }

    #[test]
    fn bands_keep_names_apart() {
        let mut r = TypeRegistry::new();
        assert_eq!(r.register("X", "SAME", TokenKind::Operand), Ok(1));
        assert_eq!(r.register("Y", "SAME", TokenKind::Condition), Ok(1));
        assert_eq!(r.register("W", "OTHER", TokenKind::Condition), Ok(2));
        assert_eq!(r.operands().len(), 1);
        assert_eq!(r.conditions().len(), 2);
    }

    #[test]
    fn conflicting_name() {
        let mut r = TypeRegistry::new();
        r.register("A", "REG_A", TokenKind::Operand).unwrap();
        assert_eq!(
            r.register("A", "REG_B", TokenKind::Operand),
            Err(TableError::DuplicateTokenConflict {
                token: "A",
                existing: "REG_A",
                new: "REG_B"
            })
        );
    }

    #[test]
    fn conflicting_kind() {
        let mut r = TypeRegistry::new();
        r.register("C", "CARRY", TokenKind::Condition).unwrap();
        assert!(r.register("C", "CARRY", TokenKind::Operand).is_err());
    }

    #[test]
    fn lookups() {
        let mut r = TypeRegistry::new();
        r.register("A", "REG_A", TokenKind::Operand).unwrap();
        r.register("Z", "ZERO", TokenKind::Condition).unwrap();

        assert_eq!(r.operand_code("A"), Some(1));
        assert_eq!(r.operand_code("Z"), None);
        assert_eq!(r.condition_code("Z"), Some(1));
        assert_eq!(r.condition_code("A"), None);
        assert_eq!(r.operand(1).map(|t| t.name), Some("REG_A"));
        assert_eq!(r.operand(0), None);
        assert_eq!(r.operand(2), None);
        assert_eq!(r.condition(1).map(|t| t.name), Some("ZERO"));
    }

    #[test]
    fn empty_radix() {
        assert_eq!(TypeRegistry::new().radix(), 1);
    }
}
