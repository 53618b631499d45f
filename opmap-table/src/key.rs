//! Signature keys.
//!
//! A variant's operand codes are read as the digits of a base-`radix` number, outermost operand
//! first. Absent operands are the digit 0, so zero- and one-operand signatures fall out of the
//! same formula. A condition code `c` adds `c * radix^SLOTS`, which puts every conditional
//! signature above every unconditional one.

use crate::{
    registry::TypeRegistry,
    row::InstructionVariant,
    vocab::{TokenKind, Vocabulary},
    TableError,
};

pub type Key = u32;

/// Number of operand columns per page.
pub const SLOTS: usize = 2;

/// A variant's operand and condition tokens, sorted into key slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature<'a> {
    pub condition: Option<&'a str>,
    /// Outermost first. A condition consumes slot 0, so a conditional branch's target stays in
    /// slot 1.
    pub operands: [Option<&'a str>; SLOTS],
}

impl<'a> Signature<'a> {
    pub fn resolve(
        variant: &InstructionVariant<'a>,
        vocab: &Vocabulary<'a>,
    ) -> Result<Self, TableError<'a>> {
        let mut sig = Signature {
            condition: None,
            operands: variant.args,
        };
        for (slot, token) in variant.args.iter().enumerate() {
            let Some(token) = *token else { continue };
            let entry = vocab.get(token).ok_or(TableError::UnknownOperandToken {
                line: variant.line,
                token,
            })?;
            if entry.kind == TokenKind::Condition {
                if slot != 0 {
                    return Err(TableError::MisplacedCondition {
                        line: variant.line,
                        token,
                    });
                }
                sig.condition = Some(token);
                sig.operands[0] = None;
            }
        }
        Ok(sig)
    }

    /// Looks up the codes of every token. Returns `None` if one of them is unregistered.
    pub fn codes(&self, registry: &TypeRegistry<'a>) -> Option<SignatureCodes> {
        let condition = match self.condition {
            Some(t) => registry.condition_code(t)?,
            None => 0,
        };
        let mut operands = [0; SLOTS];
        for (code, token) in operands.iter_mut().zip(self.operands) {
            if let Some(t) = token {
                *code = registry.operand_code(t)?;
            }
        }
        Some(SignatureCodes {
            condition,
            operands,
        })
    }
}

/// A signature in registry codes, 0 meaning absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SignatureCodes {
    pub condition: u32,
    pub operands: [u32; SLOTS],
}

/// Everything needed to compute or invert keys outside of this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KeyLayout {
    pub radix: u32,
    pub slots: u32,
    /// The power of `radix` that condition codes are multiplied by.
    pub condition_power: u32,
}

impl KeyLayout {
    pub fn new(radix: u32) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "SLOTS is a small constant"
        )]
        let slots = SLOTS as u32;
        Self {
            radix,
            slots,
            condition_power: slots,
        }
    }

    /// `radix^condition_power`, the smallest conditional key.
    pub fn condition_base(&self) -> Option<Key> {
        self.radix.checked_pow(self.condition_power)
    }

    /// Returns `None` if the key doesn't fit in a [`Key`], or if a code isn't a valid digit.
    pub fn derive(&self, codes: &SignatureCodes) -> Option<Key> {
        let mut key: Key = 0;
        for &code in &codes.operands {
            if code >= self.radix {
                return None;
            }
            key = key.checked_mul(self.radix)?.checked_add(code)?;
        }
        if codes.condition != 0 {
            key = codes
                .condition
                .checked_mul(self.condition_base()?)?
                .checked_add(key)?;
        }
        Some(key)
    }

    /// Splits a key back into codes. Returns `None` for a degenerate radix.
    pub fn invert(&self, key: Key) -> Option<SignatureCodes> {
        if self.radix == 0 {
            return None;
        }
        // a radix too large to raise to the band power means no key can reach the band
        let (condition, mut rest) = match self.condition_base() {
            Some(base) => (key / base, key % base),
            None => (0, key),
        };
        let mut operands = [0; SLOTS];
        for code in operands.iter_mut().rev() {
            *code = rest % self.radix;
            rest /= self.radix;
        }
        Some(SignatureCodes {
            condition,
            operands,
        })
    }
}
