use alloc::vec::Vec;

use crate::{
    row::InstructionVariant,
    vocab::{ImmediateDescriptor, TokenKind, Vocabulary},
    TableError,
};

/// The values trailing `variant`'s opcode bytes, in operand order.
pub fn immediates<'a>(
    variant: &InstructionVariant<'a>,
    vocab: &Vocabulary<'a>,
) -> Result<Vec<ImmediateDescriptor>, TableError<'a>> {
    let mut res = Vec::new();
    for token in variant.tokens() {
        let entry = vocab.get(token).ok_or(TableError::UnknownOperandToken {
            line: variant.line,
            token,
        })?;
        match entry.kind {
            TokenKind::Operand => res.extend(entry.immediate),
            // flags select the opcode, they're never encoded after it
            TokenKind::Condition => {}
        }
    }
    Ok(res)
}

/// Total encoded length of an instruction.
pub fn total_size(opcode_bytes: &[u8], immediates: &[ImmediateDescriptor]) -> usize {
    opcode_bytes.len()
        + immediates
            .iter()
            .map(|i| usize::from(i.byte_width))
            .sum::<usize>()
}
