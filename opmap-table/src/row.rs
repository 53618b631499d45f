use alloc::vec::Vec;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::TableError;

/// Mnemonic column value for opcodes that don't decode to anything.
pub const UNDEFINED: &str = "undefined";
/// Mnemonic column value for base page opcodes that are themselves extension page prefixes.
pub const EXPANSION: &str = "[EXPANSION]";

/// Opcode pages, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Page {
    #[strum(serialize = "base page")]
    Base,
    #[strum(serialize = "page A")]
    A,
    #[strum(serialize = "page B")]
    B,
}

/// The prefix bytes that select the extension pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePrefixes {
    pub page_a: u8,
    pub page_b: u8,
}

impl PagePrefixes {
    pub const S1C88: Self = Self {
        page_a: 0xCE,
        page_b: 0xCF,
    };

    pub fn prefix(&self, page: Page) -> Option<u8> {
        match page {
            Page::Base => None,
            Page::A => Some(self.page_a),
            Page::B => Some(self.page_b),
        }
    }
}

impl Default for PagePrefixes {
    fn default() -> Self {
        Self::S1C88
    }
}

/// One page's columns of an opcode map row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageSlot<'a> {
    // carried through for diagnostics only
    pub cycles: &'a str,
    pub mnemonic: &'a str,
    pub args: [Option<&'a str>; 2],
}

impl<'a> PageSlot<'a> {
    pub const fn new(mnemonic: &'a str, args: [Option<&'a str>; 2]) -> Self {
        Self {
            cycles: "",
            mnemonic,
            args,
        }
    }

    pub const fn undefined() -> Self {
        Self::new(UNDEFINED, [None, None])
    }

    fn is_undefined(&self) -> bool {
        // empty slots are how hand-edited maps usually spell undefined
        self.mnemonic.is_empty() || self.mnemonic == UNDEFINED
    }

    fn is_expansion(&self) -> bool {
        self.mnemonic.eq_ignore_ascii_case(EXPANSION)
    }
}

/// One line of an opcode map: an opcode byte and what it means on each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    /// Source line, used in diagnostics.
    pub line: usize,
    pub opcode: u8,
    /// Indexed in [`Page`] order.
    pub slots: [PageSlot<'a>; 3],
}

impl<'a> Row<'a> {
    pub fn new(line: usize, opcode: u8, base: PageSlot<'a>, a: PageSlot<'a>, b: PageSlot<'a>) -> Self {
        Self {
            line,
            opcode,
            slots: [base, a, b],
        }
    }

    pub fn slot(&self, page: Page) -> &PageSlot<'a> {
        match page {
            Page::Base => &self.slots[0],
            Page::A => &self.slots[1],
            Page::B => &self.slots[2],
        }
    }

    /// The instructions this row defines, in column order.
    pub fn variants(
        &self,
        prefixes: PagePrefixes,
    ) -> Result<Vec<InstructionVariant<'a>>, TableError<'a>> {
        let mut variants = Vec::new();
        for page in Page::iter() {
            let slot = self.slot(page);
            if slot.is_undefined() {
                continue;
            }
            if slot.is_expansion() {
                if page == Page::Base {
                    continue;
                }
                return Err(TableError::MisplacedExpansion {
                    line: self.line,
                    page,
                });
            }

            let mut opcode_bytes = Vec::with_capacity(2);
            opcode_bytes.extend(prefixes.prefix(page));
            opcode_bytes.push(self.opcode);
            variants.push(InstructionVariant {
                line: self.line,
                page,
                mnemonic: slot.mnemonic,
                args: slot.args,
                opcode_bytes,
            });
        }
        Ok(variants)
    }
}

/// A single instruction defined by one page of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionVariant<'a> {
    pub line: usize,
    pub page: Page,
    pub mnemonic: &'a str,
    /// Operand and condition tokens, verbatim from the row.
    pub args: [Option<&'a str>; 2],
    pub opcode_bytes: Vec<u8>,
}

impl<'a> InstructionVariant<'a> {
    pub fn tokens(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.args.iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use pretty_assertions::assert_eq;

    macro_rules! slot {
        ($m:expr) => {
            PageSlot::new($m, [None, None])
        };
        ($m:expr, $a:expr) => {
            PageSlot::new($m, [Some($a), None])
        };
        ($m:expr, $a:expr, $b:expr) => {
            PageSlot::new($m, [Some($a), Some($b)])
        };
    }

    #[test]
    fn base_only() {
        let row = Row::new(2, 0x00, slot!("NOP"), PageSlot::undefined(), PageSlot::undefined());
        assert_eq!(
            row.variants(PagePrefixes::S1C88).unwrap(),
            vec![InstructionVariant {
                line: 2,
                page: Page::Base,
                mnemonic: "NOP",
                args: [None, None],
                opcode_bytes: vec![0x00],
            }]
        );
    }

    #[test]
    fn all_pages() {
        let row = Row::new(
            7,
            0x20,
            slot!("ADD", "A", "#nn"),
            slot!("JP", "Z", "qqrr"),
            slot!("LD", "BA", "[hhll]"),
        );
        let variants = row.variants(PagePrefixes::S1C88).unwrap();
        assert_eq!(
            variants
                .iter()
                .map(|v| (v.page, v.mnemonic, v.opcode_bytes.clone()))
                .collect::<Vec<_>>(),
            vec![
                (Page::Base, "ADD", vec![0x20]),
                (Page::A, "JP", vec![0xCE, 0x20]),
                (Page::B, "LD", vec![0xCF, 0x20]),
            ]
        );
        assert_eq!(variants[1].tokens().collect::<Vec<_>>(), vec!["Z", "qqrr"]);
    }

    #[test]
    fn custom_prefixes() {
        let row = Row::new(1, 0x10, PageSlot::undefined(), slot!("X"), slot!("Y"));
        let prefixes = PagePrefixes {
            page_a: 0xDD,
            page_b: 0xFD,
        };
        let bytes = row
            .variants(prefixes)
            .unwrap()
            .into_iter()
            .map(|v| v.opcode_bytes)
            .collect::<Vec<_>>();
        assert_eq!(bytes, vec![vec![0xDD, 0x10], vec![0xFD, 0x10]]);
    }

    #[test]
    fn expansion_and_undefined_are_absent() {
        let row = Row::new(1, 0xCE, slot!("[EXPANSION]"), slot!(""), slot!("undefined"));
        assert!(row.variants(PagePrefixes::S1C88).unwrap().is_empty());
        let row = Row::new(1, 0xCF, slot!("[expansion]"), slot!("undefined"), slot!("undefined"));
        assert!(row.variants(PagePrefixes::S1C88).unwrap().is_empty());
    }

    #[test]
    fn expansion_on_extension_page() {
        let row = Row::new(9, 0xCE, slot!("NOP"), PageSlot::undefined(), slot!("[EXPANSION]"));
        assert_eq!(
            row.variants(PagePrefixes::S1C88),
            Err(TableError::MisplacedExpansion {
                line: 9,
                page: Page::B
            })
        );
    }
}
