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

//! Compiles an opcode map into per-mnemonic tables keyed by operand signature.
//!
//! ```
//! use opmap_table::{compile, PagePrefixes, PageSlot, Row, Vocabulary};
//!
//! let rows = [Row::new(
//!     2,
//!     0x00,
//!     PageSlot::new("NOP", [None, None]),
//!     PageSlot::undefined(),
//!     PageSlot::undefined(),
//! )];
//! let compiled = compile(&rows, &Vocabulary::s1c88(), PagePrefixes::S1C88).unwrap();
//! assert_eq!(compiled.table.lookup("NOP", 0).unwrap().opcode_bytes, [0x00]);
//! ```

extern crate alloc;

mod builder;
mod error;
pub mod immediate;
pub mod key;
mod registry;
mod row;
mod table;
mod vocab;

pub use builder::{compile, CompiledTable, TableBuilder};
pub use error::TableError;
pub use key::{Key, KeyLayout, Signature, SignatureCodes, SLOTS};
pub use registry::{RegisteredType, TypeRegistry};
pub use row::{InstructionVariant, Page, PagePrefixes, PageSlot, Row, EXPANSION, UNDEFINED};
pub use table::{EncodingRecord, InstructionTable};
pub use vocab::{ImmediateDescriptor, TokenKind, VocabEntry, Vocabulary};
