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
#![deny(clippy::std_instead_of_alloc)]
#![deny(clippy::std_instead_of_core)]
#![deny(clippy::todo)]
#![deny(clippy::wildcard_enum_match_arm)]
#![deny(clippy::wildcard_imports)]
#![deny(macro_use_extern_crate)]
#![deny(unused_crate_dependencies)]
#![deny(unused_extern_crates)]
#![deny(unused_lifetimes)]
#![deny(unused_qualifications)]

use core::num::IntErrorKind;

/// Parsing of single opcode bytes as they appear in opcode maps and on the command line.
pub trait ParseByte {
    /// Parses `s` as a hexadecimal byte. A leading `0x`/`0X` is optional, and surrounding
    /// whitespace is ignored, so `"CE"`, `"0xce"` and `" 0xCE "` are all `0xCE`.
    fn parse_byte(s: &str) -> Result<Self, IntErrorKind>
    where
        Self: Sized;
}

impl ParseByte for u8 {
    fn parse_byte(s: &str) -> Result<Self, IntErrorKind> {
        let s = s.trim();
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        // from_str_radix accepts a leading '+', which has no business in an opcode column
        if body.starts_with('+') {
            return Err(IntErrorKind::InvalidDigit);
        }
        u8::from_str_radix(body, 16).map_err(|err| err.kind().clone())
    }
}

/// Unwrapping for values whose presence is guaranteed by an earlier pass.
pub trait UnreachableUnwrap<T> {
    /// # Panics
    ///
    /// Panics if the value is absent, which indicates a bug in the caller rather than bad
    /// input.
    fn unreachable_unwrap(self) -> T;
}

impl<T> UnreachableUnwrap<T> for Option<T> {
    #[inline(always)]
    fn unreachable_unwrap(self) -> T {
        match self {
            Some(t) => t,
            None => unreachable!(),
        }
    }
}
