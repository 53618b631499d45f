use alloc::vec::Vec;
use log::debug;
use opmap_table::{PageSlot, Row};
use opmap_util::ParseByte;

use crate::{
    lex::{lex, TokenKind},
    LoadError, LoadErrorKind,
};

/// Fields per record: the opcode, then cycles, mnemonic and two arguments for each of the three
/// pages.
pub const FIELDS: usize = 13;

/// Loads the rows of an opcode map. The first non-blank record is a header and is skipped, as
/// are blank lines. Unquoted fields are trimmed; quoted fields are kept verbatim.
pub fn load_rows(input: &str) -> Result<Vec<Row<'_>>, LoadError<'_>> {
    let mut rows = Vec::new();
    let mut fields = Vec::with_capacity(FIELDS);
    let mut line = 1;
    // a quoted field can span lines, so a record's line is where it starts
    let mut record_line = 1;
    let mut header = true;

    for t in lex(input) {
        let t = t.map_err(|e| LoadError {
            line,
            kind: LoadErrorKind::LexError(e.kind),
        })?;
        match t.kind {
            TokenKind::Field(f) => fields.push(f.trim()),
            TokenKind::Quoted(f) => {
                fields.push(f);
                line += f.matches('\n').count();
            }
            TokenKind::Comma => {}
            TokenKind::Newline => {
                finish_record(record_line, &mut fields, &mut header, &mut rows)?;
                line += 1;
                record_line = line;
            }
        }
    }
    finish_record(record_line, &mut fields, &mut header, &mut rows)?;

    debug!("loaded {} opcode map rows", rows.len());
    Ok(rows)
}

fn finish_record<'a>(
    line: usize,
    fields: &mut Vec<&'a str>,
    header: &mut bool,
    rows: &mut Vec<Row<'a>>,
) -> Result<(), LoadError<'a>> {
    let blank = matches!(fields.as_slice(), [] | [""]);
    if !blank {
        if *header {
            *header = false;
        } else {
            rows.push(parse_row(line, fields)?);
        }
    }
    fields.clear();
    Ok(())
}

fn parse_row<'a>(line: usize, fields: &[&'a str]) -> Result<Row<'a>, LoadError<'a>> {
    if fields.len() != FIELDS {
        return Err(LoadError {
            line,
            kind: LoadErrorKind::FieldCount(fields.len()),
        });
    }
    let opcode = u8::parse_byte(fields[0]).map_err(|e| LoadError {
        line,
        kind: LoadErrorKind::ParseIntError(e),
    })?;
    let slot = |page: usize| {
        let f = &fields[1 + page * 4..5 + page * 4];
        PageSlot {
            cycles: f[0],
            mnemonic: f[1],
            args: [arg(f[2]), arg(f[3])],
        }
    };
    Ok(Row::new(line, opcode, slot(0), slot(1), slot(2)))
}

#[inline(always)]
fn arg(field: &str) -> Option<&str> {
    (!field.is_empty()).then_some(field)
}
