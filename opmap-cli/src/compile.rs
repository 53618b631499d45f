use std::{
    error::Error,
    fs::{self, read_to_string},
    io::{self, Write},
    path::PathBuf,
};

use anyhow::anyhow;
use log::info;
use opmap_loader as loader;
use opmap_table::{self as table, CompiledTable, PagePrefixes, Vocabulary};

use crate::{emit, Format, Input};

/// The text of an opcode map and its vocabulary. Compiled tables borrow from this.
pub struct Sources {
    map: String,
    vocab: Option<String>,
}

impl Sources {
    pub fn read(input: &Input) -> Result<Self, Box<dyn Error>> {
        let map = read_to_string(&input.map)
            .map_err(|e| anyhow!("failed to read {}: {}", input.map.display(), e))?;
        let vocab = match &input.vocab {
            Some(path) => Some(
                read_to_string(path)
                    .map_err(|e| anyhow!("failed to read {}: {}", path.display(), e))?,
            ),
            None => None,
        };
        Ok(Self { map, vocab })
    }

    pub fn compile(&self, prefixes: PagePrefixes) -> Result<CompiledTable<'_>, Box<dyn Error>> {
        let vocab = match &self.vocab {
            Some(text) => loader::load_vocabulary(text)
                .map_err(|e| anyhow!("failed to load vocabulary: {}", e))?,
            None => Vocabulary::s1c88(),
        };
        let rows =
            loader::load_rows(&self.map).map_err(|e| anyhow!("failed to load opcode map: {}", e))?;
        Ok(table::compile(&rows, &vocab, prefixes)
            .map_err(|e| anyhow!("compilation failed: {}", e))?)
    }
}

pub fn build(input: &Input, out_path: Option<PathBuf>, format: Format) -> Result<(), Box<dyn Error>> {
    let sources = Sources::read(input)?;
    let compiled = sources.compile(input.prefixes())?;

    let mut out: Box<dyn Write> = match &out_path {
        Some(path) => {
            if *path == input.map {
                Err(anyhow!("output path would overwrite the opcode map"))?;
            }
            info!("writing {:?} output to {}", format, path.display());
            Box::new(
                fs::File::create(path)
                    .map_err(|e| anyhow!("failed to create output file: {}", e))?,
            )
        }
        None => Box::new(io::stdout().lock()),
    };
    match format {
        Format::Js => emit::js(&compiled, &mut out),
        Format::Json => emit::json(&compiled, &mut out),
    }
    .map_err(|e| anyhow!("failed to write output: {}", e))?;
    Ok(out.flush()?)
}
