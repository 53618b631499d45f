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

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use opmap_table::PagePrefixes;
use opmap_util::ParseByte;

mod check;
mod compile;
mod emit;
use check::check;
use compile::build;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    #[clap(about = "Compile an opcode map into lookup tables")]
    Build {
        #[clap(flatten)]
        input: Input,
        #[clap(short)]
        out_path: Option<PathBuf>,
        #[clap(short, long, value_enum, default_value = "js")]
        format: Format,
    },
    #[clap(about = "Compile an opcode map and report on the result")]
    Check {
        #[clap(flatten)]
        input: Input,
        #[clap(short, long, help = "List every encoding")]
        list: bool,
    },
}

#[derive(ClapArgs)]
pub struct Input {
    map: PathBuf,
    #[clap(short, long, help = "Vocabulary file, defaults to the S1C88 vocabulary")]
    vocab: Option<PathBuf>,
    #[clap(long, value_parser = parse_prefix, default_value = "CE")]
    page_a: u8,
    #[clap(long, value_parser = parse_prefix, default_value = "CF")]
    page_b: u8,
}

impl Input {
    fn prefixes(&self) -> PagePrefixes {
        PagePrefixes {
            page_a: self.page_a,
            page_b: self.page_b,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Js,
    Json,
}

fn parse_prefix(s: &str) -> Result<u8, String> {
    u8::parse_byte(s).map_err(|e| format!("invalid prefix byte {:?}: {:?}", s, e))
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    if let Err(e) = match Args::parse().action {
        Action::Build {
            input,
            out_path,
            format,
        } => build(&input, out_path, format),
        Action::Check { input, list } => check(&input, list),
    } {
        eprintln!("\x1b[1;31m{}\x1b[1;0m", e);
        std::process::exit(1);
    }
}
