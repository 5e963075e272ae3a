use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "padzipdev: binary padding & archive tool", long_about = None)]
pub struct Cli {
    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Append filler bytes to each file, optionally zipping the result
    Grow {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Megabytes (MiB) to append
        #[arg(short, long, default_value_t = 100)]
        size: u64,

        /// Output path; without it each input is grown in place
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fill byte: null, ff, random, pattern
        #[arg(short = 't', long = "type", default_value = "null")]
        fill: String,

        /// Also bundle the padded file into this ZIP archive
        #[arg(short, long)]
        zip: Option<PathBuf>,

        /// ZIP compression level 0-9
        #[arg(short = 'l', long = "compression-level", default_value_t = 9)]
        level: u32,

        /// Filler chunk size in bytes
        #[arg(long, default_value_t = padzip_core::grow::DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        /// Write the destination directly instead of staging and renaming
        #[arg(long)]
        direct: bool,
    },

    /// Print size and digests for each file
    Info {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Bundle files into a ZIP archive without padding
    Zip {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(short, long, default_value = "compressed_files.zip")]
        zip: PathBuf,

        #[arg(short = 'l', long = "compression-level", default_value_t = 9)]
        level: u32,

        /// Use zstd instead of deflate for compressed entries
        #[arg(long)]
        zstd: bool,
    },

    /// Original -> padded copy -> archive, reporting each step
    Demo {
        input: PathBuf,

        /// Megabytes (MiB) to append
        #[arg(short, long, default_value_t = 150)]
        size: u64,

        /// Directory for the padded copy and archive (defaults to the input's directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}
