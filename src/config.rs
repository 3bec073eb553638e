use std::path::PathBuf;

use clap::Parser;

/// TV Show Explorer - filter a TV show table and chart the result
#[derive(Parser, Debug, Clone)]
#[command(name = "tv-show-explorer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show table to load (.csv, .tsv, .json or .parquet)
    #[arg(long, env = "TV_SHOWS_DATA", default_value = "data/df.csv")]
    pub data: PathBuf,

    /// Initial window width
    #[arg(long, default_value_t = 1400.0)]
    pub width: f32,

    /// Initial window height
    #[arg(long, default_value_t = 900.0)]
    pub height: f32,
}
