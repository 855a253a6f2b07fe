//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::FilterArg;
use crate::bitmap::validate_size;

/// Parse and validate a Bayer matrix size (power of two, 2-256)
fn parse_matrix_size(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid matrix size", s))?;
    validate_size(n).map_err(|e| e.to_string())?;
    Ok(n)
}

/// Parse and validate the output height in pixels
fn parse_max_height(s: &str) -> Result<u32, String> {
    let h: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid height", s))?;
    if h == 0 {
        return Err("Height must be greater than 0".to_string());
    }
    Ok(h)
}

/// Convert a photo into a dithered 1-bit bitmap header for printer firmware
#[derive(Parser, Debug)]
#[command(name = "bayer-bitmap")]
#[command(version, about = "Convert an image into a monochrome bitmap C header", long_about = None)]
#[command(subcommand_negates_reqs = true)]
#[command(after_help = "EXAMPLES:
    bayer-bitmap -i cat.jpg -o cat.h
    bayer-bitmap -i cat.jpg -o cat.h --output-img cat_dithered.png -m 8
    bayer-bitmap config init")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Input image
    #[arg(short, long, required = true)]
    pub input: Option<PathBuf>,

    /// Output header file (its stem names the generated symbols)
    #[arg(short, long, required = true)]
    pub output: Option<PathBuf>,

    /// Also save the dithered image
    #[arg(long = "output-img")]
    pub output_img: Option<PathBuf>,

    /// Bayer matrix size (default: 16, or from config file)
    #[arg(short, long, value_parser = parse_matrix_size)]
    pub matrix_size: Option<usize>,

    /// Output height in pixels (default: 384, or from config file)
    #[arg(long, value_parser = parse_max_height)]
    pub max_height: Option<u32>,

    /// Resize filter (default: lanczos3, or from config file)
    #[arg(long)]
    pub filter: Option<FilterArg>,

    /// Save the resized input next to it as <name>resized.<ext>
    #[arg(long)]
    pub save_resized: bool,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Log each conversion step, including the encoded line of every column
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
