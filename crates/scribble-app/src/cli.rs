//! Command line definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scribble")]
#[command(about = "Freehand annotations stored per page URL")]
pub struct Cli {
    /// Annotation store directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub store: Option<PathBuf>,
    /// JSON config file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the page key and what is stored for it.
    Show {
        #[arg(value_name = "URL")]
        url: String,
    },
    /// Replay a JSON script of input steps against a page and save the result.
    Replay {
        #[arg(value_name = "URL")]
        url: String,
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
    },
    /// Render a page's annotations to PNG.
    Export {
        #[arg(value_name = "URL")]
        url: String,
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
        /// Surface width; fitted to the strokes when omitted.
        #[arg(long, requires = "height")]
        width: Option<u32>,
        #[arg(long, requires = "width")]
        height: Option<u32>,
    },
    /// List the pages that have stored annotations.
    List,
    /// Remove every stroke on a page.
    Clear {
        #[arg(value_name = "URL")]
        url: String,
    },
}
