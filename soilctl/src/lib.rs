//! Library part of the `soilctl` utility.
//!
//! The pipeline is split into one function per step, each sub-command calling the previous
//! step unless its input is given as a file:
//!
//! - `show_transect()` computes the sampling points;
//! - `fetch_transect()` queries SoilGrids for each of them;
//! - `build_table()` reduces the answers into a `SoilTable`;
//! - `run_model()` fits a `SoilModel` over the table.
//!

use std::fs;
use std::path::Path;

use eyre::Result;
use tracing::info;

pub use cli::*;
pub use cmds::*;
pub use config::*;
pub use error::*;

mod cli;
mod cmds;
mod config;
mod error;

/// Write `data` into `output` or on stdout.
///
pub fn write_output(output: Option<&Path>, data: &str) -> Result<()> {
    match output {
        Some(fname) => {
            info!("Writing to {fname:?}");
            fs::write(fname, data)?;
        }
        None => println!("{data}"),
    }
    Ok(())
}

/// Return our version number
///
#[inline]
pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
