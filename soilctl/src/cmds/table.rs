//! This is the module handling the `table` sub-command.
//!

use std::fs::{self, File};
use std::path::Path;

use eyre::Result;
use tracing::{info, trace};

use process_data::{read_records, SoilTable};

use crate::{fetch_transect, SoilConfig, TableOpts};

/// Get the records, either from a previous `fetch` or from the network, and reduce them.
///
#[tracing::instrument(skip(cfg))]
pub fn build_table(cfg: &SoilConfig, topts: &TableOpts) -> Result<SoilTable> {
    trace!("build_table");

    let records = match &topts.input {
        Some(fname) => {
            info!("Reading records from {fname:?}");
            read_records(File::open(fname)?)?
        }
        None => fetch_transect(cfg, &topts.fetch)?.into_records(),
    };

    let table = SoilTable::from_records(&records);
    info!("{} rows", table.len());
    Ok(table)
}

/// Output as CSV if the file name says so, as a pretty table otherwise.
///
#[tracing::instrument(skip(table))]
pub fn write_table(table: &SoilTable, output: Option<&Path>) -> Result<()> {
    match output {
        Some(fname) => {
            let is_csv = fname
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

            info!("Writing to {fname:?}");
            if is_csv {
                table.write_csv(File::create(fname)?)?;
            } else {
                fs::write(fname, table.render())?;
            }
        }
        None => println!("{}", table.render()),
    }
    Ok(())
}
