//! This is the module handling the `model` sub-command.
//!

use std::fs::File;

use eyre::Result;
use tracing::{info, trace};

use process_data::{ModelSummary, SoilModel, SoilTable};

use crate::{build_table, ModelOpts, SoilConfig, Status};

/// Build or load the table then hand it to `model`.
///
#[tracing::instrument(skip(cfg, model))]
pub fn run_model<M: SoilModel>(cfg: &SoilConfig, mopts: &ModelOpts, model: &M) -> Result<ModelSummary> {
    trace!("run_model");

    let table = match &mopts.csv {
        Some(fname) => {
            info!("Reading table from {fname:?}");
            SoilTable::read_csv(File::open(fname)?)?
        }
        None => build_table(cfg, &mopts.table)?,
    };

    if table.is_empty() {
        return Err(Status::EmptyTable.into());
    }
    Ok(model.fit(&table)?)
}
