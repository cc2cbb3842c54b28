//! This is the module handling the `transect` sub-command.
//!

use eyre::Result;
use tracing::trace;

use transect_common::list_transect;

use crate::{SoilConfig, TransectOpts};

/// Compute the points and return them as a table
///
#[tracing::instrument(skip(cfg))]
pub fn show_transect(cfg: &SoilConfig, topts: &TransectOpts) -> Result<String> {
    trace!("show_transect");

    let t = cfg.transect(topts)?;
    Ok(list_transect(&t))
}
