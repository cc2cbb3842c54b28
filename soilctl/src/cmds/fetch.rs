//! This is the module handling the `fetch` sub-command.
//!

use eyre::Result;
use tracing::{info, trace};

use transect_sources::{AsyncFetchable, AsyncSoilGrids, FetchReport, Fetchable, SoilGrids};

use crate::{FetchOpts, SoilConfig, Status};

/// Actual fetching of data along the transect
///
/// Bad transect parameters are fatal and are checked before any network activity.  Points
/// that can not be fetched are reported and skipped, only when none could be fetched do we
/// give up.
///
#[tracing::instrument(skip(cfg))]
pub fn fetch_transect(cfg: &SoilConfig, fopts: &FetchOpts) -> Result<FetchReport> {
    trace!("fetch_transect");

    let t = cfg.transect(&fopts.transect)?;
    info!("Fetching {} points from {}", t.len(), cfg.endpoint);

    let report = if fopts.concurrent {
        let max = fopts.max_connections.unwrap_or(cfg.max_connections);
        let site = AsyncSoilGrids::with(&cfg.endpoint, cfg.retry, cfg.timeout, max)?;

        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        rt.block_on(site.fetch(&t))
    } else {
        let site = SoilGrids::with(&cfg.endpoint, cfg.retry, cfg.timeout)?;
        site.fetch(&t)
    };
    info!("{report}");

    if report.records.is_empty() {
        return Err(Status::NothingFetched(t.len()).into());
    }
    Ok(report)
}

/// Raw records as a JSON array, readable back by `table -i`
///
pub fn records_to_json(report: &FetchReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&report.records)?)
}
