//! Module to deal with the soil data sources we can fetch from.
//!
//! There is only one at the moment, the ISRIC [SoilGrids] REST API, accessed in two ways:
//!
//! - `SoilGrids`, blocking, one point after the other;
//! - `AsyncSoilGrids`, several points in flight at once, up to a fixed cap.
//!
//! Both send one query per point of a `Transect` and return a `FetchReport`.  A point that
//! can not be fetched is logged and dropped, it never stops the others.
//!
//! [SoilGrids]: https://rest.isric.org/soilgrids/v2.0/docs
//!

use std::fmt::Debug;

use async_trait::async_trait;

use transect_common::{Coordinate, Transect};

// Re-export these modules for a shorted import path.
//
pub use access::*;
pub use error::*;
pub use format::*;
pub use query::*;
pub use report::*;
pub use retry::*;

mod access;
mod error;
mod format;
mod query;
mod report;
mod retry;

#[macro_use]
mod macros;

/// This trait enables us to manage different ways of connecting and fetching data under
/// a single interface.
///
pub trait Fetchable: Debug {
    /// Return site's name
    fn name(&self) -> String;
    /// Fetch a single point, retrying on network faults
    fn fetch_point(&self, coord: &Coordinate) -> Result<PointRecord, FetchError>;
    /// Fetch every point in order, failed points are reported and skipped
    #[tracing::instrument(skip(self, transect))]
    fn fetch(&self, transect: &Transect) -> FetchReport {
        FetchReport::collect(transect.iter().map(|c| (*c, self.fetch_point(c))))
    }
}

/// This is the async version of `Fetchable`.
///
#[async_trait]
pub trait AsyncFetchable: Debug + Send + Sync {
    /// Return site's name
    fn name(&self) -> String;
    /// Fetch a single point, retrying on network faults
    async fn fetch_point(&self, coord: &Coordinate) -> Result<PointRecord, FetchError>;
    /// Fetch every point, results are in request order
    async fn fetch(&self, transect: &Transect) -> FetchReport;
}

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
