//! What comes out of fetching a whole transect.
//!

use std::fmt::{Display, Formatter};

use serde::Serialize;
use tracing::{info, warn};

use transect_common::Coordinate;

use crate::{FetchError, PointRecord};

/// One point we could not get.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PointFailure {
    pub coord: Coordinate,
    pub detail: String,
}

impl Display for PointFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.coord, self.detail)
    }
}

/// Successful records in request order, plus the list of dropped points.
///
#[derive(Clone, Debug, Default, Serialize)]
pub struct FetchReport {
    pub records: Vec<PointRecord>,
    pub failures: Vec<PointFailure>,
}

impl FetchReport {
    /// Gather per-point results, in the order given, logging every failure.
    ///
    pub fn collect<I>(results: I) -> Self
    where
        I: IntoIterator<Item = (Coordinate, Result<PointRecord, FetchError>)>,
    {
        let mut report = FetchReport::default();

        for (coord, res) in results {
            match res {
                Ok(rec) => {
                    info!("Successfully fetched data for point {coord}");
                    report.records.push(rec);
                }
                Err(e) => {
                    warn!("Error fetching data for point {coord}: {e}");
                    report.failures.push(PointFailure {
                        coord,
                        detail: e.to_string(),
                    });
                }
            }
        }
        report
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.records.len() + self.failures.len()
    }

    pub fn into_records(self) -> Vec<PointRecord> {
        self.records
    }
}

impl Display for FetchReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "points={} ok={} failed={}",
            self.total(),
            self.records.len(),
            self.failures.len()
        )
    }
}
