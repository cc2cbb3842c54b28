//! ISRIC SoilGrids specific code, blocking version.
//!
//! One GET per point on `properties/query`, one point at a time.  There is no
//! authentication and nothing is kept between calls.
//!

use std::time::Duration;

use clap::{crate_name, crate_version};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::{debug, trace};

use transect_common::Coordinate;

use crate::{http_get_query, query_for, FetchError, Fetchable, PointRecord, RetryPolicy, SOILGRIDS_URL};

/// Default per-request timeout in seconds
pub const DEF_TIMEOUT: u64 = 10;

/// This is the SoilGrids client/source struct.
///
#[derive(Clone, Debug)]
pub struct SoilGrids {
    /// Full endpoint URL
    pub base_url: String,
    /// What to do on network faults
    pub retry: RetryPolicy,
    /// reqwest blocking client
    pub client: Client,
}

impl SoilGrids {
    #[tracing::instrument]
    pub fn new() -> Result<Self, FetchError> {
        trace!("soilgrids::new");
        Self::with(SOILGRIDS_URL, RetryPolicy::default(), DEF_TIMEOUT)
    }

    /// Build one with a specific endpoint, retry policy and timeout (in seconds).
    ///
    #[tracing::instrument]
    pub fn with(base_url: &str, retry: RetryPolicy, timeout: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(SoilGrids {
            base_url: base_url.to_owned(),
            retry,
            client,
        })
    }

    /// One request, no retry.
    ///
    fn get_once(&self, coord: &Coordinate) -> Result<PointRecord, FetchError> {
        let query = query_for(coord);
        let resp = http_get_query!(self, &self.base_url, &query)?;

        debug!("{:?}", &resp);

        // Check status
        //
        match resp.status() {
            StatusCode::OK => {
                trace!("OK");
            }
            code => {
                let body = resp.text().unwrap_or_default();
                return Err(FetchError::Status {
                    code: code.as_u16(),
                    body,
                });
            }
        }

        trace!("Fetching raw data");
        let body = resp.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl Fetchable for SoilGrids {
    fn name(&self) -> String {
        "soilgrids".to_string()
    }

    #[tracing::instrument(skip(self))]
    fn fetch_point(&self, coord: &Coordinate) -> Result<PointRecord, FetchError> {
        trace!("soilgrids::fetch_point");
        self.retry.run(|| self.get_once(coord))
    }
}
