//! ISRIC SoilGrids specific code, concurrent version.
//!
//! Same requests as `SoilGrids` but several of them can be in flight at once, never more
//! than `max_connections`.  Results are gathered in request order whatever the order in
//! which the answers come back.
//!

use std::time::Duration;

use async_trait::async_trait;
use clap::{crate_name, crate_version};
use futures::stream::{self, StreamExt};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, trace};

use transect_common::{Coordinate, Transect};

use crate::{
    http_get_query, query_for, AsyncFetchable, FetchError, FetchReport, PointRecord, RetryPolicy,
    DEF_TIMEOUT, SOILGRIDS_URL,
};

/// Default number of simultaneous requests
pub const DEF_MAX_CONN: usize = 5;

/// Concurrent SoilGrids client.
///
#[derive(Clone, Debug)]
pub struct AsyncSoilGrids {
    /// Full endpoint URL
    pub base_url: String,
    /// What to do on network faults, for every request
    pub retry: RetryPolicy,
    /// Max number of requests in flight
    pub max_connections: usize,
    /// reqwest async client
    pub client: Client,
}

impl AsyncSoilGrids {
    #[tracing::instrument]
    pub fn new() -> Result<Self, FetchError> {
        Self::with(SOILGRIDS_URL, RetryPolicy::default(), DEF_TIMEOUT, DEF_MAX_CONN)
    }

    /// Build one with a specific endpoint, retry policy, timeout (in seconds) and cap.
    ///
    #[tracing::instrument]
    pub fn with(
        base_url: &str,
        retry: RetryPolicy,
        timeout: u64,
        max_connections: usize,
    ) -> Result<Self, FetchError> {
        let max_connections = max_connections.max(1);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .pool_max_idle_per_host(max_connections)
            .build()?;

        Ok(AsyncSoilGrids {
            base_url: base_url.to_owned(),
            retry,
            max_connections,
            client,
        })
    }

    async fn get_once(&self, coord: &Coordinate) -> Result<PointRecord, FetchError> {
        let query = query_for(coord);
        let resp = http_get_query!(self, &self.base_url, &query).await?;

        debug!("{:?}", &resp);

        match resp.status() {
            StatusCode::OK => {
                trace!("OK");
            }
            code => {
                let body = resp.text().await.unwrap_or_default();
                return Err(FetchError::Status {
                    code: code.as_u16(),
                    body,
                });
            }
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl AsyncFetchable for AsyncSoilGrids {
    fn name(&self) -> String {
        "soilgrids".to_string()
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_point(&self, coord: &Coordinate) -> Result<PointRecord, FetchError> {
        self.retry.run_async(|| self.get_once(coord)).await
    }

    #[tracing::instrument(skip(self, transect))]
    async fn fetch(&self, transect: &Transect) -> FetchReport {
        info!(
            "Fetching {} points, {} at a time",
            transect.len(),
            self.max_connections
        );

        // `buffered` keeps the input order.
        //
        let results: Vec<_> = stream::iter(transect.iter().copied())
            .map(|c| async move { (c, self.fetch_point(&c).await) })
            .buffered(self.max_connections)
            .collect()
            .await;

        FetchReport::collect(results)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    const START: (f64, f64) = (56.225297, 8.662215);
    const END: (f64, f64) = (55.958103, 9.354390);

    fn answer(c: &Coordinate) -> serde_json::Value {
        json!({
            "geometry": { "type": "Point", "coordinates": [c.lon(), c.lat()] },
            "properties": { "layers": [ { "name": "ocs", "depths": [ { "values": { "mean": 63 } } ] } ] }
        })
    }

    fn setup(server: &MockServer, max: usize) -> AsyncSoilGrids {
        AsyncSoilGrids::with(
            &server.url("/query"),
            RetryPolicy::Fixed {
                attempts: 3,
                delay: 0,
            },
            5,
            max,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_async_fetch_keeps_order() {
        let server = MockServer::start_async().await;
        let t = Transect::new(START, END, 5).unwrap();

        for (i, c) in t.iter().enumerate() {
            // The first answer is the slowest.
            //
            let delay = if i == 0 { 300 } else { 0 };
            server
                .mock_async(|when, then| {
                    when.method(GET)
                        .path("/query")
                        .query_param("lat", c.lat().to_string().as_str());
                    then.status(200)
                        .delay(Duration::from_millis(delay))
                        .json_body(answer(c));
                })
                .await;
        }

        let site = setup(&server, 3);
        let report = site.fetch(&t).await;

        assert_eq!(5, report.records.len());
        let got: Vec<_> = report
            .records
            .iter()
            .filter_map(|r| r.coordinate())
            .collect();
        let want: Vec<_> = t.iter().copied().collect();
        assert_eq!(want, got);
    }

    #[tokio::test]
    async fn test_async_fetch_respects_max_connections() {
        const DELAY: u64 = 250;

        let server = MockServer::start_async().await;
        let t = Transect::new(START, END, 6).unwrap();

        let m = server
            .mock_async(|when, then| {
                when.method(GET).path("/query");
                then.status(200)
                    .delay(Duration::from_millis(DELAY))
                    .json_body(answer(&t[0]));
            })
            .await;

        let site = setup(&server, 2);
        let start = Instant::now();
        let report = site.fetch(&t).await;
        let elapsed = start.elapsed();

        m.assert_hits_async(6).await;
        assert_eq!(6, report.records.len());

        // 6 points, 2 at a time: three rounds at least, but not one after the other.
        //
        assert!(elapsed >= Duration::from_millis(3 * DELAY), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(6 * DELAY), "{elapsed:?}");
    }

    #[tokio::test]
    async fn test_async_fetch_one_fails() {
        let server = MockServer::start_async().await;
        let t = Transect::new(START, END, 3).unwrap();

        for (i, c) in t.iter().enumerate() {
            let status = if i == 2 { 404 } else { 200 };
            server
                .mock_async(|when, then| {
                    when.method(GET)
                        .query_param("lat", c.lat().to_string().as_str());
                    then.status(status).json_body(answer(c));
                })
                .await;
        }

        let site = setup(&server, 5);
        let report = site.fetch(&t).await;

        assert_eq!(2, report.records.len());
        assert_eq!(1, report.failures.len());
        assert_eq!(t[2], report.failures[0].coord);
    }

    #[test]
    fn test_async_max_connections_at_least_one() {
        let site = AsyncSoilGrids::with(SOILGRIDS_URL, RetryPolicy::Never, 1, 0).unwrap();
        assert_eq!(1, site.max_connections);
    }
}
