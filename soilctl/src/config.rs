//! Configuration module
//!
//! The configuration file is optional, without one we use the public SoilGrids endpoint
//! and a default transect across Jutland.
//!
//! ```hcl
//! version = 1
//!
//! endpoint        = "https://rest.isric.org/soilgrids/v2.0/properties/query"
//! timeout         = 10
//! max_connections = 5
//!
//! retry {
//!   kind     = "fixed"
//!   attempts = 3
//!   delay    = 2
//! }
//!
//! transect {
//!   start  = [56.225297, 8.662215]
//!   end    = [55.958103, 9.354390]
//!   points = 5
//! }
//! ```
//!
//! Version History:
//!
//! - v1 is the initial version.
//!

use std::path::Path;

use eyre::Result;
use serde::Deserialize;
use tracing::{debug, info, trace};

use transect_common::{ConfigFile, Coordinate, Transect, Versioned};
use transect_sources::{RetryPolicy, DEF_MAX_CONN, DEF_TIMEOUT, SOILGRIDS_URL};

use crate::TransectOpts;

/// Config filename
pub const CONFIG: &str = "soilctl.hcl";

/// Current version
pub const CVERSION: usize = 1;

/// Default transect, west to east across Jutland
const DEF_START: (f64, f64) = (56.225297, 8.662215);
const DEF_END: (f64, f64) = (55.958103, 9.354390);
const DEF_POINTS: usize = 5;

/// Configuration for the CLI tool
///
#[derive(Debug, Deserialize)]
pub struct SoilConfig {
    pub version: usize,
    /// SoilGrids query endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Cap on simultaneous requests for the concurrent fetcher
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Default transect
    pub transect: Option<TransectConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TransectConfig {
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub points: usize,
}

fn default_endpoint() -> String {
    SOILGRIDS_URL.to_string()
}

fn default_timeout() -> u64 {
    DEF_TIMEOUT
}

fn default_max_connections() -> usize {
    DEF_MAX_CONN
}

impl Default for SoilConfig {
    fn default() -> Self {
        SoilConfig {
            version: CVERSION,
            endpoint: default_endpoint(),
            timeout: DEF_TIMEOUT,
            max_connections: DEF_MAX_CONN,
            retry: RetryPolicy::default(),
            transect: None,
        }
    }
}

impl Versioned for SoilConfig {
    fn version(&self) -> usize {
        self.version
    }

    fn expected() -> usize {
        CVERSION
    }
}

impl SoilConfig {
    /// Load the given file, or the default one if it exists, or use the defaults.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&Path>) -> Result<Self> {
        trace!("enter");

        match fname {
            Some(fname) => {
                let fname = fname.to_string_lossy();
                let cfg = ConfigFile::<SoilConfig>::load(Some(&*fname), CONFIG)?;
                info!("Using {:?}", cfg.path());
                Ok(cfg.into_inner())
            }
            None => {
                let def = ConfigFile::<SoilConfig>::default_file(CONFIG);
                if def.exists() {
                    let cfg = ConfigFile::<SoilConfig>::load(None, CONFIG)?;
                    info!("Using {:?}", cfg.path());
                    Ok(cfg.into_inner())
                } else {
                    debug!("no {def:?}, using defaults");
                    Ok(SoilConfig::default())
                }
            }
        }
    }

    /// Build the transect, command-line options first, then file, then defaults.
    ///
    #[tracing::instrument(skip(self))]
    pub fn transect(&self, opts: &TransectOpts) -> Result<Transect> {
        let (start, end, points) = match &self.transect {
            Some(t) => (t.start, t.end, t.points),
            None => (DEF_START, DEF_END, DEF_POINTS),
        };
        let start = opts.from.unwrap_or(Coordinate::from(start));
        let end = opts.to.unwrap_or(Coordinate::from(end));
        let points = opts.points.unwrap_or(points);

        debug!("from {start} to {end} in {points} points");
        Ok(Transect::between(start, end, points)?)
    }
}
