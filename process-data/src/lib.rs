//! Processing of the fetched soil samples.
//!
//! - `max_value()` and `process_point()` reduce one `PointRecord` to a `ReducedRow` holding
//!   the maximum mean value over all depths of clay, sand, silt and organic carbon stock;
//! - `SoilTable` stacks these rows in fetch order, can be displayed, saved or loaded as CSV;
//! - `SoilModel` is the interface of the linear model run over the table, `Ols` is the
//!   default implementation.
//!

pub use error::*;
pub use model::*;
pub use reduce::*;
pub use table::*;

mod error;
mod model;
mod reduce;
mod table;

use transect_sources::PointRecord;

/// Read raw records as saved by `soilctl fetch` (a JSON array).
///
pub fn read_records<R: std::io::Read>(input: R) -> Result<Vec<PointRecord>, TableError> {
    Ok(serde_json::from_reader(input)?)
}

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
