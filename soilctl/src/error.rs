//! Error module
//!

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Status {
    #[error("No point could be fetched out of {0}")]
    NothingFetched(usize),
    #[error("Empty table, nothing to model")]
    EmptyTable,
}
