pub use concurrent::*;
pub use soilgrids::*;

mod concurrent;
mod soilgrids;
