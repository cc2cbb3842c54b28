pub use fetch::*;
pub use model::*;
pub use table::*;
pub use transect::*;

mod fetch;
mod model;
mod table;
mod transect;
