pub mod convert;
pub mod driver;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod remap;

pub use driver::{run, MigrationConfig, MigrationSummary};
pub use error::{MigrateError, Result};
