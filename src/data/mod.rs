pub mod abalone;
pub mod dataset;
pub mod source;

pub use abalone::{parse_records, AbaloneFile};
pub use dataset::Dataset;
pub use source::{DataSource, RandomSource};
