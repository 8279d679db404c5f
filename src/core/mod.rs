pub mod engine;
pub mod evaluator;
pub mod profile;
pub mod records;
pub mod report;
pub mod status;

pub use crate::domain::model::{EvaluationInput, StatusReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
pub use evaluator::is_satisfied;
pub use profile::build_profile;
pub use status::{country_missing_count, country_percent_satisfied};
