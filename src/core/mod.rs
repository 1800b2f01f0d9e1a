pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{InputRecord, LookupResult, OutputRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, EntityLookup, Pipeline, Storage};
pub use crate::utils::error::Result;
