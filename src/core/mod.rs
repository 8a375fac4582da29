pub mod aggregator;
pub mod dividend;
pub mod etl;
pub mod normalizer;
pub mod reporter;

pub use crate::domain::model::{RawSheet, Record};
pub use crate::domain::ports::{ChartRenderer, ConfigProvider, Pipeline, SheetSource, Storage};
pub use crate::utils::error::Result;
