pub mod engine;
pub mod naming;
pub mod pipeline;
pub mod resolver;
pub mod translator;

pub use crate::domain::model::{ConfigDocument, NetworkRecord, ResolvedService, ServiceRecord};
pub use crate::domain::ports::{ClusterSource, ConfigProvider, LoadOutcome, Pipeline, Storage};
pub use crate::utils::error::Result;
