pub mod cache;
pub mod config;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod provider;
pub mod sort;
pub mod source;
pub mod utils;
pub mod validator;

pub use config::AppConfig;
pub use model::{Deal, RawDeal};
pub use provider::{DealOptions, DealProvider, SourceMode};
