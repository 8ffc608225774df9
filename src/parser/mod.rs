pub mod rainforest_parser;

pub use rainforest_parser::{Parser, RainforestParser};
