pub mod mock;
pub mod rainforest;
pub mod traits;

pub use mock::mock_deals;
pub use rainforest::RainforestSource;
pub use traits::DealSource;
