pub mod engine;
pub mod fee;
pub mod timestamp;
pub mod validator;

pub use crate::domain::model::{DeliveryFeeResponse, FeeConfig, Order, OrderRequest};
pub use crate::domain::ports::ConfigProvider;
pub use crate::utils::error::Result;
