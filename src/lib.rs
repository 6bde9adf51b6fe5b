pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::http::{create_router, run_server};
pub use crate::config::Settings;
pub use crate::core::{engine::FeeEngine, fee::FeeCalculator, validator::OrderValidator};
pub use crate::domain::model::{DeliveryFeeResponse, FeeConfig, Order, OrderRequest};
pub use crate::utils::error::{DeliveryFeeError, Result};
