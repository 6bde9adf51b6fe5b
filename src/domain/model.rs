use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Request body of `POST /delivery_fee`.
///
/// Integers are signed so that negative values reach semantic validation
/// instead of failing deserialization. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub cart_value: i64,
    pub delivery_distance: i64,
    pub number_of_items: i64,
    pub time: String,
}

/// An order that passed validation. Only `OrderValidator` produces one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Cart value in currency subunits.
    pub cart_value: u64,
    /// Delivery distance in meters.
    pub delivery_distance: u64,
    pub number_of_items: u64,
    /// ISO-8601 timestamp with an explicit UTC offset.
    pub time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFeeResponse {
    pub delivery_fee: u64,
}

/// Thresholds, fees and the rush-hour window used when pricing an order.
///
/// Every amount is in currency subunits and every distance in meters. Fields
/// missing from a config file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    pub max_delivery_fee: u64,
    pub free_delivery_cart_value: u64,
    pub min_cart_value_no_surcharge: u64,
    pub rush_hour_multiplier: f64,

    pub starting_distance: u64,
    pub distance_starting_fee: u64,
    pub distance_step: u64,
    pub distance_step_fee: u64,

    pub max_items_no_surcharge: u64,
    pub additional_fee_per_item: u64,
    pub max_items_no_bulk_fee: u64,
    pub items_bulk_fee: u64,

    pub rush_hour_weekday: Weekday,
    /// First UTC hour of the rush window, inclusive.
    pub rush_hour_start: u32,
    /// UTC hour at which the rush window closes, exclusive.
    pub rush_hour_end: u32,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            max_delivery_fee: 1500,
            free_delivery_cart_value: 20000,
            min_cart_value_no_surcharge: 1000,
            rush_hour_multiplier: 1.2,
            starting_distance: 1000,
            distance_starting_fee: 200,
            distance_step: 500,
            distance_step_fee: 100,
            max_items_no_surcharge: 4,
            additional_fee_per_item: 50,
            max_items_no_bulk_fee: 12,
            items_bulk_fee: 120,
            rush_hour_weekday: Weekday::Fri,
            rush_hour_start: 15,
            rush_hour_end: 19,
        }
    }
}
