use crate::core::timestamp::Timestamp;
use crate::domain::model::{FeeConfig, Order};
use chrono::{Datelike, Timelike};
use std::sync::Arc;

/// Prices validated orders. Pure: no I/O and no shared mutable state.
#[derive(Debug, Clone)]
pub struct FeeCalculator {
    config: Arc<FeeConfig>,
}

impl FeeCalculator {
    pub fn new(config: Arc<FeeConfig>) -> Self {
        Self { config }
    }

    /// Full delivery fee in currency subunits.
    ///
    /// Steps run in a fixed order: free-delivery threshold, small-order
    /// surcharge, distance and item surcharges, rush-hour multiplier, cap.
    pub fn calculate_delivery_fee(&self, order: &Order) -> u64 {
        let config = &*self.config;

        if order.cart_value >= config.free_delivery_cart_value {
            return 0;
        }

        let mut fee = self
            .cart_value_surcharge(order.cart_value)
            .saturating_add(self.distance_surcharge(order.delivery_distance))
            .saturating_add(self.items_surcharge(order.number_of_items));

        if self.is_rush_hour(&order.time) {
            fee = self.apply_rush_hour_multiplier(fee);
        }

        fee.min(config.max_delivery_fee)
    }

    /// Gap between the cart value and the minimum order value.
    pub fn cart_value_surcharge(&self, cart_value: u64) -> u64 {
        self.config
            .min_cart_value_no_surcharge
            .saturating_sub(cart_value)
    }

    /// Starting fee for the first stretch, plus one step fee per started
    /// step beyond it.
    pub fn distance_surcharge(&self, distance: u64) -> u64 {
        let config = &*self.config;

        if distance <= config.starting_distance {
            return config.distance_starting_fee;
        }

        let steps_started = (distance - config.starting_distance).div_ceil(config.distance_step);
        config
            .distance_starting_fee
            .saturating_add(steps_started.saturating_mul(config.distance_step_fee))
    }

    pub fn items_surcharge(&self, items: u64) -> u64 {
        let config = &*self.config;
        let mut fee = 0u64;

        if items > config.max_items_no_surcharge {
            let additional_items = items - config.max_items_no_surcharge;
            fee = additional_items.saturating_mul(config.additional_fee_per_item);
        }

        if items > config.max_items_no_bulk_fee {
            fee = fee.saturating_add(config.items_bulk_fee);
        }

        fee
    }

    /// Whether `time` falls inside the rush-hour window once converted to UTC.
    ///
    /// Anything that does not resolve to a definite instant (parse failures,
    /// naive timestamps) counts as outside the window.
    pub fn is_rush_hour(&self, time: &str) -> bool {
        let config = &*self.config;

        Timestamp::parse(time)
            .ok()
            .and_then(|ts| ts.to_utc())
            .map(|utc| {
                utc.weekday() == config.rush_hour_weekday
                    && (config.rush_hour_start..config.rush_hour_end).contains(&utc.hour())
            })
            .unwrap_or(false)
    }

    /// Rounds to the nearest subunit, ties away from zero.
    fn apply_rush_hour_multiplier(&self, fee: u64) -> u64 {
        (fee as f64 * self.config.rush_hour_multiplier).round() as u64
    }
}

impl Default for FeeCalculator {
    fn default() -> Self {
        Self::new(Arc::new(FeeConfig::default()))
    }
}
