use crate::core::fee::FeeCalculator;
use crate::core::validator::OrderValidator;
use crate::domain::model::{DeliveryFeeResponse, FeeConfig, OrderRequest};
use crate::utils::error::OrderValidationError;
use std::sync::Arc;

/// Validates an order request, then prices it.
#[derive(Debug, Clone)]
pub struct FeeEngine {
    validator: OrderValidator,
    calculator: FeeCalculator,
}

impl FeeEngine {
    pub fn new(config: Arc<FeeConfig>) -> Self {
        Self {
            validator: OrderValidator::new(),
            calculator: FeeCalculator::new(config),
        }
    }

    pub fn run(&self, request: &OrderRequest) -> Result<DeliveryFeeResponse, OrderValidationError> {
        // Validate
        let order = self.validator.validate(request).inspect_err(|e| {
            tracing::debug!("Order rejected: {}", e);
        })?;

        // Calculate
        let delivery_fee = self.calculator.calculate_delivery_fee(&order);
        tracing::debug!(
            cart_value = order.cart_value,
            delivery_distance = order.delivery_distance,
            number_of_items = order.number_of_items,
            time = %order.time,
            delivery_fee,
            "Delivery fee calculated"
        );

        Ok(DeliveryFeeResponse { delivery_fee })
    }
}

impl Default for FeeEngine {
    fn default() -> Self {
        Self::new(Arc::new(FeeConfig::default()))
    }
}
