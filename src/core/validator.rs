use crate::core::timestamp::Timestamp;
use crate::domain::model::{Order, OrderRequest};
use crate::utils::error::{OrderError, OrderValidationError};

const MIN_CART_VALUE: u64 = 0;
const MIN_DELIVERY_DISTANCE: u64 = 0;
const MIN_NUMBER_OF_ITEMS: u64 = 1;

/// Semantic checks on an order request.
///
/// Every field is checked even after a failure, so the caller gets all
/// problems at once, in field order.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderValidator;

impl OrderValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, request: &OrderRequest) -> Result<Order, OrderValidationError> {
        let mut errors = Vec::new();

        let cart_value = at_least(request.cart_value, MIN_CART_VALUE);
        if cart_value.is_none() {
            errors.push(OrderError::InvalidCartValue);
        }

        let delivery_distance = at_least(request.delivery_distance, MIN_DELIVERY_DISTANCE);
        if delivery_distance.is_none() {
            errors.push(OrderError::InvalidDeliveryDistance);
        }

        let number_of_items = at_least(request.number_of_items, MIN_NUMBER_OF_ITEMS);
        if number_of_items.is_none() {
            errors.push(OrderError::InvalidNumberOfItems);
        }

        if let Err(e) = validate_time(&request.time) {
            errors.push(e);
        }

        match (cart_value, delivery_distance, number_of_items) {
            (Some(cart_value), Some(delivery_distance), Some(number_of_items))
                if errors.is_empty() =>
            {
                Ok(Order {
                    cart_value,
                    delivery_distance,
                    number_of_items,
                    time: request.time.clone(),
                })
            }
            _ => Err(OrderValidationError(errors)),
        }
    }
}

/// The time must parse as ISO-8601 and name its offset explicitly.
pub fn validate_time(time: &str) -> Result<(), OrderError> {
    let timestamp = Timestamp::parse(time).map_err(OrderError::InvalidTimeFormat)?;
    if timestamp.is_naive() {
        return Err(OrderError::MissingUtcOffset);
    }
    Ok(())
}

fn at_least(value: i64, min: u64) -> Option<u64> {
    u64::try_from(value).ok().filter(|v| *v >= min)
}
