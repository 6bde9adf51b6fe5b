use thiserror::Error;

pub const INVALID_TIME_FORMAT: &str = "Invalid time format: ";
pub const INVALID_UTC_OFFSET: &str = "Time string does not include timezone offset or 'Z'";

/// 時間字串解析失敗的原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("String does not contain a date")]
    Empty,

    #[error("Unrecognized ISO-8601 layout: {0:?}")]
    UnrecognizedLayout(String),

    #[error("Invalid date component: {0:?}")]
    InvalidDate(String),

    #[error("Invalid time component: {0:?}")]
    InvalidTime(String),

    #[error("Invalid timezone offset: {0:?}")]
    InvalidOffset(String),

    #[error("{component} must be between {min} and {max}, got {value}")]
    OutOfRange {
        component: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("Day is out of range for month: {0}")]
    NonexistentDate(String),
}

/// 單一欄位的語意驗證錯誤
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Cart value must not be a negative value")]
    InvalidCartValue,

    #[error("Delivery distance must not be a negative value")]
    InvalidDeliveryDistance,

    #[error("Number of items must be a positive value")]
    InvalidNumberOfItems,

    #[error("{}{}", INVALID_TIME_FORMAT, .0)]
    InvalidTimeFormat(TimestampError),

    #[error("{}{}", INVALID_TIME_FORMAT, INVALID_UTC_OFFSET)]
    MissingUtcOffset,
}

/// All semantic violations of one order, kept in field order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", joined(.0))]
pub struct OrderValidationError(pub Vec<OrderError>);

impl OrderValidationError {
    pub fn errors(&self) -> &[OrderError] {
        &self.0
    }
}

fn joined(errors: &[OrderError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Error, Debug)]
pub enum DeliveryFeeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value {value:?} for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, DeliveryFeeError>;
