use crate::domain::model::FeeConfig;

/// Resolved settings the server needs, whatever their source.
pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn fee_config(&self) -> &FeeConfig;
    fn json_logs(&self) -> bool;
}
