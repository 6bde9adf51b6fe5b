use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "delivery-fee")]
#[command(about = "HTTP service that calculates order delivery fees")]
pub struct CliConfig {
    #[arg(long, help = "Address to bind [default: 127.0.0.1]")]
    pub host: Option<String>,

    #[arg(long, help = "Port to listen on [default: 8000]")]
    pub port: Option<u16>,

    #[arg(long, short, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 合併預設值、TOML 檔案與命令列參數，命令列優先
    pub fn load_settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.into_settings(),
            None => Settings::default(),
        };

        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if self.json_logs {
            settings.json_logs = true;
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_config_file() {
        let cli = CliConfig::parse_from(["delivery-fee"]);
        assert_eq!(cli.load_settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_cli_flags_override_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"
[server]
host = "0.0.0.0"
port = 9000

[fees]
max_delivery_fee = 2000
"#,
            )
            .unwrap();

        let path = temp_file.path().to_str().unwrap();
        let cli = CliConfig::parse_from(["delivery-fee", "--config", path, "--port", "9100"]);
        let settings = cli.load_settings().unwrap();

        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 9100);
        assert_eq!(settings.fees.max_delivery_fee, 2000);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli = CliConfig::parse_from(["delivery-fee", "--port", "0"]);
        assert!(cli.load_settings().is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = CliConfig::parse_from(["delivery-fee", "--config", "/nonexistent/delivery-fee.toml"]);
        assert!(cli.load_settings().is_err());
    }
}
