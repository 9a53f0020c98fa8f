use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::modbus::{ClientOptions, DecodeOptions};
use crate::utils::error::ModbusError;

/// Serial link and exchange settings for one bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    // Connection settings
    pub serial_port: String,
    pub baud_rate: u32,
    pub data_bits: u8,
    pub stop_bits: u8,
    pub parity: ParityConfig,
    pub timeout_ms: u64,

    // Exchange settings
    pub flush_before_request: bool,
    pub strict_byte_count: bool,
    pub check_echo: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParityConfig {
    None,
    Even,
    Odd,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            serial_port: "/dev/ttyS0".to_string(),
            baud_rate: 9600,
            data_bits: 8,
            stop_bits: 1,
            parity: ParityConfig::None,
            timeout_ms: 1000,

            flush_before_request: true,
            strict_byte_count: false,
            check_echo: false,
        }
    }
}

impl LinkConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModbusError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ModbusError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: LinkConfig = toml::from_str(&content)?;
        info!("📄 Loaded link configuration from {}", path.display());
        debug!("{:?}", config);
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ModbusError> {
        let path = path.as_ref();
        // Create directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ModbusError::Config(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| {
            ModbusError::Config(format!("Failed to write {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            flush_before_request: self.flush_before_request,
            check_echo: self.check_echo,
            decode: DecodeOptions {
                strict_byte_count: self.strict_byte_count,
            },
        }
    }
}
