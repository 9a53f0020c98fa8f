//! Modbus RTU master for reading holding registers.
//!
//! The crate covers the RTU codec (CRC-16, request framing, response decoding) and a
//! blocking client that runs one request/response exchange over any [`Transport`].
//! A serial port transport is available behind the default `serial` feature.

pub mod config;
pub mod modbus;
pub mod utils;

// Re-export commonly used types
pub use config::{LinkConfig, ParityConfig};
pub use modbus::{
    ClientOptions, DecodeOptions, FunctionCode, ModbusClient, ModbusClientTrait, ReadRequest,
    Register, Transport,
};
#[cfg(feature = "serial")]
pub use modbus::SerialTransport;
pub use utils::error::ModbusError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
