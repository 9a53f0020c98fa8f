use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModbusError {
    #[error("Transport write failed: {0}")]
    TransportWrite(#[source] io::Error),

    #[error("Transport read failed: {0}")]
    TransportRead(#[source] io::Error),

    #[error("Transport flush failed: {0}")]
    TransportFlush(#[source] io::Error),

    #[error("CRC checksum mismatch: expected {expected:02x?}, received {received:02x?}")]
    CrcMismatch { expected: [u8; 2], received: [u8; 2] },

    #[error("Malformed frame: {len} bytes, need at least {min}")]
    MalformedFrame { len: usize, min: usize },

    #[error("Byte count field says {reported}, frame carries {actual} data bytes")]
    ByteCountMismatch { reported: u8, actual: usize },

    #[error("Unexpected response: address {address}, function 0x{function:02x}")]
    UnexpectedResponse { address: u8, function: u8 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown function code: 0x{0:02x}")]
    UnknownFunctionCode(u8),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for ModbusError {
    fn from(err: toml::de::Error) -> Self {
        ModbusError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for ModbusError {
    fn from(err: toml::ser::Error) -> Self {
        ModbusError::Config(format!("TOML serialize error: {}", err))
    }
}
