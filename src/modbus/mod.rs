pub mod client;
pub mod crc;
pub mod decoder;
pub mod frame;
pub mod protocol;
#[cfg(feature = "serial")]
pub mod serial;
pub mod transport;

pub use client::{ClientOptions, ModbusClient, ModbusClientTrait};
pub use crc::crc16_modbus;
pub use decoder::{decode, decode_with, DecodeOptions};
pub use frame::{build_read_request, response_len};
pub use protocol::{registers_to_f32, registers_to_u32, FunctionCode, ReadRequest, Register};
#[cfg(feature = "serial")]
pub use serial::SerialTransport;
pub use transport::Transport;
