use log::{error, info, trace};
use serialport::{ClearBuffer, SerialPort};
use std::io::{self, Read, Write};
use std::time::Duration;

use super::transport::Transport;
use crate::config::settings::{LinkConfig, ParityConfig};
use crate::utils::error::ModbusError;

/// [`Transport`] over an OS serial port (RS-232 / RS-485 adapter).
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    pub fn open(config: &LinkConfig) -> Result<Self, ModbusError> {
        info!("🔌 Connecting to Modbus RTU port: {}", config.serial_port);
        info!(
            "⚙️  Configuration: {} baud, {} data bits, {:?} parity, {} stop bit(s)",
            config.baud_rate, config.data_bits, config.parity, config.stop_bits
        );

        let data_bits = match config.data_bits {
            5 => serialport::DataBits::Five,
            6 => serialport::DataBits::Six,
            7 => serialport::DataBits::Seven,
            8 => serialport::DataBits::Eight,
            other => return Err(ModbusError::Config(format!("Unsupported data bits: {}", other))),
        };
        let stop_bits = match config.stop_bits {
            1 => serialport::StopBits::One,
            2 => serialport::StopBits::Two,
            other => return Err(ModbusError::Config(format!("Unsupported stop bits: {}", other))),
        };
        let parity = match config.parity {
            ParityConfig::None => serialport::Parity::None,
            ParityConfig::Even => serialport::Parity::Even,
            ParityConfig::Odd => serialport::Parity::Odd,
        };

        let port = serialport::new(config.serial_port.as_str(), config.baud_rate)
            .timeout(Duration::from_millis(config.timeout_ms))
            .data_bits(data_bits)
            .stop_bits(stop_bits)
            .parity(parity)
            .open()
            .map_err(|e| {
                error!("❌ Failed to open serial port {}: {}", config.serial_port, e);
                ModbusError::Connection(format!("Failed to open port {}: {}", config.serial_port, e))
            })?;

        info!("✅ Modbus RTU connection established successfully");
        Ok(Self { port })
    }

    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }

    pub fn into_inner(self) -> Box<dyn SerialPort> {
        self.port
    }
}

impl Transport for SerialTransport {
    /// Keeps reading until `buf` is full or the port's timeout expires.
    ///
    /// A timeout after at least one byte ends the frame and reports what arrived;
    /// a timeout with nothing read is returned as the error.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match Read::read(&mut self.port, &mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::TimedOut && filled > 0 => {
                    trace!("Read timed out after {} of {} bytes", filled, buf.len());
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = Write::write(&mut self.port, buf)?;
        Write::flush(&mut self.port)?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        trace!("Clearing serial input buffer");
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }
}
