use log::{debug, trace};
use std::io;

use super::decoder::{self, DecodeOptions};
use super::protocol::{FunctionCode, ReadRequest, Register};
use super::transport::Transport;
use crate::utils::error::ModbusError;

/// Object-safe view of a register-reading master, for code that polls devices
/// without caring which transport sits underneath.
pub trait ModbusClientTrait {
    fn read_holding_registers(
        &mut self,
        slave_id: u8,
        start_addr: u16,
        count: u16,
    ) -> Result<Vec<Register>, ModbusError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Clear stale input before each request.
    pub flush_before_request: bool,
    /// Require the response to echo the request's address and function code.
    pub check_echo: bool,
    pub decode: DecodeOptions,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            flush_before_request: true,
            check_echo: false,
            decode: DecodeOptions::default(),
        }
    }
}

/// Modbus RTU master over a borrowed or owned [`Transport`].
///
/// Each call is one blocking exchange: at most one flush, exactly one write and
/// one read. The client is Idle between calls and AwaitingResponse only between
/// its write and the end of its read; nothing carries over from one call to the next.
/// `&mut self` keeps a single client from interleaving exchanges on its transport.
pub struct ModbusClient<T: Transport> {
    transport: T,
    options: ClientOptions,
}

impl<T: Transport> ModbusClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, ClientOptions::default())
    }

    pub fn with_options(transport: T, options: ClientOptions) -> Self {
        Self { transport, options }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn read_holding_registers(
        &mut self,
        slave_id: u8,
        start_addr: u16,
        count: u16,
    ) -> Result<Vec<Register>, ModbusError> {
        self.execute(&ReadRequest::new(slave_id, start_addr, count))
    }

    pub fn execute(&mut self, request: &ReadRequest) -> Result<Vec<Register>, ModbusError> {
        debug!(
            "📊 Reading {} registers from device {} starting at address {}",
            request.count, request.address, request.start
        );

        if self.options.flush_before_request {
            self.transport.flush().map_err(ModbusError::TransportFlush)?;
        }

        let frame = request.frame();
        trace!("📤 Sending frame: {}", hex::encode(frame));

        let written = self
            .transport
            .write(&frame)
            .map_err(ModbusError::TransportWrite)?;
        if written != frame.len() {
            return Err(ModbusError::TransportWrite(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("wrote {} of {} bytes", written, frame.len()),
            )));
        }

        let mut response = vec![0u8; request.response_len()];
        let read = self
            .transport
            .read(&mut response)
            .map_err(ModbusError::TransportRead)?;
        // Guard against transports reporting more than the buffer holds.
        let response = &response[..read.min(response.len())];
        trace!("📥 Received frame: {}", hex::encode(response));

        let registers = decoder::decode_with(response, request.count, self.options.decode)?;
        self.check_header(request, response)?;

        debug!(
            "✅ Device {} returned {} registers",
            request.address,
            registers.len()
        );
        Ok(registers)
    }

    /// Runs after decoding, so the header bytes are known to be present.
    fn check_header(&self, request: &ReadRequest, response: &[u8]) -> Result<(), ModbusError> {
        let (address, function) = (response[0], response[1]);

        if self.options.check_echo
            && (address != request.address
                || function != FunctionCode::ReadHoldingRegisters.code())
        {
            return Err(ModbusError::UnexpectedResponse { address, function });
        }

        Ok(())
    }
}

impl<T: Transport> ModbusClientTrait for ModbusClient<T> {
    fn read_holding_registers(
        &mut self,
        slave_id: u8,
        start_addr: u16,
        count: u16,
    ) -> Result<Vec<Register>, ModbusError> {
        ModbusClient::read_holding_registers(self, slave_id, start_addr, count)
    }
}
