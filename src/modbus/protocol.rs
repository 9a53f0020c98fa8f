use std::fmt;

use super::frame;
use crate::utils::error::ModbusError;

/// Highest assignable slave address; 0 is broadcast and 248-255 are reserved.
pub const MAX_SLAVE_ADDRESS: u8 = 247;
/// Largest register count a function 3 request may ask for.
pub const MAX_READ_REGISTERS: u16 = 125;

/// Bit set on the echoed function code when a slave answers with an exception.
const EXCEPTION_FLAG: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FunctionCode {
    ReadHoldingRegisters,
    /// Declared for completeness; no request builder or decoder exists for it yet.
    WriteMultipleRegisters,
}

impl FunctionCode {
    pub fn code(self) -> u8 {
        match self {
            FunctionCode::ReadHoldingRegisters => 0x03,
            FunctionCode::WriteMultipleRegisters => 0x10,
        }
    }

    /// Whether a raw function byte from a response flags a slave exception.
    pub fn is_exception(raw: u8) -> bool {
        raw & EXCEPTION_FLAG != 0
    }
}

impl TryFrom<u8> for FunctionCode {
    type Error = ModbusError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0x03 => Ok(FunctionCode::ReadHoldingRegisters),
            0x10 => Ok(FunctionCode::WriteMultipleRegisters),
            other => Err(ModbusError::UnknownFunctionCode(other)),
        }
    }
}

impl From<FunctionCode> for u8 {
    fn from(function: FunctionCode) -> Self {
        function.code()
    }
}

/// One holding register as transmitted: high byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Register(u16);

impl Register {
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    pub const fn to_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl From<u16> for Register {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<Register> for u16 {
    fn from(register: Register) -> Self {
        register.0
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Joins consecutive register pairs into 32-bit words, high word first.
/// A trailing unpaired register is ignored.
pub fn registers_to_u32(registers: &[Register]) -> Vec<u32> {
    registers
        .chunks_exact(2)
        .map(|pair| (u32::from(pair[0].value()) << 16) | u32::from(pair[1].value()))
        .collect()
}

/// IEEE-754 floats stored across two registers, as most meters expose them.
pub fn registers_to_f32(registers: &[Register]) -> Vec<f32> {
    registers_to_u32(registers)
        .into_iter()
        .map(f32::from_bits)
        .collect()
}

/// A single "read holding registers" exchange, fully determined by its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest {
    pub address: u8,
    pub start: u16,
    pub count: u16,
}

impl ReadRequest {
    pub fn new(address: u8, start: u16, count: u16) -> Self {
        Self { address, start, count }
    }

    pub fn frame(&self) -> [u8; frame::REQUEST_LEN] {
        frame::build_read_request(
            self.address,
            FunctionCode::ReadHoldingRegisters,
            self.start,
            self.count,
        )
    }

    pub fn response_len(&self) -> usize {
        frame::response_len(self.count)
    }

    /// Range checks from the Modbus application protocol. The client does not call this;
    /// it is offered to callers that want to reject bad requests before they hit the bus.
    pub fn validate(&self) -> Result<(), ModbusError> {
        if self.address == 0 || self.address > MAX_SLAVE_ADDRESS {
            return Err(ModbusError::InvalidRequest(format!(
                "slave address {} outside 1-{}",
                self.address, MAX_SLAVE_ADDRESS
            )));
        }
        if self.count == 0 || self.count > MAX_READ_REGISTERS {
            return Err(ModbusError::InvalidRequest(format!(
                "register count {} outside 1-{}",
                self.count, MAX_READ_REGISTERS
            )));
        }
        if u32::from(self.start) + u32::from(self.count) > 0x1_0000 {
            return Err(ModbusError::InvalidRequest(format!(
                "registers {}..{} run past 0xFFFF",
                self.start,
                u32::from(self.start) + u32::from(self.count)
            )));
        }
        Ok(())
    }
}
