use crate::utils::error::ModbusError;

/// Length of the CRC trailer closing every RTU frame.
pub const CRC_LEN: usize = 2;

pub fn crc16_modbus(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    let poly: u16 = 0xA001;

    for &byte in data {
        crc ^= byte as u16;
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ poly;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// CRC trailer for `payload`, in wire order (low byte, high byte).
pub fn compute(payload: &[u8]) -> [u8; 2] {
    crc16_modbus(payload).to_le_bytes()
}

/// Checks the trailing two bytes of `frame` against the CRC of everything before them.
///
/// Frames too short to hold a trailer are a framing error, not an invalid checksum.
pub fn verify(frame: &[u8]) -> Result<bool, ModbusError> {
    let (payload, trailer) = split_trailer(frame)?;
    Ok(compute(payload) == trailer)
}

/// Like [`verify`], but reports the expected and received trailers on mismatch.
pub fn check(frame: &[u8]) -> Result<(), ModbusError> {
    let (payload, received) = split_trailer(frame)?;
    let expected = compute(payload);
    if expected != received {
        return Err(ModbusError::CrcMismatch { expected, received });
    }
    Ok(())
}

fn split_trailer(frame: &[u8]) -> Result<(&[u8], [u8; 2]), ModbusError> {
    if frame.len() < CRC_LEN {
        return Err(ModbusError::MalformedFrame { len: frame.len(), min: CRC_LEN });
    }
    let (payload, trailer) = frame.split_at(frame.len() - CRC_LEN);
    Ok((payload, [trailer[0], trailer[1]]))
}
