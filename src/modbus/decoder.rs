use log::warn;

use super::crc;
use super::frame::{MIN_RESPONSE_LEN, RESPONSE_HEADER_LEN};
use super::protocol::{FunctionCode, Register};
use crate::utils::error::ModbusError;

const BYTE_COUNT_OFFSET: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject responses whose byte-count field disagrees with the data actually present.
    pub strict_byte_count: bool,
}

/// Number of whole registers a response of `len` bytes carries.
pub fn register_count_in(len: usize) -> usize {
    len.saturating_sub(MIN_RESPONSE_LEN) / 2
}

/// Decodes a function 3 response with the default (lenient) options.
pub fn decode(response: &[u8], requested_count: u16) -> Result<Vec<Register>, ModbusError> {
    decode_with(response, requested_count, DecodeOptions::default())
}

/// Validates the CRC of `response` and extracts the registers it carries.
///
/// The register count comes from the frame length, so a short read yields fewer
/// registers than `requested_count` rather than an error.
pub fn decode_with(
    response: &[u8],
    requested_count: u16,
    options: DecodeOptions,
) -> Result<Vec<Register>, ModbusError> {
    if response.len() < MIN_RESPONSE_LEN {
        return Err(ModbusError::MalformedFrame {
            len: response.len(),
            min: MIN_RESPONSE_LEN,
        });
    }

    crc::check(response)?;

    // Exception replies are shorter than any data frame; report them before length checks.
    let (address, function) = (response[0], response[1]);
    if FunctionCode::is_exception(function) {
        warn!(
            "⚠️  Device {} answered with exception function 0x{:02x}",
            address, function
        );
        return Err(ModbusError::UnexpectedResponse { address, function });
    }

    let present = register_count_in(response.len());
    if options.strict_byte_count {
        let reported = response[BYTE_COUNT_OFFSET];
        if usize::from(reported) != present * 2 {
            return Err(ModbusError::ByteCountMismatch {
                reported,
                actual: present * 2,
            });
        }
    }

    if present < usize::from(requested_count) {
        warn!(
            "⚠️  Response holds {} of {} requested registers",
            present, requested_count
        );
    }

    let data = &response[RESPONSE_HEADER_LEN..RESPONSE_HEADER_LEN + present * 2];
    Ok(data
        .chunks_exact(2)
        .map(|pair| Register::from_bytes([pair[0], pair[1]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a well-formed response frame for `values`.
    fn response_for(address: u8, values: &[u16]) -> Vec<u8> {
        let mut frame = vec![address, 0x03, (values.len() * 2) as u8];
        for value in values {
            frame.extend_from_slice(&value.to_be_bytes());
        }
        let trailer = crc::compute(&frame);
        frame.extend_from_slice(&trailer);
        frame
    }

    #[test]
    fn test_decode_canonical_response() {
        let response = [0x11, 0x03, 0x06, 0xAE, 0x41, 0x56, 0x52, 0x43, 0x40, 0x49, 0xAD];
        assert!(crc::verify(&response).unwrap());

        let registers = decode(&response, 3).unwrap();
        let values: Vec<u16> = registers.iter().map(|r| r.value()).collect();
        assert_eq!(values, vec![0xAE41, 0x5652, 0x4340]);
    }

    #[test]
    fn test_trailer_mismatch_is_rejected() {
        // Same payload from slave 1: the 49 AD trailer no longer matches.
        let response = [0x01, 0x03, 0x06, 0xAE, 0x41, 0x56, 0x52, 0x43, 0x40, 0x49, 0xAD];
        match decode(&response, 3) {
            Err(ModbusError::CrcMismatch { expected, received }) => {
                assert_eq!(expected, [0x84, 0x6D]);
                assert_eq!(received, [0x49, 0xAD]);
            }
            other => panic!("expected CrcMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_frames_below_minimum_are_malformed() {
        for len in 0..MIN_RESPONSE_LEN {
            let response = vec![0x01; len];
            assert!(
                matches!(
                    decode(&response, 1),
                    Err(ModbusError::MalformedFrame { min: MIN_RESPONSE_LEN, .. })
                ),
                "length {} should be malformed",
                len
            );
        }
    }

    #[test]
    fn test_short_read_returns_registers_present() {
        // Slave answered with two registers where three were requested.
        let response = response_for(1, &[0x0102, 0x0304]);
        let registers = decode(&response, 3).unwrap();
        assert!(registers.len() < 3);
        assert_eq!(registers, vec![Register::new(0x0102), Register::new(0x0304)]);
    }

    #[test]
    fn test_odd_length_truncates() {
        // 6 bytes: header, one stray data byte, trailer.
        let mut response = vec![0x01, 0x03, 0x02, 0xAA];
        let trailer = crc::compute(&response);
        response.extend_from_slice(&trailer);
        assert_eq!(register_count_in(response.len()), 0);
        assert!(decode(&response, 1).unwrap().is_empty());
    }

    #[test]
    fn test_minimum_frame_decodes_empty() {
        let response = response_for(1, &[]);
        assert_eq!(response.len(), MIN_RESPONSE_LEN);
        assert!(decode(&response, 0).unwrap().is_empty());
    }

    #[test]
    fn test_byte_count_is_trusted_by_default() {
        let mut response = vec![0x01, 0x03, 0x7F, 0x00, 0x2A];
        let trailer = crc::compute(&response);
        response.extend_from_slice(&trailer);
        assert_eq!(decode(&response, 1).unwrap(), vec![Register::new(42)]);
    }

    #[test]
    fn test_exception_reply_precedes_byte_count_gate() {
        let mut response = vec![0x01, 0x83, 0x02];
        let trailer = crc::compute(&response);
        response.extend_from_slice(&trailer);

        for options in [DecodeOptions::default(), DecodeOptions { strict_byte_count: true }] {
            assert!(matches!(
                decode_with(&response, 1, options),
                Err(ModbusError::UnexpectedResponse { address: 1, function: 0x83 })
            ));
        }
    }

    #[test]
    fn test_strict_byte_count() {
        let strict = DecodeOptions { strict_byte_count: true };

        let good = response_for(1, &[7, 8]);
        assert_eq!(decode_with(&good, 2, strict).unwrap().len(), 2);

        let mut bad = vec![0x01, 0x03, 0x06, 0x00, 0x07, 0x00, 0x08];
        let trailer = crc::compute(&bad);
        bad.extend_from_slice(&trailer);
        match decode_with(&bad, 3, strict) {
            Err(ModbusError::ByteCountMismatch { reported, actual }) => {
                assert_eq!(reported, 6);
                assert_eq!(actual, 4);
            }
            other => panic!("expected ByteCountMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_round_trip_preserves_order() {
        for values in [
            vec![0u16],
            vec![0xFFFF, 0x0000, 0x8001],
            (0..125u16).map(|i| i.wrapping_mul(521)).collect::<Vec<_>>(),
        ] {
            let response = response_for(0x2A, &values);
            let decoded: Vec<u16> = decode(&response, values.len() as u16)
                .unwrap()
                .into_iter()
                .map(u16::from)
                .collect();
            assert_eq!(decoded, values);
        }
    }
}
