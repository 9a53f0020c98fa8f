use super::crc;
use super::protocol::FunctionCode;

/// Every read request is address, function, start, count and CRC.
pub const REQUEST_LEN: usize = 8;

/// Address, function and byte-count header of a read response.
pub const RESPONSE_HEADER_LEN: usize = 3;

/// Header plus CRC trailer: the smallest response that can be indexed safely.
pub const MIN_RESPONSE_LEN: usize = RESPONSE_HEADER_LEN + crc::CRC_LEN;

/// Length of a complete response carrying `count` registers.
pub fn response_len(count: u16) -> usize {
    MIN_RESPONSE_LEN + 2 * count as usize
}

/// Builds the fixed-size request frame. Start and count go out big-endian,
/// the CRC trailer low byte first.
pub fn build_read_request(
    address: u8,
    function: FunctionCode,
    start: u16,
    count: u16,
) -> [u8; REQUEST_LEN] {
    let [start_hi, start_lo] = start.to_be_bytes();
    let [count_hi, count_lo] = count.to_be_bytes();

    let mut frame = [address, function.code(), start_hi, start_lo, count_hi, count_lo, 0, 0];
    let [crc_lo, crc_hi] = crc::compute(&frame[..REQUEST_LEN - crc::CRC_LEN]);
    frame[6] = crc_lo;
    frame[7] = crc_hi;
    frame
}
