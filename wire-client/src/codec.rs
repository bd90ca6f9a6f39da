//! Frame encoding and decoding for the register protocol
//!
//! Every integer on the wire is a 4-byte big-endian signed integer. A request
//! is the command code followed by an optional address and an optional value;
//! the response always starts with the echoed command code, followed by a
//! trailer whose layout depends on the command (see [`ResponseShape`]).

use std::io::Read;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::WireError;

/// Upper bound on the register count accepted from a response header
pub const MAX_REGISTERS: i32 = 65_536;

/// Layout of the response trailer following the echoed command code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Only the echoed command code
    Echo,
    /// `length` followed by `length` registers
    Registers,
    /// `status`, then `length`, then `length` registers
    StatusAndRegisters,
}

/// A single request frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: i32,
    pub address: Option<i32>,
    pub value: Option<i32>,
    pub response: ResponseShape,
}

impl Request {
    /// Request carrying an address and a value, answered by a bare echo
    pub fn write(command: i32, address: i32, value: i32) -> Self {
        Self {
            command,
            address: Some(address),
            value: Some(value),
            response: ResponseShape::Echo,
        }
    }

    /// Request carrying only an address, answered with a register block
    pub fn read(command: i32, address: i32, response: ResponseShape) -> Self {
        Self {
            command,
            address: Some(address),
            value: None,
            response,
        }
    }

    /// Request consisting of the command code alone
    pub fn bare(command: i32) -> Self {
        Self {
            command,
            address: None,
            value: None,
            response: ResponseShape::Echo,
        }
    }
}

/// Decoded response frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFrame {
    pub command: i32,
    pub address: i32,
    pub value: Option<i32>,
    pub status: Option<i32>,
    pub registers: Vec<i32>,
}

impl RegisterFrame {
    /// Number of registers carried by this frame
    pub fn length(&self) -> usize {
        self.registers.len()
    }
}

/// Encode a request into its wire representation
pub fn encode_request(request: &Request) -> Bytes {
    let mut buf = BytesMut::with_capacity(12);
    buf.put_i32(request.command);
    if let Some(address) = request.address {
        buf.put_i32(address);
    }
    if let Some(value) = request.value {
        buf.put_i32(value);
    }
    buf.freeze()
}

/// Read and decode the response to `request` from `reader`
///
/// Consumes exactly the bytes belonging to the response frame.
pub fn decode_response<R: Read>(request: &Request, mut reader: R) -> Result<RegisterFrame, WireError> {
    let echoed = read_i32(&mut reader)?;
    if echoed != request.command {
        return Err(WireError::ProtocolMismatch {
            expected: request.command,
            received: echoed,
        });
    }

    let (status, length) = match request.response {
        ResponseShape::Echo => (None, 0),
        ResponseShape::Registers => (None, read_i32(&mut reader)?),
        ResponseShape::StatusAndRegisters => {
            let status = read_i32(&mut reader)?;
            (Some(status), read_i32(&mut reader)?)
        }
    };

    if !(0..=MAX_REGISTERS).contains(&length) {
        return Err(WireError::InvalidLength(length));
    }

    let mut raw = vec![0u8; length as usize * 4];
    reader.read_exact(&mut raw)?;
    let mut payload = Bytes::from(raw);
    let mut registers = Vec::with_capacity(length as usize);
    while payload.has_remaining() {
        registers.push(payload.get_i32());
    }

    Ok(RegisterFrame {
        command: echoed,
        address: request.address.unwrap_or(0),
        value: request.value,
        status,
        registers,
    })
}

fn read_i32<R: Read>(reader: &mut R) -> Result<i32, WireError> {
    let mut word = [0u8; 4];
    reader.read_exact(&mut word)?;
    Ok(i32::from_be_bytes(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    fn words(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn test_encode_write_request() {
        let encoded = encode_request(&Request::write(3002, 105, 320));
        assert_eq!(encoded.as_ref(), words(&[3002, 105, 320]).as_slice());
    }

    #[rstest]
    #[case(Request::read(3003, 0, ResponseShape::Registers), vec![3003, 0])]
    #[case(Request::read(3004, 0, ResponseShape::StatusAndRegisters), vec![3004, 0])]
    #[case(Request::bare(3005), vec![3005])]
    fn test_encode_read_requests(#[case] request: Request, #[case] expected: Vec<i32>) {
        assert_eq!(encode_request(&request).as_ref(), words(&expected).as_slice());
    }

    #[test]
    fn test_negative_values_are_big_endian_twos_complement() {
        let encoded = encode_request(&Request::write(3002, 1, -50));
        assert_eq!(&encoded[8..12], &[0xFF, 0xFF, 0xFF, 0xCE]);
    }

    #[test]
    fn test_write_echo_consumes_exact_frame() {
        let request = Request::write(3002, 105, 320);
        let mut cursor = Cursor::new(words(&[3002]));

        let frame = decode_response(&request, &mut cursor).unwrap();

        assert_eq!(frame.command, 3002);
        assert_eq!(frame.address, 105);
        assert_eq!(frame.value, Some(320));
        assert_eq!(frame.length(), 0);
        assert_eq!(cursor.position() as usize, cursor.get_ref().len());
    }

    #[test]
    fn test_decode_parameters() {
        let request = Request::read(3003, 0, ResponseShape::Registers);
        let frame = decode_response(&request, Cursor::new(words(&[3003, 3, 7, -8, 9]))).unwrap();

        assert_eq!(frame.status, None);
        assert_eq!(frame.registers, vec![7, -8, 9]);
    }

    #[test]
    fn test_decode_calculated_carries_status() {
        let request = Request::read(3004, 0, ResponseShape::StatusAndRegisters);
        let frame = decode_response(&request, Cursor::new(words(&[3004, 1, 2, 10, 11]))).unwrap();

        assert_eq!(frame.status, Some(1));
        assert_eq!(frame.registers, vec![10, 11]);
    }

    #[test]
    fn test_decode_rejects_wrong_echo() {
        let request = Request::read(3004, 0, ResponseShape::StatusAndRegisters);
        let result = decode_response(&request, Cursor::new(words(&[3003, 0, 0])));

        match result.unwrap_err() {
            WireError::ProtocolMismatch { expected, received } => {
                assert_eq!(expected, 3004);
                assert_eq!(received, 3003);
            }
            other => panic!("Expected ProtocolMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_truncated_frame_is_connection_error() {
        let request = Request::read(3003, 0, ResponseShape::Registers);
        let result = decode_response(&request, Cursor::new(words(&[3003, 4, 1, 2])));

        assert!(matches!(result, Err(WireError::Connection(_))));
    }

    #[rstest]
    #[case(-1)]
    #[case(MAX_REGISTERS + 1)]
    fn test_decode_rejects_invalid_length(#[case] length: i32) {
        let request = Request::read(3003, 0, ResponseShape::Registers);
        let result = decode_response(&request, Cursor::new(words(&[3003, length])));

        assert!(matches!(result, Err(WireError::InvalidLength(l)) if l == length));
    }
}
