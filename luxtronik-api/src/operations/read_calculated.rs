//! ReadCalculated operation (3004)

use serde::{Deserialize, Serialize};
use wire_client::{RegisterFrame, Request};

use super::ReadRequest;
use crate::{ApiError, Command, LuxOperation};

/// ReadCalculated operation
pub struct ReadCalculatedOperation;

/// Response for ReadCalculated: the measurement block and its status word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedValues {
    pub status: i32,
    pub registers: Vec<i32>,
}

impl LuxOperation for ReadCalculatedOperation {
    type Request = ReadRequest;
    type Response = CalculatedValues;

    const COMMAND: Command = Command::ReadCalculated;

    fn build_request(request: &Self::Request) -> Request {
        let info = Self::COMMAND.info();
        Request::read(info.code, request.address, info.response)
    }

    fn parse_response(frame: RegisterFrame) -> Result<Self::Response, ApiError> {
        let status = frame
            .status
            .ok_or_else(|| ApiError::InvalidFrame("calculated response without status word".to_string()))?;
        Ok(CalculatedValues {
            status,
            registers: frame.registers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(status: Option<i32>) -> RegisterFrame {
        RegisterFrame {
            command: 3004,
            address: 0,
            value: None,
            status,
            registers: vec![10, 20],
        }
    }

    #[test]
    fn test_parse_response() {
        let values = ReadCalculatedOperation::parse_response(frame(Some(0))).unwrap();
        assert_eq!(values.status, 0);
        assert_eq!(values.registers, vec![10, 20]);
    }

    #[test]
    fn test_missing_status_is_invalid() {
        let result = ReadCalculatedOperation::parse_response(frame(None));
        assert!(matches!(result, Err(ApiError::InvalidFrame(_))));
    }
}
