//! WriteParameter operation (3002)

use serde::{Deserialize, Serialize};
use wire_client::{RegisterFrame, Request};

use crate::{ApiError, Command, LuxOperation};

/// WriteParameter operation
pub struct WriteParameterOperation;

/// Request for WriteParameter
///
/// The value is sent as-is; callers are responsible for checking it against
/// the permitted values for the address before building the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteParameterRequest {
    pub address: i32,
    pub value: i32,
}

/// Response for WriteParameter: the echo, plus what was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteAck {
    pub address: i32,
    pub value: i32,
}

impl LuxOperation for WriteParameterOperation {
    type Request = WriteParameterRequest;
    type Response = WriteAck;

    const COMMAND: Command = Command::WriteParameter;

    fn build_request(request: &Self::Request) -> Request {
        Request::write(Self::COMMAND.info().code, request.address, request.value)
    }

    fn parse_response(frame: RegisterFrame) -> Result<Self::Response, ApiError> {
        let value = frame
            .value
            .ok_or_else(|| ApiError::InvalidFrame("write response without value".to_string()))?;
        Ok(WriteAck {
            address: frame.address,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wire_client::ResponseShape;

    #[test]
    fn test_build_request() {
        let request = WriteParameterOperation::build_request(&WriteParameterRequest {
            address: 105,
            value: 320,
        });
        assert_eq!(request.command, 3002);
        assert_eq!(request.address, Some(105));
        assert_eq!(request.value, Some(320));
        assert_eq!(request.response, ResponseShape::Echo);
    }
}
