//! ReadParameters operation (3003)

use serde::{Deserialize, Serialize};
use wire_client::{RegisterFrame, Request};

use super::ReadRequest;
use crate::{ApiError, Command, LuxOperation};

/// ReadParameters operation
pub struct ReadParametersOperation;

/// Response for ReadParameters: the full parameter block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterValues {
    pub registers: Vec<i32>,
}

impl LuxOperation for ReadParametersOperation {
    type Request = ReadRequest;
    type Response = ParameterValues;

    const COMMAND: Command = Command::ReadParameters;

    fn build_request(request: &Self::Request) -> Request {
        let info = Self::COMMAND.info();
        Request::read(info.code, request.address, info.response)
    }

    fn parse_response(frame: RegisterFrame) -> Result<Self::Response, ApiError> {
        Ok(ParameterValues {
            registers: frame.registers,
        })
    }
}
