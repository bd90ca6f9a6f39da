//! ReadVisibility operation (3005)

use serde::{Deserialize, Serialize};
use wire_client::{RegisterFrame, Request};

use crate::{ApiError, Command, LuxOperation};

/// ReadVisibility operation
///
/// Part of the protocol surface; the reconciliation engine does not use it.
pub struct ReadVisibilityOperation;

/// Response for ReadVisibility: the bare echo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityAck;

impl LuxOperation for ReadVisibilityOperation {
    type Request = ();
    type Response = VisibilityAck;

    const COMMAND: Command = Command::ReadVisibility;

    fn build_request(_request: &Self::Request) -> Request {
        Request::bare(Self::COMMAND.info().code)
    }

    fn parse_response(_frame: RegisterFrame) -> Result<Self::Response, ApiError> {
        Ok(VisibilityAck)
    }
}
