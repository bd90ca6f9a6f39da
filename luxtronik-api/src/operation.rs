use wire_client::{RegisterFrame, Request};

use crate::command::Command;
use crate::error::ApiError;

/// Base trait for all controller operations
///
/// Ties a typed request and response to one of the four wire commands. The
/// client uses `build_request` to produce the frame to send and
/// `parse_response` to turn the decoded frame into the typed response.
pub trait LuxOperation {
    /// The request type for this operation
    type Request;

    /// The response type for this operation
    type Response;

    /// The wire command this operation uses
    const COMMAND: Command;

    /// Build the request frame from the typed request data
    fn build_request(request: &Self::Request) -> Request;

    /// Convert the decoded response frame into the typed response
    fn parse_response(frame: RegisterFrame) -> Result<Self::Response, ApiError>;
}
