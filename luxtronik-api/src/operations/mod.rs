//! Operations for the four controller commands

pub mod read_calculated;
pub mod read_parameters;
pub mod read_visibility;
pub mod write_parameter;

pub use read_calculated::{CalculatedValues, ReadCalculatedOperation};
pub use read_parameters::{ParameterValues, ReadParametersOperation};
pub use read_visibility::{ReadVisibilityOperation, VisibilityAck};
pub use write_parameter::{WriteAck, WriteParameterOperation, WriteParameterRequest};

use serde::{Deserialize, Serialize};

/// Request for a full block read
///
/// The controller ignores the address for full reads; it is sent as 0 by
/// convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRequest {
    pub address: i32,
}
