use serde::{Deserialize, Serialize};
use wire_client::ResponseShape;

/// The four request types understood by the controller
///
/// Each command has a fixed numeric code on the wire and a fixed response
/// layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Write a single parameter register
    WriteParameter,

    /// Read the full parameter (settings) block
    ReadParameters,

    /// Read the full calculated (measurement) block
    ReadCalculated,

    /// Read the visibility block
    ReadVisibility,
}

/// Wire-level description of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    /// Numeric code sent as the first word of the request
    pub code: i32,

    /// Layout of the response following the echoed code
    pub response: ResponseShape,
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::WriteParameter,
        Command::ReadParameters,
        Command::ReadCalculated,
        Command::ReadVisibility,
    ];

    /// Get the name of this command as a string
    pub fn name(&self) -> &'static str {
        match self {
            Command::WriteParameter => "WriteParameter",
            Command::ReadParameters => "ReadParameters",
            Command::ReadCalculated => "ReadCalculated",
            Command::ReadVisibility => "ReadVisibility",
        }
    }

    /// Get the wire code and response layout for this command
    pub fn info(&self) -> CommandInfo {
        match self {
            Command::WriteParameter => CommandInfo {
                code: 3002,
                response: ResponseShape::Echo,
            },
            Command::ReadParameters => CommandInfo {
                code: 3003,
                response: ResponseShape::Registers,
            },
            Command::ReadCalculated => CommandInfo {
                code: 3004,
                response: ResponseShape::StatusAndRegisters,
            },
            Command::ReadVisibility => CommandInfo {
                code: 3005,
                response: ResponseShape::Echo,
            },
        }
    }

    /// Look up a command by its wire code
    pub fn from_code(code: i32) -> Option<Command> {
        Command::ALL.into_iter().find(|c| c.info().code == code)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.info().code)
    }
}
