use std::time::Duration;

use tracing::warn;
use wire_client::WireClient;

use crate::operations::{
    CalculatedValues, ParameterValues, ReadCalculatedOperation, ReadParametersOperation, ReadRequest,
    ReadVisibilityOperation, VisibilityAck, WriteAck, WriteParameterOperation, WriteParameterRequest,
};
use crate::{ApiError, LuxOperation, Result};

/// Number of additional attempts after a transport failure
const MAX_RETRIES: u32 = 1;

/// A client for executing operations against a controller
///
/// Bridges the typed operation definitions and the register client. Each
/// call is one logical operation: a fresh connection is opened for it and,
/// on a transport failure, one more fresh connection is tried before the
/// error is surfaced. Protocol failures are never retried.
#[derive(Debug, Clone)]
pub struct LuxClient {
    wire: WireClient,
}

impl LuxClient {
    /// Create a client for the controller at `host:port`
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            wire: WireClient::new(host, port),
        }
    }

    /// Create a client with a preconfigured register client
    pub fn with_wire_client(wire: WireClient) -> Self {
        Self { wire }
    }

    /// Bound connect, read and write operations of every exchange by `timeout`
    pub fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.wire = self.wire.with_io_timeout(timeout);
        self
    }

    pub fn wire_client(&self) -> &WireClient {
        &self.wire
    }

    /// Execute an operation against the controller
    ///
    /// # Example
    /// ```rust,no_run
    /// use luxtronik_api::LuxClient;
    /// use luxtronik_api::operations::{ReadCalculatedOperation, ReadRequest};
    ///
    /// let client = LuxClient::new("192.168.1.50", 8889);
    /// let values = client.execute::<ReadCalculatedOperation>(&ReadRequest::default())?;
    /// println!("{} registers", values.registers.len());
    /// # Ok::<(), luxtronik_api::ApiError>(())
    /// ```
    pub fn execute<Op: LuxOperation>(&self, request: &Op::Request) -> Result<Op::Response> {
        let frame_request = Op::build_request(request);

        let mut attempt = 0;
        loop {
            match self.wire.exchange(&frame_request) {
                Ok(frame) => return Op::parse_response(frame),
                Err(e) => {
                    let error = ApiError::from(e);
                    if error.is_retryable() && attempt < MAX_RETRIES {
                        attempt += 1;
                        warn!(command = %Op::COMMAND, error = %error, "exchange failed, reconnecting");
                        continue;
                    }
                    return Err(error);
                }
            }
        }
    }

    /// Read the full parameter block
    pub fn read_parameters(&self) -> Result<ParameterValues> {
        self.execute::<ReadParametersOperation>(&ReadRequest::default())
    }

    /// Read the full calculated block
    pub fn read_calculated(&self) -> Result<CalculatedValues> {
        self.execute::<ReadCalculatedOperation>(&ReadRequest::default())
    }

    /// Read the visibility block
    pub fn read_visibility(&self) -> Result<VisibilityAck> {
        self.execute::<ReadVisibilityOperation>(&())
    }

    /// Write a raw value to a parameter register
    pub fn write_parameter(&self, address: i32, value: i32) -> Result<WriteAck> {
        self.execute::<WriteParameterOperation>(&WriteParameterRequest { address, value })
    }
}
