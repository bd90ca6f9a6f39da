//! Typed API for the Luxtronik heat-pump controller
//!
//! This crate maps the controller's four wire commands onto typed
//! operations. It uses the private `wire-client` crate for the low-level
//! register exchange.
//!
//! ```rust,no_run
//! use luxtronik_api::LuxClient;
//!
//! let client = LuxClient::new("192.168.1.50", 8889);
//!
//! let calculated = client.read_calculated()?;
//! println!("supply temperature: {}", calculated.registers[10] as f64 / 10.0);
//!
//! // Raise the hot water target to 48.0 degrees
//! client.write_parameter(105, 480)?;
//! # Ok::<(), luxtronik_api::ApiError>(())
//! ```

pub mod client;
pub mod command;
pub mod error;
pub mod operation;
pub mod operations;

pub use client::LuxClient;
pub use command::{Command, CommandInfo};
pub use error::{ApiError, Result};
pub use operation::LuxOperation;
