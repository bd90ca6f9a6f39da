//! # Luxtronik SDK
//!
//! Keeps a home-automation host's devices in step with a Luxtronik 2 heat
//! pump controller.
//!
//! ```rust,no_run
//! use device_store::DeviceStore;
//! use luxtronik_sdk::{Driver, DriverConfig};
//! use luxtronik_state::{CommandPayload, EntityId};
//!
//! let config = DriverConfig::from_pairs([("address", "192.168.1.50"), ("language", "1")])?;
//! let store = DeviceStore::new();
//!
//! let driver = Driver::start(&config, store.clone())?;
//!
//! // Raise the hot water target to 48.0 degrees
//! driver.handle().send_command(EntityId(7), CommandPayload::level(48.0))?;
//! # Ok::<(), luxtronik_sdk::SdkError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Driver (worker thread: ticks and commands)
//!     ↓
//! HeatPump (reconciliation engine)
//!     ↓                      ↓
//! luxtronik-state          DeviceSink (host registry)
//! (table, transforms)
//!     ↓
//! luxtronik-api (typed operations, retry)
//!     ↓
//! wire-client (register frames over TCP)
//! ```
//!
//! [`HeatPump`] can also be driven directly from a host's own scheduler.

pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod sink;

pub use config::{ConfigError, DriverConfig, MAX_POLL_INTERVAL};
pub use driver::{Driver, DriverHandle, DriverMessage};
pub use engine::{CycleReport, EnginePhase, GroupOutcome, HeatPump};
pub use error::{Result, SdkError};
pub use sink::DeviceSink;
