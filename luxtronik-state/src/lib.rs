//! Register mapping for Luxtronik heat pumps
//!
//! This crate holds everything that turns the controller's raw register
//! blocks into host devices and back:
//!
//! - [`DeviceTable`]: the declarative list of logical entities
//! - [`ReadTransform`] / [`WriteTransform`]: pure value conversions
//! - [`WritableValues`]: the raw values each writable register accepts
//! - [`Localizer`]: device names in English, Polish or Dutch
//!
//! It performs no I/O.

pub mod entity;
pub mod error;
pub mod localization;
pub mod logging;
pub mod table;
pub mod transform;
pub mod writable;

pub use entity::{CommandGroup, DeviceKind, DisplayMetadata, EntityId, LogicalEntity};
pub use error::{Result, TransformError};
pub use localization::{localize, Language, Localizer};
pub use table::DeviceTable;
pub use transform::{CommandPayload, ModeLabels, ReadTransform, SwitchCommand, TypedValue, WriteTransform};
pub use writable::{WritableValueSet, WritableValues};
