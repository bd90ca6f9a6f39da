//! In-memory device registry
//!
//! A small stand-in for a home-automation host's device database: devices
//! are created, renamed and updated by the driver, and every actual change
//! to a watched device is published as a [`ChangeEvent`] that can be
//! consumed with a blocking [`ChangeIterator`].
//!
//! ```rust,ignore
//! let store = DeviceStore::new();
//! store.watch(EntityId(4));
//! let events = store.iter();
//!
//! store.create(EntityId(4), "Outside temp", metadata);
//! store.set_value(EntityId(4), &TypedValue::display("3.5"));
//!
//! for event in events.try_iter() {
//!     println!("{:?} {}", event.kind, event.device_id);
//! }
//! ```

mod event;
mod iter;
mod store;

pub use event::{ChangeEvent, ChangeKind};
pub use iter::{ChangeIterator, TryIter};
pub use store::{DeviceRecord, DeviceStore};
