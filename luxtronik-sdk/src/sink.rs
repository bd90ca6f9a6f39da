//! The host side of the driver

use device_store::DeviceStore;
use luxtronik_state::{DisplayMetadata, EntityId, TypedValue};

/// Host device registry the engine publishes into
///
/// Methods are infallible from the engine's point of view: a host that
/// cannot apply an update logs it on its own side.
pub trait DeviceSink {
    fn device_exists(&self, id: EntityId) -> bool;

    fn create_device(&mut self, id: EntityId, name: &str, metadata: &DisplayMetadata);

    /// Store a new value, refreshing the presentation metadata
    fn upsert_device(&mut self, id: EntityId, value: &TypedValue, metadata: &DisplayMetadata);

    fn device_name(&self, id: EntityId) -> Option<String>;

    fn rename_device(&mut self, id: EntityId, name: &str);

    /// Refresh metadata without touching the host-owned `used` flag
    fn update_metadata(&mut self, id: EntityId, metadata: &DisplayMetadata);
}

impl DeviceSink for DeviceStore {
    fn device_exists(&self, id: EntityId) -> bool {
        self.contains(id)
    }

    fn create_device(&mut self, id: EntityId, name: &str, metadata: &DisplayMetadata) {
        self.create(id, name, metadata.clone());
    }

    fn upsert_device(&mut self, id: EntityId, value: &TypedValue, metadata: &DisplayMetadata) {
        DeviceStore::update_metadata(self, id, metadata);
        self.set_value(id, value);
    }

    fn device_name(&self, id: EntityId) -> Option<String> {
        self.name(id)
    }

    fn rename_device(&mut self, id: EntityId, name: &str) {
        self.rename(id, name);
    }

    fn update_metadata(&mut self, id: EntityId, metadata: &DisplayMetadata) {
        DeviceStore::update_metadata(self, id, metadata);
    }
}
