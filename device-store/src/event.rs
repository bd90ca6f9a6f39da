//! Change events for device updates
//!
//! Events carry only the device id and what kind of change happened. Use
//! `DeviceStore::get()` to read the current record after receiving one.

use std::time::Instant;

use luxtronik_state::EntityId;

/// What changed on a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Renamed,
    MetadataUpdated,
    ValueChanged,
    Removed,
}

/// A change event emitted when a device record actually changes
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub device_id: EntityId,
    pub kind: ChangeKind,
    pub timestamp: Instant,
}

impl ChangeEvent {
    pub fn new(device_id: EntityId, kind: ChangeKind) -> Self {
        Self {
            device_id,
            kind,
            timestamp: Instant::now(),
        }
    }
}

impl PartialEq for ChangeEvent {
    fn eq(&self, other: &Self) -> bool {
        // Timestamp not included in equality
        self.device_id == other.device_id && self.kind == other.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_event_equality_ignores_timestamp() {
        let first = ChangeEvent::new(EntityId(3), ChangeKind::ValueChanged);
        std::thread::sleep(std::time::Duration::from_millis(1));
        let second = ChangeEvent::new(EntityId(3), ChangeKind::ValueChanged);

        assert_eq!(first, second);
        assert_ne!(first, ChangeEvent::new(EntityId(4), ChangeKind::ValueChanged));
        assert_ne!(first, ChangeEvent::new(EntityId(3), ChangeKind::Renamed));
    }
}
