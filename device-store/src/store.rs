//! Device records and the shared device registry

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::trace;

use luxtronik_state::{DisplayMetadata, EntityId, TypedValue};

use crate::event::{ChangeEvent, ChangeKind};
use crate::iter::ChangeIterator;

/// Everything the registry knows about one device
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRecord {
    pub id: EntityId,
    pub name: String,
    pub metadata: DisplayMetadata,
    pub value: TypedValue,
    /// Time of the last value change, if the device ever received one
    pub last_update: Option<DateTime<Utc>>,
}

impl DeviceRecord {
    fn new(id: EntityId, name: String, metadata: DisplayMetadata) -> Self {
        Self {
            id,
            name,
            metadata,
            value: TypedValue::default(),
            last_update: None,
        }
    }

    /// Merge `value` into the stored value
    ///
    /// Fields absent from `value` keep their previous contents. Returns
    /// whether anything changed.
    fn merge_value(&mut self, value: &TypedValue) -> bool {
        let merged = TypedValue {
            numeric: value.numeric.or(self.value.numeric),
            display: value.display.clone().or_else(|| self.value.display.clone()),
        };
        if merged != self.value {
            self.value = merged;
            self.last_update = Some(Utc::now());
            true
        } else {
            false
        }
    }
}

/// In-memory device registry with change detection
///
/// Clones share the same devices, watch set and event channel. Events are
/// emitted only for actual changes to watched devices; a store nobody
/// watches queues nothing.
///
/// # Example
///
/// ```rust,ignore
/// let store = DeviceStore::new();
/// store.watch(EntityId(1));
/// store.create(EntityId(1), "Outside temp", DisplayMetadata::new(DeviceKind::Temperature));
/// store.set_value(EntityId(1), &TypedValue::display("4.5"));
///
/// for event in store.iter().try_iter() {
///     println!("{:?} on device {}", event.kind, event.device_id);
/// }
/// ```
pub struct DeviceStore {
    devices: Arc<RwLock<BTreeMap<EntityId, DeviceRecord>>>,
    watched: Arc<RwLock<HashSet<EntityId>>>,
    watch_all: Arc<AtomicBool>,
    event_tx: mpsc::Sender<ChangeEvent>,
    event_rx: Arc<Mutex<mpsc::Receiver<ChangeEvent>>>,
}

impl DeviceStore {
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::channel();

        Self {
            devices: Arc::new(RwLock::new(BTreeMap::new())),
            watched: Arc::new(RwLock::new(HashSet::new())),
            watch_all: Arc::new(AtomicBool::new(false)),
            event_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.devices.read().contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<DeviceRecord> {
        self.devices.read().get(&id).cloned()
    }

    pub fn name(&self, id: EntityId) -> Option<String> {
        self.devices.read().get(&id).map(|d| d.name.clone())
    }

    /// Create a device; returns false if one with `id` already exists
    pub fn create(&self, id: EntityId, name: impl Into<String>, metadata: DisplayMetadata) -> bool {
        {
            let mut devices = self.devices.write();
            if devices.contains_key(&id) {
                return false;
            }
            devices.insert(id, DeviceRecord::new(id, name.into(), metadata));
        }
        self.emit(id, ChangeKind::Created);
        true
    }

    /// Rename a device; returns whether the name changed
    pub fn rename(&self, id: EntityId, name: impl Into<String>) -> bool {
        let name = name.into();
        let changed = self.modify(id, |device| {
            if device.name == name {
                false
            } else {
                device.name = name;
                true
            }
        });
        if changed {
            self.emit(id, ChangeKind::Renamed);
        }
        changed
    }

    /// Replace a device's metadata, keeping its `used` flag
    pub fn update_metadata(&self, id: EntityId, metadata: &DisplayMetadata) -> bool {
        let changed = self.modify(id, |device| {
            let mut updated = metadata.clone();
            updated.used = device.metadata.used;
            if device.metadata == updated {
                false
            } else {
                device.metadata = updated;
                true
            }
        });
        if changed {
            self.emit(id, ChangeKind::MetadataUpdated);
        }
        changed
    }

    /// Toggle whether the device is shown, as a user would in the host UI
    pub fn set_used(&self, id: EntityId, used: bool) -> bool {
        let changed = self.modify(id, |device| {
            let changed = device.metadata.used != used;
            device.metadata.used = used;
            changed
        });
        if changed {
            self.emit(id, ChangeKind::MetadataUpdated);
        }
        changed
    }

    /// Store a new value; returns whether the stored value changed
    pub fn set_value(&self, id: EntityId, value: &TypedValue) -> bool {
        let changed = self.modify(id, |device| device.merge_value(value));
        if changed {
            self.emit(id, ChangeKind::ValueChanged);
        }
        changed
    }

    pub fn remove(&self, id: EntityId) -> bool {
        let removed = self.devices.write().remove(&id).is_some();
        if removed {
            self.emit(id, ChangeKind::Removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.devices.read().keys().copied().collect()
    }

    /// All device records, in id order
    pub fn snapshot(&self) -> Vec<DeviceRecord> {
        self.devices.read().values().cloned().collect()
    }

    /// Emit change events for `id`, including ones created later
    pub fn watch(&self, id: EntityId) {
        self.watched.write().insert(id);
    }

    pub fn unwatch(&self, id: EntityId) {
        self.watched.write().remove(&id);
    }

    /// Emit change events for every device, present and future
    pub fn watch_all(&self) {
        self.watch_all.store(true, Ordering::Relaxed);
    }

    /// Stop emitting events for devices not watched individually
    pub fn unwatch_all(&self) {
        self.watch_all.store(false, Ordering::Relaxed);
    }

    pub fn is_watched(&self, id: EntityId) -> bool {
        self.watch_all.load(Ordering::Relaxed) || self.watched.read().contains(&id)
    }

    /// Create a blocking iterator over change events
    ///
    /// Only watched devices produce events. Events stay queued until an
    /// iterator receives them.
    pub fn iter(&self) -> ChangeIterator {
        ChangeIterator::new(Arc::clone(&self.event_rx))
    }

    fn modify(&self, id: EntityId, f: impl FnOnce(&mut DeviceRecord) -> bool) -> bool {
        self.devices.write().get_mut(&id).map(f).unwrap_or(false)
    }

    fn emit(&self, id: EntityId, kind: ChangeKind) {
        trace!(device = %id, ?kind, "device changed");
        if self.is_watched(id) {
            let _ = self.event_tx.send(ChangeEvent::new(id, kind));
        }
    }
}

impl Default for DeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DeviceStore {
    fn clone(&self) -> Self {
        Self {
            devices: Arc::clone(&self.devices),
            watched: Arc::clone(&self.watched),
            watch_all: Arc::clone(&self.watch_all),
            event_tx: self.event_tx.clone(),
            event_rx: Arc::clone(&self.event_rx),
        }
    }
}

impl std::fmt::Debug for DeviceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStore")
            .field("device_count", &self.len())
            .finish()
    }
}
