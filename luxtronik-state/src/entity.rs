//! Logical entities exposed to the host

use std::collections::BTreeMap;
use std::fmt;

use luxtronik_api::Command;
use serde::{Deserialize, Serialize};

use crate::transform::{ReadTransform, WriteTransform};

/// Stable host-facing device identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

/// Register block an entity is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CommandGroup {
    ReadParameters,
    ReadCalculated,
}

impl CommandGroup {
    /// Polling order for a full update cycle
    pub const CYCLE: [CommandGroup; 2] = [CommandGroup::ReadCalculated, CommandGroup::ReadParameters];

    pub fn command(&self) -> Command {
        match self {
            CommandGroup::ReadParameters => Command::ReadParameters,
            CommandGroup::ReadCalculated => Command::ReadCalculated,
        }
    }
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command().name())
    }
}

/// Kind of host device an entity is presented as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    Temperature,
    SelectorSwitch,
    Switch,
    Text,
    Custom,
    Energy,
    /// Setpoint thermostat, addressed by raw type and subtype codes
    Setpoint,
}

impl DeviceKind {
    /// Host type name, if the host identifies this kind by name
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            DeviceKind::Temperature => Some("Temperature"),
            DeviceKind::SelectorSwitch => Some("Selector Switch"),
            DeviceKind::Switch => Some("Switch"),
            DeviceKind::Text => Some("Text"),
            DeviceKind::Custom => Some("Custom"),
            DeviceKind::Energy => Some("kWh"),
            DeviceKind::Setpoint => None,
        }
    }

    /// Raw host `(type, subtype)` codes, for kinds without a type name
    pub fn type_code(&self) -> Option<(u8, u8)> {
        match self {
            DeviceKind::Setpoint => Some((242, 1)),
            _ => None,
        }
    }
}

/// How the host should present a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMetadata {
    pub kind: DeviceKind,
    pub image: Option<u32>,
    pub switch_type: Option<u32>,
    /// Initial visibility; owned by the host once the device exists
    pub used: bool,
    pub options: BTreeMap<String, String>,
}

impl DisplayMetadata {
    pub fn new(kind: DeviceKind) -> Self {
        Self {
            kind,
            image: None,
            switch_type: None,
            used: false,
            options: BTreeMap::new(),
        }
    }

    pub fn image(mut self, image: u32) -> Self {
        self.image = Some(image);
        self
    }

    pub fn switch_type(mut self, switch_type: u32) -> Self {
        self.switch_type = Some(switch_type);
        self
    }

    pub fn used(mut self, used: bool) -> Self {
        self.used = used;
        self
    }

    pub fn option(mut self, key: &str, value: impl Into<String>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }
}

/// One sensor or actuator, bound to a register of a command group
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalEntity {
    pub id: EntityId,
    pub group: CommandGroup,
    pub register_index: usize,
    pub read: ReadTransform,
    pub metadata: DisplayMetadata,
    /// Localized device name
    pub name: &'static str,
    pub write: Option<WriteTransform>,
}

impl LogicalEntity {
    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    /// Highest register index read when updating this entity
    pub fn max_index(&self) -> usize {
        self.read.max_index(self.register_index)
    }

    /// Register address written by commands on this entity
    pub fn write_address(&self) -> i32 {
        self.register_index as i32
    }
}
