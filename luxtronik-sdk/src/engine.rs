//! Reconciliation between the controller's registers and host devices

use luxtronik_api::LuxClient;
use luxtronik_state::{CommandGroup, CommandPayload, DeviceTable, EntityId, Localizer, TypedValue};
use tracing::{debug, error, info, trace, warn};

use crate::config::DriverConfig;
use crate::error::{Result, SdkError};
use crate::sink::DeviceSink;

/// What the engine is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    /// A request to the controller is in flight
    Connecting,
    /// A response frame has arrived and is checked against the table
    Exchanging,
    /// Register values are being converted
    Decoding,
    /// Converted values are being handed to the sink
    Dispatching,
}

/// Outcome of one command group within an update cycle
#[derive(Debug)]
pub struct GroupOutcome {
    pub group: CommandGroup,
    /// Number of devices updated, or why the group was skipped
    pub result: Result<usize>,
}

/// Outcome of a full update cycle
#[derive(Debug, Default)]
pub struct CycleReport {
    pub groups: Vec<GroupOutcome>,
}

impl CycleReport {
    pub fn outcome(&self, group: CommandGroup) -> Option<&Result<usize>> {
        self.groups.iter().find(|o| o.group == group).map(|o| &o.result)
    }

    /// Total number of devices updated
    pub fn updated(&self) -> usize {
        self.groups
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .sum()
    }

    pub fn is_complete(&self) -> bool {
        self.groups.iter().all(|o| o.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (CommandGroup, &SdkError)> + '_ {
        self.groups
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.group, e)))
    }
}

/// Driver engine for one heat pump
///
/// Owns the controller client, the device table and the host sink. All
/// operations take `&mut self` and run to completion on the calling thread.
pub struct HeatPump<S: DeviceSink> {
    client: LuxClient,
    table: DeviceTable,
    sink: S,
    hardware_name: String,
    phase: EnginePhase,
}

impl<S: DeviceSink> HeatPump<S> {
    pub fn new(client: LuxClient, table: DeviceTable, sink: S) -> Self {
        Self {
            client,
            table,
            sink,
            hardware_name: "Luxtronik".to_string(),
            phase: EnginePhase::Idle,
        }
    }

    /// Build an engine for a validated configuration
    pub fn from_config(config: &DriverConfig, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.client(), DeviceTable::build(config.language()), sink).with_hardware_name(&config.name))
    }

    /// Set the hardware name prefixed to every device name
    pub fn with_hardware_name(mut self, name: impl Into<String>) -> Self {
        self.hardware_name = name.into();
        self
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn table(&self) -> &DeviceTable {
        &self.table
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Full host-side name for an entity
    pub fn device_name(&self, id: EntityId) -> Option<String> {
        self.table.get(id).map(|e| qualified_name(&self.hardware_name, e.name))
    }

    /// Make sure every entity has a host device with current metadata
    ///
    /// Missing devices are created. Existing devices get fresh metadata but
    /// keep their `used` flag. An existing device is renamed only while its
    /// name is one this driver assigned, in any language; names chosen by
    /// the user are left alone. Returns the number of devices created.
    pub fn register_devices(&mut self) -> usize {
        let mut created = 0;

        for entity in self.table.entities() {
            let name = qualified_name(&self.hardware_name, entity.name);

            if !self.sink.device_exists(entity.id) {
                debug!(device = %entity.id, name = %name, "creating device");
                self.sink.create_device(entity.id, &name, &entity.metadata);
                created += 1;
                continue;
            }

            self.sink.update_metadata(entity.id, &entity.metadata);

            if let Some(current) = self.sink.device_name(entity.id) {
                if current != name && is_assigned_name(&self.hardware_name, &current) {
                    info!(device = %entity.id, from = %current, to = %name, "renaming device");
                    self.sink.rename_device(entity.id, &name);
                }
            }
        }

        created
    }

    /// Fetch one command group and publish every entity it feeds
    ///
    /// Values are computed for the whole group before any is dispatched. A
    /// failed fetch or a frame too short for the table dispatches nothing;
    /// an entity whose transform fails is skipped on its own. Returns the
    /// number of devices updated.
    pub fn update(&mut self, group: CommandGroup) -> Result<usize> {
        let result = self.fetch_and_dispatch(group);
        self.transition(EnginePhase::Idle);
        result
    }

    /// Update calculated values, then parameters
    ///
    /// The two groups are independent: a failure in one never prevents the
    /// other.
    pub fn update_all(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        for group in CommandGroup::CYCLE {
            let result = self.update(group);
            if let Err(e) = &result {
                error!(group = %group, error = %e, "update failed");
            }
            report.groups.push(GroupOutcome { group, result });
        }

        report
    }

    /// Apply a user command to a writable entity
    ///
    /// The value is converted and checked against the register's writable
    /// set before anything is sent. After a successful write the parameter
    /// block is read back; a failed read-back is logged and does not fail
    /// the command. Returns the raw value written.
    pub fn handle_command(&mut self, id: EntityId, payload: &CommandPayload) -> Result<i32> {
        let entity = self.table.get(id).ok_or(SdkError::UnknownEntity(id))?;
        let write = entity.write.ok_or(SdkError::NotWritable(id))?;
        let address = entity.write_address();

        let value = write.apply(payload, self.table.writable_values())?;
        self.table.writable_values().validate(address, value)?;

        info!(device = %id, address, value, "writing parameter");
        self.transition(EnginePhase::Connecting);
        let written = self.client.write_parameter(address, value);
        self.transition(EnginePhase::Idle);
        written?;

        if let Err(e) = self.update(CommandGroup::ReadParameters) {
            warn!(device = %id, error = %e, "read-back after write failed");
        }

        Ok(value)
    }

    fn fetch_and_dispatch(&mut self, group: CommandGroup) -> Result<usize> {
        self.transition(EnginePhase::Connecting);
        let registers = match group {
            CommandGroup::ReadParameters => self.client.read_parameters()?.registers,
            CommandGroup::ReadCalculated => self.client.read_calculated()?.registers,
        };

        self.transition(EnginePhase::Exchanging);
        if let Some(max_index) = self.table.max_index(group) {
            if registers.len() <= max_index {
                return Err(SdkError::FrameTooShort {
                    group,
                    len: registers.len(),
                    required: max_index + 1,
                });
            }
        }

        self.transition(EnginePhase::Decoding);
        let mut values: Vec<(EntityId, TypedValue)> = Vec::new();
        for entity in self.table.entities_in(group) {
            match entity.read.apply(&registers, entity.register_index) {
                Ok(value) => values.push((entity.id, value)),
                Err(e) => warn!(device = %entity.id, name = entity.name, error = %e, "skipping device"),
            }
        }

        self.transition(EnginePhase::Dispatching);
        for (id, value) in &values {
            let Some(entity) = self.table.get(*id) else {
                continue;
            };
            if !self.sink.device_exists(*id) {
                warn!(device = %id, "device missing, re-creating");
                let name = qualified_name(&self.hardware_name, entity.name);
                self.sink.create_device(*id, &name, &entity.metadata);
            }
            trace!(device = %id, ?value, "dispatching");
            self.sink.upsert_device(*id, value, &entity.metadata);
        }

        debug!(group = %group, updated = values.len(), "group updated");
        Ok(values.len())
    }

    fn transition(&mut self, phase: EnginePhase) {
        if self.phase != phase {
            trace!(from = ?self.phase, to = ?phase, "engine phase");
            self.phase = phase;
        }
    }
}

fn qualified_name(hardware_name: &str, label: &str) -> String {
    format!("{} - {}", hardware_name, label)
}

/// Whether `name` is a device name this driver would have assigned
fn is_assigned_name(hardware_name: &str, name: &str) -> bool {
    let prefix = format!("{} - ", hardware_name);
    let label = name.strip_prefix(prefix.as_str()).unwrap_or(name);
    Localizer::is_known_label(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Luxtronik - Heat supply temp", true)]
    #[case("Luxtronik - Temp zasilania", true)]
    #[case("Luxtronik - Kitchen floor", false)]
    #[case("Heat supply temp", true)]
    #[case("Other - Heat supply temp", false)]
    fn test_is_assigned_name(#[case] name: &str, #[case] assigned: bool) {
        assert_eq!(is_assigned_name("Luxtronik", name), assigned);
    }

    #[test]
    fn test_cycle_report() {
        let report = CycleReport {
            groups: vec![
                GroupOutcome {
                    group: CommandGroup::ReadCalculated,
                    result: Err(SdkError::DriverStopped),
                },
                GroupOutcome {
                    group: CommandGroup::ReadParameters,
                    result: Ok(5),
                },
            ],
        };

        assert!(!report.is_complete());
        assert_eq!(report.updated(), 5);
        assert_eq!(report.failures().count(), 1);
        assert!(matches!(report.outcome(CommandGroup::ReadParameters), Some(Ok(5))));
    }
}
