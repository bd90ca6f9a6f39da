//! The device mapping table
//!
//! Declares every logical entity the driver exposes: which register it is
//! read from, how the raw value is converted, how the host presents it, and
//! how commands on it are written back. The table is built once for a
//! language and is immutable afterwards.

use crate::entity::{CommandGroup, DeviceKind, DisplayMetadata, EntityId, LogicalEntity};
use crate::localization::{label, Language, Localizer};
use crate::transform::{ModeLabels, ReadTransform, WriteTransform};
use crate::writable::{
    WritableValues, COOLING_ADDRESS, DHW_TARGET_ADDRESS, HEATING_MODE_ADDRESS, HOT_WATER_MODE_ADDRESS,
    TEMP_OFFSET_ADDRESS,
};

/// Calculated-block indices read by derived entities
pub mod register {
    /// Current operating mode code
    pub const OPERATING_STATE: usize = 80;
    /// Current heat output
    pub const HEAT_OUTPUT: usize = 257;
    /// Current electrical power input
    pub const POWER_INPUT: usize = 268;
}

/// Power input at or below which the heat pump counts as idle
const IDLE_POWER_THRESHOLD: f64 = 0.1;

/// Operating-mode codes attributed to heating and hot water
const HEATING_STATES: [i32; 1] = [0];
const HOT_WATER_STATES: [i32; 1] = [1];

/// Immutable set of logical entities plus the writable value sets
#[derive(Debug, Clone)]
pub struct DeviceTable {
    localizer: Localizer,
    entities: Vec<LogicalEntity>,
    writable: WritableValues,
}

impl DeviceTable {
    /// Build the table with names and text states in `language`
    pub fn build(language: Language) -> Self {
        let localizer = Localizer::new(language);
        let writable = WritableValues::standard(&localizer);
        let mut rows = TableBuilder::new(localizer);

        let allowed = |address: i32| {
            writable
                .get(address)
                .map(|set| set.allowed.clone())
                .unwrap_or_default()
        };
        let mode_labels = ModeLabels {
            heating: localizer.localize(label::HEATING_MODE),
            hot_water: localizer.localize(label::HOT_WATER_MODE),
            pool_pv: localizer.localize(label::POOL_PV_MODE),
            cooling: localizer.localize(label::COOLING),
            no_requirement: localizer.localize(label::NO_REQUIREMENT),
        };

        rows.temperature(10, true, label::HEAT_SUPPLY_TEMP);
        rows.temperature(11, true, label::HEAT_RETURN_TEMP);
        rows.temperature(12, true, label::RETURN_TEMP_TARGET);
        rows.temperature(15, true, label::OUTSIDE_TEMP);
        rows.temperature(16, false, label::OUTSIDE_TEMP_AVG);
        rows.temperature(17, true, label::DHW_TEMP);
        rows.setpoint(DHW_TARGET_ADDRESS, label::DHW_TEMP_TARGET);
        rows.temperature(19, true, label::SOURCE_IN_TEMP);
        rows.temperature(20, true, label::SOURCE_OUT_TEMP);
        rows.temperature(21, false, label::MC1_TEMP);
        rows.temperature(22, false, label::MC1_TEMP_TARGET);
        rows.temperature(24, false, label::MC2_TEMP);
        rows.temperature(25, false, label::MC2_TEMP_TARGET);
        rows.mode_selector(HEATING_MODE_ADDRESS, allowed(HEATING_MODE_ADDRESS), label::HEATING_MODE);
        rows.mode_selector(HOT_WATER_MODE_ADDRESS, allowed(HOT_WATER_MODE_ADDRESS), label::HOT_WATER_MODE);
        rows.push(
            CommandGroup::ReadParameters,
            COOLING_ADDRESS as usize,
            ReadTransform::ScaledInt { divider: 1.0 },
            DisplayMetadata::new(DeviceKind::Switch).image(9),
            label::COOLING,
            Some(WriteTransform::OnOffToInt),
        );
        rows.setpoint(TEMP_OFFSET_ADDRESS, label::TEMP_OFFSET);
        rows.push(
            CommandGroup::ReadCalculated,
            register::OPERATING_STATE,
            ReadTransform::TextState {
                power_index: register::POWER_INPUT,
                power_threshold: IDLE_POWER_THRESHOLD,
                labels: mode_labels,
            },
            DisplayMetadata::new(DeviceKind::Text).used(true),
            label::WORKING_MODE,
            None,
        );
        rows.custom(173, 1.0, "1;l/h", true, label::FLOW);
        rows.custom(231, 1.0, "1;Hz", false, label::COMPRESSOR_FREQ);
        rows.temperature(227, false, label::ROOM_TEMP);
        rows.temperature(228, false, label::ROOM_TEMP_TARGET);

        let power = DisplayMetadata::new(DeviceKind::Energy)
            .used(true)
            .option("EnergyMeterMode", "1");
        rows.meter(register::POWER_INPUT, None, power.clone(), label::POWER_TOTAL);
        rows.meter(register::POWER_INPUT, Some(&HEATING_STATES[..]), power.clone(), label::POWER_HEATING);
        rows.meter(register::POWER_INPUT, Some(&HOT_WATER_STATES[..]), power, label::POWER_DHW);

        let heat = DisplayMetadata::new(DeviceKind::Energy)
            .switch_type(4)
            .image(15)
            .used(true)
            .option("EnergyMeterMode", "1");
        rows.meter(register::HEAT_OUTPUT, None, heat.clone(), label::HEAT_OUT_TOTAL);
        rows.meter(register::HEAT_OUTPUT, Some(&HEATING_STATES[..]), heat.clone(), label::HEAT_OUT_HEATING);
        rows.meter(register::HEAT_OUTPUT, Some(&HOT_WATER_STATES[..]), heat, label::HEAT_OUT_DHW);

        rows.push(
            CommandGroup::ReadCalculated,
            register::HEAT_OUTPUT,
            ReadTransform::CopCalculator {
                heat_output_index: register::HEAT_OUTPUT,
                power_input_index: register::POWER_INPUT,
            },
            DisplayMetadata::new(DeviceKind::Custom)
                .used(true)
                .option("Custom", "1;COP"),
            label::COP_TOTAL,
            None,
        );

        Self {
            localizer,
            entities: rows.entities,
            writable,
        }
    }

    pub fn language(&self) -> Language {
        self.localizer.language()
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    /// All entities in id order
    pub fn entities(&self) -> &[LogicalEntity] {
        &self.entities
    }

    /// Entities read from `group`, in id order
    pub fn entities_in(&self, group: CommandGroup) -> impl Iterator<Item = &LogicalEntity> + '_ {
        self.entities.iter().filter(move |e| e.group == group)
    }

    pub fn get(&self, id: EntityId) -> Option<&LogicalEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// The entity with `id`, if commands can be written to it
    pub fn writable(&self, id: EntityId) -> Option<&LogicalEntity> {
        self.get(id).filter(|e| e.is_writable())
    }

    /// Highest register index any entity of `group` reads
    pub fn max_index(&self, group: CommandGroup) -> Option<usize> {
        self.entities_in(group).map(LogicalEntity::max_index).max()
    }

    pub fn writable_values(&self) -> &WritableValues {
        &self.writable
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Appends rows with sequential ids starting at 1
struct TableBuilder {
    localizer: Localizer,
    entities: Vec<LogicalEntity>,
}

impl TableBuilder {
    fn new(localizer: Localizer) -> Self {
        Self {
            localizer,
            entities: Vec::new(),
        }
    }

    fn push(
        &mut self,
        group: CommandGroup,
        register_index: usize,
        read: ReadTransform,
        metadata: DisplayMetadata,
        name: &'static str,
        write: Option<WriteTransform>,
    ) {
        let id = EntityId(self.entities.len() as u32 + 1);
        self.entities.push(LogicalEntity {
            id,
            group,
            register_index,
            read,
            metadata,
            name: self.localizer.localize(name),
            write,
        });
    }

    fn temperature(&mut self, index: usize, used: bool, name: &'static str) {
        self.push(
            CommandGroup::ReadCalculated,
            index,
            ReadTransform::ScaledFloat { divider: 10.0 },
            DisplayMetadata::new(DeviceKind::Temperature).used(used),
            name,
            None,
        );
    }

    /// Writable temperature parameter in tenths of a degree
    fn setpoint(&mut self, address: i32, name: &'static str) {
        self.push(
            CommandGroup::ReadParameters,
            address as usize,
            ReadTransform::ScaledFloat { divider: 10.0 },
            DisplayMetadata::new(DeviceKind::Setpoint),
            name,
            Some(WriteTransform::LevelWithDivider { divider: 0.1 }),
        );
    }

    fn mode_selector(&mut self, address: i32, allowed: Vec<i32>, name: &'static str) {
        let metadata = DisplayMetadata::new(DeviceKind::SelectorSwitch)
            .image(7)
            .used(true)
            .option("LevelActions", "|||||")
            .option("LevelNames", self.localizer.localize(label::MODE_LEVELS))
            .option("LevelOffHidden", "false")
            .option("SelectorStyle", "1");
        self.push(
            CommandGroup::ReadParameters,
            address as usize,
            ReadTransform::SelectorLevel { allowed },
            metadata,
            name,
            Some(WriteTransform::LevelFromAllowedSet { divider: 10.0, address }),
        );
    }

    fn custom(&mut self, index: usize, divider: f64, unit: &str, used: bool, name: &'static str) {
        self.push(
            CommandGroup::ReadCalculated,
            index,
            ReadTransform::ScaledFloat { divider },
            DisplayMetadata::new(DeviceKind::Custom).used(used).option("Custom", unit),
            name,
            None,
        );
    }

    /// Instantaneous meter, optionally attributed to a set of operating states
    fn meter(&mut self, index: usize, states: Option<&[i32]>, metadata: DisplayMetadata, name: &'static str) {
        let read = match states {
            Some(states) => ReadTransform::InstantPowerSplit {
                power_index: index,
                state_index: register::OPERATING_STATE,
                valid_states: states.to_vec(),
            },
            None => ReadTransform::InstantPower { power_index: index },
        };
        self.push(CommandGroup::ReadCalculated, index, read, metadata, name, None);
    }
}
