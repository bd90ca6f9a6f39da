//! Conversions between raw register blocks and typed device values
//!
//! Read transforms turn a register block into the value reported to the
//! host; write transforms turn a host command into the raw value to send.
//! Both are closed sum types carrying their own arguments, and all of them
//! are pure.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransformError};
use crate::writable::WritableValues;

/// Value reported to the host for one device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedValue {
    pub numeric: Option<i32>,
    pub display: Option<String>,
}

impl TypedValue {
    pub fn numeric(value: i32) -> Self {
        Self {
            numeric: Some(value),
            display: None,
        }
    }

    pub fn display(value: impl Into<String>) -> Self {
        Self {
            numeric: None,
            display: Some(value.into()),
        }
    }

    pub fn both(numeric: i32, display: impl Into<String>) -> Self {
        Self {
            numeric: Some(numeric),
            display: Some(display.into()),
        }
    }
}

/// Localized labels for the operating-mode codes reported by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeLabels {
    pub heating: &'static str,
    pub hot_water: &'static str,
    pub pool_pv: &'static str,
    pub cooling: &'static str,
    pub no_requirement: &'static str,
}

impl ModeLabels {
    /// Label for a raw mode code; unknown codes read as "no requirement"
    pub fn for_code(&self, code: i32) -> &'static str {
        match code {
            0 => self.heating,
            1 => self.hot_water,
            2 => self.pool_pv,
            3 => self.cooling,
            _ => self.no_requirement,
        }
    }
}

/// How a register block becomes a device value
#[derive(Debug, Clone, PartialEq)]
pub enum ReadTransform {
    /// Display `raw / divider` as a float
    ScaledFloat { divider: f64 },

    /// Report `raw / divider`, truncated, as the numeric value
    ScaledInt { divider: f64 },

    /// Report the raw value's position in `allowed` as a selector level
    SelectorLevel { allowed: Vec<i32> },

    /// Instantaneous power in cumulative-meter format (`"<power>;0"`)
    InstantPower { power_index: usize },

    /// Instantaneous power attributed to an operating mode
    ///
    /// Reads as zero unless the register at `state_index` holds one of
    /// `valid_states`.
    InstantPowerSplit {
        power_index: usize,
        state_index: usize,
        valid_states: Vec<i32>,
    },

    /// Coefficient of performance: heat output over electrical input
    CopCalculator {
        heat_output_index: usize,
        power_input_index: usize,
    },

    /// Localized operating-mode text, forced to "no requirement" while the
    /// power draw at `power_index` is at or below `power_threshold`
    TextState {
        power_index: usize,
        power_threshold: f64,
        labels: ModeLabels,
    },
}

impl ReadTransform {
    /// Apply the transform to a register block
    ///
    /// `index` is the entity's own register index. Every register read is
    /// bounds-checked.
    pub fn apply(&self, registers: &[i32], index: usize) -> Result<TypedValue> {
        match self {
            ReadTransform::ScaledFloat { divider } => {
                let raw = register(registers, index)?;
                Ok(TypedValue::display(format_float(raw as f64 / divider)))
            }
            ReadTransform::ScaledInt { divider } => {
                let raw = register(registers, index)?;
                Ok(TypedValue::numeric((raw as f64 / divider).trunc() as i32))
            }
            ReadTransform::SelectorLevel { allowed } => {
                let raw = register(registers, index)?;
                let position = allowed
                    .iter()
                    .position(|v| *v == raw)
                    .ok_or(TransformError::ValueNotInDomain {
                        address: index as i32,
                        value: raw,
                    })?;
                let level = position as i32 * 10;
                Ok(TypedValue::both(level, level.to_string()))
            }
            ReadTransform::InstantPower { power_index } => {
                let power = register(registers, *power_index)?;
                Ok(TypedValue::display(meter_reading(power)))
            }
            ReadTransform::InstantPowerSplit {
                power_index,
                state_index,
                valid_states,
            } => {
                let power = register(registers, *power_index)?;
                let state = register(registers, *state_index)?;
                if valid_states.contains(&state) {
                    Ok(TypedValue::display(meter_reading(power)))
                } else {
                    Ok(TypedValue::display("0;0"))
                }
            }
            ReadTransform::CopCalculator {
                heat_output_index,
                power_input_index,
            } => {
                let heat_output = register(registers, *heat_output_index)? as f64;
                let power_input = register(registers, *power_input_index)? as f64;
                if power_input > 0.0 {
                    // Ties go to the even hundredth: 0.625 reads as 0.62
                    let cop = (heat_output / power_input * 100.0).round_ties_even() / 100.0;
                    Ok(TypedValue::display(format_float(cop)))
                } else {
                    Ok(TypedValue::display("0"))
                }
            }
            ReadTransform::TextState {
                power_index,
                power_threshold,
                labels,
            } => {
                let power = register(registers, *power_index)? as f64;
                let mode = register(registers, index)?;
                let text = if power <= *power_threshold {
                    labels.no_requirement
                } else {
                    labels.for_code(mode)
                };
                Ok(TypedValue::both(0, text))
            }
        }
    }

    /// Highest register index this transform reads for an entity at `index`
    pub fn max_index(&self, index: usize) -> usize {
        match self {
            ReadTransform::ScaledFloat { .. }
            | ReadTransform::ScaledInt { .. }
            | ReadTransform::SelectorLevel { .. } => index,
            ReadTransform::InstantPower { power_index } => *power_index,
            ReadTransform::InstantPowerSplit {
                power_index,
                state_index,
                ..
            } => (*power_index).max(*state_index),
            ReadTransform::CopCalculator {
                heat_output_index,
                power_input_index,
            } => (*heat_output_index).max(*power_input_index),
            ReadTransform::TextState { power_index, .. } => index.max(*power_index),
        }
    }
}

/// Switch command issued by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchCommand {
    On,
    Off,
    SetLevel,
    Other(String),
}

impl SwitchCommand {
    /// Parse the host's command string ("On", "Off", "Set Level", ...)
    pub fn parse(command: &str) -> Self {
        match command {
            "On" => SwitchCommand::On,
            "Off" => SwitchCommand::Off,
            "Set Level" => SwitchCommand::SetLevel,
            other => SwitchCommand::Other(other.to_string()),
        }
    }
}

/// A user command as delivered by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    pub command: Option<SwitchCommand>,
    pub level: Option<f64>,
}

impl CommandPayload {
    pub fn switch(command: SwitchCommand) -> Self {
        Self {
            command: Some(command),
            level: None,
        }
    }

    pub fn level(level: f64) -> Self {
        Self {
            command: Some(SwitchCommand::SetLevel),
            level: Some(level),
        }
    }
}

/// How a user command becomes the raw value to write
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WriteTransform {
    /// `On` writes 1, anything else writes 0
    OnOffToInt,

    /// Write `level / divider`, truncated
    LevelWithDivider { divider: f64 },

    /// Write the entry of the address's allowed set at position
    /// `level / divider`
    LevelFromAllowedSet { divider: f64, address: i32 },
}

impl WriteTransform {
    pub fn apply(&self, payload: &CommandPayload, writable: &WritableValues) -> Result<i32> {
        match self {
            WriteTransform::OnOffToInt => Ok(match payload.command {
                Some(SwitchCommand::On) => 1,
                _ => 0,
            }),
            WriteTransform::LevelWithDivider { divider } => {
                let level = payload.level.ok_or(TransformError::MissingPayload("level"))?;
                Ok(scale_level(level, *divider) as i32)
            }
            WriteTransform::LevelFromAllowedSet { divider, address } => {
                let level = payload.level.ok_or(TransformError::MissingPayload("level"))?;
                let set = writable
                    .get(*address)
                    .ok_or(TransformError::UnknownAddress(*address))?;
                let index = scale_level(level, *divider);
                usize::try_from(index)
                    .ok()
                    .and_then(|i| set.allowed.get(i))
                    .copied()
                    .ok_or(TransformError::IndexOutOfRange {
                        index,
                        len: set.allowed.len(),
                    })
            }
        }
    }
}

fn register(registers: &[i32], index: usize) -> Result<i32> {
    registers
        .get(index)
        .copied()
        .ok_or(TransformError::IndexOutOfRange {
            index: index as i64,
            len: registers.len(),
        })
}

/// `level / divider`, truncated toward zero
///
/// Quotients within rounding noise of an integer snap to it, so that a
/// setpoint of 0.3 with divider 0.1 writes 3 rather than 2.
fn scale_level(level: f64, divider: f64) -> i64 {
    let scaled = level / divider;
    let nearest = scaled.round();
    if (scaled - nearest).abs() < 1e-6 {
        nearest as i64
    } else {
        scaled.trunc() as i64
    }
}

/// Cumulative-meter reading with a fixed zero running total
fn meter_reading(power: i32) -> String {
    format!("{};0", format_float(power as f64))
}

/// Shortest round-trip representation, always with a fractional part
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}
