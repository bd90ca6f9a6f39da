//! Permitted raw values for writable parameter registers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransformError};
use crate::localization::{label, Localizer};

/// Ordered set of raw values a register may be written with
///
/// The order is significant: selector-style entities encode the position in
/// this sequence as their UI level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritableValueSet {
    pub display_name: String,
    pub allowed: Vec<i32>,
}

impl WritableValueSet {
    pub fn new(display_name: impl Into<String>, allowed: Vec<i32>) -> Self {
        Self {
            display_name: display_name.into(),
            allowed,
        }
    }

    pub fn contains(&self, value: i32) -> bool {
        self.allowed.contains(&value)
    }
}

/// Writable value sets keyed by register address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WritableValues {
    sets: BTreeMap<i32, WritableValueSet>,
}

/// Hot water target, 30.0 to 65.0 in steps of 0.5
pub const DHW_TARGET_ADDRESS: i32 = 105;
/// Heating curve offset, -5.0 to +5.0 in steps of 0.5
pub const TEMP_OFFSET_ADDRESS: i32 = 1;
pub const HEATING_MODE_ADDRESS: i32 = 3;
pub const HOT_WATER_MODE_ADDRESS: i32 = 4;
pub const COOLING_ADDRESS: i32 = 108;

impl WritableValues {
    /// Build the value sets for every writable register of the controller
    pub fn standard(localizer: &Localizer) -> Self {
        let mut values = Self::default();
        values.insert(
            TEMP_OFFSET_ADDRESS,
            WritableValueSet::new(localizer.localize(label::TEMP_OFFSET), (-50..=50).step_by(5).collect()),
        );
        values.insert(
            HEATING_MODE_ADDRESS,
            WritableValueSet::new(localizer.localize(label::HEATING_MODE), (0..=4).collect()),
        );
        values.insert(
            HOT_WATER_MODE_ADDRESS,
            WritableValueSet::new(localizer.localize(label::HOT_WATER_MODE), (0..=4).collect()),
        );
        values.insert(
            DHW_TARGET_ADDRESS,
            WritableValueSet::new(localizer.localize(label::DHW_TEMP_TARGET), (300..=650).step_by(5).collect()),
        );
        values.insert(
            COOLING_ADDRESS,
            WritableValueSet::new(localizer.localize(label::COOLING), vec![0, 1]),
        );
        values
    }

    pub fn insert(&mut self, address: i32, set: WritableValueSet) {
        self.sets.insert(address, set);
    }

    pub fn get(&self, address: i32) -> Option<&WritableValueSet> {
        self.sets.get(&address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = i32> + '_ {
        self.sets.keys().copied()
    }

    /// Check that `value` may be written to `address`
    pub fn validate(&self, address: i32, value: i32) -> Result<()> {
        let set = self.get(address).ok_or(TransformError::UnknownAddress(address))?;
        if set.contains(value) {
            Ok(())
        } else {
            Err(TransformError::ValueNotInDomain { address, value })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn standard() -> WritableValues {
        WritableValues::standard(&Localizer::default())
    }

    #[test]
    fn test_standard_ranges() {
        let values = standard();

        let offset = values.get(TEMP_OFFSET_ADDRESS).unwrap();
        assert_eq!(offset.allowed.len(), 21);
        assert_eq!(offset.allowed.first(), Some(&-50));
        assert_eq!(offset.allowed.last(), Some(&50));

        let dhw = values.get(DHW_TARGET_ADDRESS).unwrap();
        assert_eq!(dhw.allowed.len(), 71);
        assert_eq!(dhw.display_name, "DHW temp target");

        assert_eq!(values.addresses().collect::<Vec<_>>(), vec![1, 3, 4, 105, 108]);
    }

    #[rstest]
    #[case(105, 320, true)]
    #[case(105, 321, false)]
    #[case(105, 655, false)]
    #[case(1, -25, true)]
    #[case(108, 2, false)]
    #[case(3, 4, true)]
    fn test_validate(#[case] address: i32, #[case] value: i32, #[case] permitted: bool) {
        let result = standard().validate(address, value);
        if permitted {
            assert!(result.is_ok());
        } else {
            assert_eq!(result, Err(TransformError::ValueNotInDomain { address, value }));
        }
    }

    #[test]
    fn test_validate_unknown_address() {
        assert_eq!(standard().validate(7, 0), Err(TransformError::UnknownAddress(7)));
    }
}
