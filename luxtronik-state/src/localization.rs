//! Localized device labels
//!
//! Labels are keyed by their canonical English text. Each canonical label has
//! one translation per non-source language, in [`Language`] order. Lookups are
//! resolved once when the device table is built.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Display language for device names and text states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Source language; canonical labels are used as-is
    #[default]
    English,
    Polish,
    Dutch,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Polish, Language::Dutch];

    /// Map the host's numeric language selector (0, 1, 2, ...) to a language
    pub fn from_selector(selector: i64) -> Option<Language> {
        match selector {
            0 => Some(Language::English),
            1 => Some(Language::Polish),
            2 => Some(Language::Dutch),
            _ => None,
        }
    }

    pub fn selector(&self) -> u8 {
        match self {
            Language::English => 0,
            Language::Polish => 1,
            Language::Dutch => 2,
        }
    }
}

/// Canonical label keys
pub mod label {
    pub const HEAT_SUPPLY_TEMP: &str = "Heat supply temp";
    pub const HEAT_RETURN_TEMP: &str = "Heat return temp";
    pub const RETURN_TEMP_TARGET: &str = "Return temp target";
    pub const OUTSIDE_TEMP: &str = "Outside temp";
    pub const OUTSIDE_TEMP_AVG: &str = "Outside temp avg";
    pub const DHW_TEMP: &str = "DHW temp";
    pub const DHW_TEMP_TARGET: &str = "DHW temp target";
    pub const SOURCE_IN_TEMP: &str = "WP source in temp";
    pub const SOURCE_OUT_TEMP: &str = "WP source out temp";
    pub const MC1_TEMP: &str = "MC1 temp";
    pub const MC1_TEMP_TARGET: &str = "MC1 temp target";
    pub const MC2_TEMP: &str = "MC2 temp";
    pub const MC2_TEMP_TARGET: &str = "MC2 temp target";
    pub const HEATING_MODE: &str = "Heating mode";
    pub const HOT_WATER_MODE: &str = "Hot water mode";
    pub const COOLING: &str = "Cooling";
    pub const MODE_LEVELS: &str = "Automat.|2nd h. source|Party|Holidays|Off";
    pub const NO_REQUIREMENT: &str = "No requirement";
    pub const POOL_PV_MODE: &str = "Swimming pool mode / Photovaltaik";
    pub const EVU: &str = "EVUM";
    pub const DEFROST: &str = "Defrost";
    pub const EXTERNAL_SOURCE_MODE: &str = "Heating external source mode";
    pub const TEMP_OFFSET: &str = "Temp +-";
    pub const WORKING_MODE: &str = "Working mode";
    pub const FLOW: &str = "Flow";
    pub const COMPRESSOR_FREQ: &str = "Compressor freq";
    pub const ROOM_TEMP: &str = "Room temp";
    pub const ROOM_TEMP_TARGET: &str = "Room temp target";
    pub const POWER_TOTAL: &str = "Power total";
    pub const POWER_HEATING: &str = "Power heating";
    pub const POWER_DHW: &str = "Power DHW";
    pub const HEAT_OUT_TOTAL: &str = "Heat out total";
    pub const HEAT_OUT_HEATING: &str = "Heat out heating";
    pub const HEAT_OUT_DHW: &str = "Heat out DHW";
    pub const COP_TOTAL: &str = "COP total";
}

/// Canonical label followed by its Polish and Dutch translations
static LABELS: &[(&str, [&str; 2])] = &[
    (label::HEAT_SUPPLY_TEMP, ["Temp zasilania", "Aanvoertemp verw"]),
    (label::HEAT_RETURN_TEMP, ["Temp powrotu", "Retourtemp verw"]),
    (label::RETURN_TEMP_TARGET, ["Temp powr cel", "Retourtemp doel"]),
    (label::OUTSIDE_TEMP, ["Temp zewn", "Buitentemp"]),
    (label::OUTSIDE_TEMP_AVG, ["Temp zewn śred", "Buitentemp gem"]),
    (label::DHW_TEMP, ["Temp cwu", "Temp tapwater"]),
    (label::DHW_TEMP_TARGET, ["Temp cwu cel", "Tapwater inst"]),
    (label::SOURCE_IN_TEMP, ["Temp WP źródło wej", "WP bron in temp"]),
    (label::SOURCE_OUT_TEMP, ["Temp WP źródło wyj", "WP bron uit temp"]),
    (label::MC1_TEMP, ["Temp OM1", "Menggroep1 temp"]),
    (label::MC1_TEMP_TARGET, ["Temp OM1 cel", "Menggroep1 inst"]),
    (label::MC2_TEMP, ["Temp OM2", "Menggroep2 temp"]),
    (label::MC2_TEMP_TARGET, ["Temp OM2 cel", "Menggroep2 inst"]),
    (label::HEATING_MODE, ["Obieg grzewczy", "Verwarmen"]),
    (label::HOT_WATER_MODE, ["Woda użytkowa", "Warmwater"]),
    (label::COOLING, ["Chłodzenie", "Koeling"]),
    (
        label::MODE_LEVELS,
        [
            "Automat.|II źr. ciepła|Party|Wakacje|Wył.",
            "Automatisch|2e warm.opwek|Party|Vakantie|Uit",
        ],
    ),
    (label::NO_REQUIREMENT, ["Brak zapotrzebowania", "Geen warmtevraag"]),
    (label::POOL_PV_MODE, ["Tryb basen / Fotowoltaika", "Zwembad / Fotovoltaïek"]),
    (label::EVU, ["EVU", "EVU"]),
    (label::DEFROST, ["Rozmrażanie", "Ontdooien"]),
    (label::EXTERNAL_SOURCE_MODE, ["Ogrzewanie z zewnętrznego źródła", "Verwarmen 2e warm.opwek"]),
    (label::TEMP_OFFSET, ["Temp +-", "Temp +-"]),
    (label::WORKING_MODE, ["Stan pracy", "Bedrijfsmode"]),
    (label::FLOW, ["Przepływ", "Debiet"]),
    (label::COMPRESSOR_FREQ, ["Częst sprężarki", "Compr freq"]),
    (label::ROOM_TEMP, ["Temp pokojowa", "Ruimtetemp act"]),
    (label::ROOM_TEMP_TARGET, ["Temp pokoj cel", "Ruimtetemp gew"]),
    (label::POWER_TOTAL, ["Pobór mocy", "Energie totaal"]),
    (label::POWER_HEATING, ["Pobór grz", "Energie verw"]),
    (label::POWER_DHW, ["Pobór cwu", "Energie warmw"]),
    (label::HEAT_OUT_TOTAL, ["Moc grz razem", "Verwarm totaal"]),
    (label::HEAT_OUT_HEATING, ["Moc grz ogrz", "Verwarm verw"]),
    (label::HEAT_OUT_DHW, ["Moc grz cwu", "Verwarm warmw"]),
    (label::COP_TOTAL, ["COP razem", "COP totaal"]),
];

/// Translate a canonical label into `language`
///
/// Unknown labels are returned unchanged.
pub fn localize(label: &'static str, language: Language) -> &'static str {
    let translations = match LABELS.iter().find(|(canonical, _)| *canonical == label) {
        Some((_, translations)) => translations,
        None => {
            warn!(label, "no translations for label");
            return label;
        }
    };

    match language {
        Language::English => label,
        Language::Polish => translations[0],
        Language::Dutch => translations[1],
    }
}

/// Label resolver bound to one language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Localizer {
    language: Language,
}

impl Localizer {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn localize(&self, label: &'static str) -> &'static str {
        localize(label, self.language)
    }

    /// Whether `name` is one of the labels this driver assigns, in any language
    ///
    /// Used to tell driver-assigned device names apart from names chosen by
    /// the user, which must never be overwritten.
    pub fn is_known_label(name: &str) -> bool {
        LABELS
            .iter()
            .any(|(canonical, translations)| *canonical == name || translations.contains(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Language::English, "Hot water mode")]
    #[case(Language::Polish, "Woda użytkowa")]
    #[case(Language::Dutch, "Warmwater")]
    fn test_localize(#[case] language: Language, #[case] expected: &str) {
        assert_eq!(localize(label::HOT_WATER_MODE, language), expected);
    }

    #[test]
    fn test_unknown_label_passes_through() {
        assert_eq!(localize("Not a label", Language::Dutch), "Not a label");
    }

    #[test]
    fn test_language_selector() {
        for language in Language::ALL {
            assert_eq!(Language::from_selector(language.selector() as i64), Some(language));
        }
        assert_eq!(Language::from_selector(3), None);
        assert_eq!(Language::from_selector(-1), None);
    }

    #[test]
    fn test_known_labels() {
        assert!(Localizer::is_known_label("COP total"));
        assert!(Localizer::is_known_label("COP razem"));
        assert!(Localizer::is_known_label("Verwarm warmw"));
        assert!(!Localizer::is_known_label("Kitchen floor"));
        // Substrings of labels are not labels
        assert!(!Localizer::is_known_label("COP"));
    }

    #[test]
    fn test_canonical_labels_are_unique() {
        for (i, (a, _)) in LABELS.iter().enumerate() {
            assert!(
                LABELS.iter().skip(i + 1).all(|(b, _)| a != b),
                "duplicate label {}",
                a
            );
        }
    }
}
