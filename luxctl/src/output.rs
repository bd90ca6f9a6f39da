//! Plain-text rendering of device records and raw register blocks

use chrono::{DateTime, Local};
use std::fmt::Write;

use device_store::DeviceRecord;
use luxtronik_state::TypedValue;

/// Registers printed per row of a raw dump
const REGISTERS_PER_ROW: usize = 8;

/// One line per device: id, name, type and value
pub fn device_table(devices: &[DeviceRecord]) -> String {
    let width = devices.iter().map(|d| d.name.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for device in devices {
        let kind = device.metadata.kind.type_name().unwrap_or("Setpoint");
        let hidden = if device.metadata.used { "" } else { " (hidden)" };
        let _ = writeln!(
            out,
            "{:>3}  {:<width$}  {:<12} {}{}",
            device.id,
            device.name,
            kind,
            format_value(&device.value),
            hidden,
            width = width
        );
    }
    out
}

/// Timestamped line for a device whose value just changed
pub fn change_line(device: &DeviceRecord) -> String {
    let at = device
        .last_update
        .map(|t| format_timestamp(t.with_timezone(&Local)))
        .unwrap_or_else(|| "-".to_string());
    format!("[{}] {}: {}", at, device.name, format_value(&device.value))
}

/// Index and value of every register, several per row
pub fn register_dump(registers: &[i32]) -> String {
    let mut out = String::new();
    for (row, chunk) in registers.chunks(REGISTERS_PER_ROW).enumerate() {
        let _ = write!(out, "{:>4}:", row * REGISTERS_PER_ROW);
        for value in chunk {
            let _ = write!(out, " {:>8}", value);
        }
        out.push('\n');
    }
    out
}

fn format_value(value: &TypedValue) -> String {
    match (value.numeric, value.display.as_deref()) {
        (Some(n), Some(s)) if s == n.to_string() => s.to_string(),
        (Some(n), Some(s)) => format!("{} ({})", s, n),
        (Some(n), None) => n.to_string(),
        (None, Some(s)) => s.to_string(),
        (None, None) => "-".to_string(),
    }
}

fn format_timestamp(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use luxtronik_state::{DeviceKind, DisplayMetadata, EntityId};
    use rstest::rstest;

    fn record(id: u32, name: &str, value: TypedValue) -> DeviceRecord {
        DeviceRecord {
            id: EntityId(id),
            name: name.to_string(),
            metadata: DisplayMetadata::new(DeviceKind::Temperature),
            value,
            last_update: None,
        }
    }

    #[rstest]
    #[case(TypedValue::display("21.5"), "21.5")]
    #[case(TypedValue::numeric(1), "1")]
    #[case(TypedValue::both(20, "20"), "20")]
    #[case(TypedValue::both(0, "Heating mode"), "Heating mode (0)")]
    #[case(TypedValue::default(), "-")]
    fn test_format_value(#[case] value: TypedValue, #[case] expected: &str) {
        assert_eq!(format_value(&value), expected);
    }

    #[test]
    fn test_device_table_aligns_names() {
        let table = device_table(&[
            record(1, "Luxtronik - Heat supply temp", TypedValue::display("30.1")),
            record(2, "Short", TypedValue::display("4.5")),
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].find("Temperature"), lines[1].find("Temperature"));
        assert!(lines[1].starts_with("  2  Short"));
    }

    #[test]
    fn test_change_line_without_timestamp() {
        let line = change_line(&record(7, "DHW", TypedValue::display("48.0")));
        assert_eq!(line, "[-] DHW: 48.0");
    }

    #[test]
    fn test_register_dump_rows() {
        let dump = register_dump(&(0..10).collect::<Vec<i32>>());
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("   8:"));
    }
}
