//! Text rendering of records for the messaging channel

use crate::record::Record;

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Join two optional parts with a space, skipping absent ones.
fn pair(a: &Option<String>, b: &Option<String>) -> String {
    [a, b]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render one record as a multi-line message block.
///
/// The date-of-birth and birthplace lines only appear when the record has them.
pub fn render_record(record: &Record) -> String {
    let plate = match &record.plate_suffix {
        Some(suffix) => format!("{} {}", record.plate_number, suffix),
        None => record.plate_number.clone(),
    };

    let mut lines = vec![
        format!("🚘 Plate: {}", plate),
        format!("📅 Year: {}", field(&record.production_year)),
        format!("🧑‍💼 Name: {}", pair(&record.given_name, &record.family_name)),
        format!("📞 Phone: {}", field(&record.phone)),
        format!("🚗 Car: {}", pair(&record.make, &record.model)),
        format!("🎨 Color: {}", field(&record.color)),
        format!("📍 Address: {}", field(&record.address)),
    ];

    if let Some(dob) = &record.date_of_birth {
        lines.push(format!("🎂 DOB: {}", dob));
    }
    if let Some(place) = &record.birthplace {
        lines.push(format!("🌍 Birthplace: {}", place));
    }

    lines.join("\n")
}
