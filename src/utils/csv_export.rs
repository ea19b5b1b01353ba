use chrono::{DateTime, TimeZone};

use crate::model::punch::PunchRow;
use crate::utils::locale;

pub const CSV_HEADER: [&str; 5] = ["Data", "Hora", "Tipo", "Funcionário", "ID"];

/// Renders rows as CSV, header first. Fields are joined as-is: embedded
/// commas are not quoted.
pub fn to_csv(rows: &[PunchRow]) -> String {
    std::iter::once(CSV_HEADER.join(","))
        .chain(rows.iter().map(|row| row.fields().join(",")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Download name for an export produced at `now`.
pub fn export_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("registro_ponto_{}.csv", locale::iso_date(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn row(punch_type: &str, name: &str) -> PunchRow {
        PunchRow {
            date: "18/10/2026".into(),
            time: "08:00:00".into(),
            punch_type: punch_type.into(),
            employee_name: name.into(),
            employee_id: "123".into(),
        }
    }

    #[test]
    fn empty_export_is_header_only() {
        assert_eq!(to_csv(&[]), "Data,Hora,Tipo,Funcionário,ID");
    }

    #[test]
    fn one_line_per_record_plus_header() {
        let csv = to_csv(&[row("entrada", "Ana"), row("saida", "Ana")]);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "18/10/2026,08:00:00,entrada,Ana,123");
        assert_eq!(lines[2], "18/10/2026,08:00:00,saida,Ana,123");
    }

    #[test]
    fn embedded_commas_are_not_escaped() {
        let csv = to_csv(&[row("entrada", "Silva, Ana")]);
        assert!(csv.ends_with("entrada,Silva, Ana,123"));
    }

    #[test]
    fn file_name_uses_local_date() {
        let now = FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 18, 23, 30, 0)
            .unwrap();
        assert_eq!(export_file_name(&now), "registro_ponto_2026-10-18.csv");
    }
}
