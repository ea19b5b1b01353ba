//! pt-BR formatting of local date/time values, the way the clock and the
//! stored records show them.

use chrono::{DateTime, Locale, TimeZone};

const LOCALE: Locale = Locale::pt_BR;

/// `18/10/2026`
pub fn short_date<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%d/%m/%Y").to_string()
}

/// `08:02:05`
pub fn time<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%H:%M:%S").to_string()
}

/// `domingo, 18 de outubro de 2026`
pub fn long_date<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format_localized("%A, %-d de %B de %Y", LOCALE).to_string()
}

/// `2026-10-18`, used in export file names
pub fn iso_date<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%Y-%m-%d").to_string()
}
