//! Date-only helpers for the birth date field.
//!
//! The backend may send either `YYYY-MM-DD` or a full datetime such as
//! `1990-05-17T00:00:00`; only the date part is kept.

use chrono::NaiveDate;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parses the leading `YYYY-MM-DD` of `raw`.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, ISO_DATE_FORMAT).ok()
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// `dd/mm/yyyy`, as shown in the patients table.
pub fn format_display_date(date: &NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Serde adapter for `Option<NaiveDate>` fields.
///
/// An unreadable value decodes as `None` so one bad record cannot fail a
/// whole page.
pub mod iso_date_opt {
    use super::{format_iso_date, parse_iso_date};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&format_iso_date(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => {
                let date = parse_iso_date(s);
                if date.is_none() {
                    tracing::warn!(value = s, "unreadable date, treating as absent");
                }
                Ok(date)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_date_part() {
        let expected = NaiveDate::from_ymd_opt(1990, 5, 17);
        assert_eq!(parse_iso_date("1990-05-17"), expected);
        assert_eq!(parse_iso_date("1990-05-17T00:00:00"), expected);
        assert_eq!(parse_iso_date("1990-05-17T13:45:00Z"), expected);
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(parse_iso_date("1990-02-30"), None);
        assert_eq!(parse_iso_date("17/05/1990"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn formats_for_display() {
        let date = NaiveDate::from_ymd_opt(2001, 1, 9).unwrap();
        assert_eq!(format_display_date(&date), "09/01/2001");
        assert_eq!(format_iso_date(&date), "2001-01-09");
    }
}
