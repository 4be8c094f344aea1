//! Schedule records and the `DD/MM/YYYY` dates they carry.
//!
//! Records have no enforced schema: any field may be missing, empty, or (when
//! loaded from JSON) hold something other than a string. Lookups make the
//! absent case explicit instead of handing back an empty string.

use crate::ScheduleError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashSet;

/// One schedule entry (vehicle/order) keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy when assembling records by hand.
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<Value>) {
        self.0.insert(field.to_string(), value.into());
    }

    /// Look up a field as text.
    ///
    /// Strings are returned as-is, numbers and booleans as their textual form,
    /// and a missing field or JSON `null` as `Ok(None)`. Arrays and objects are
    /// reported as [`ScheduleError::FieldShape`].
    pub fn get(&self, field: &str) -> Result<Option<Cow<'_, str>>, ScheduleError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(Cow::Borrowed(s.as_str()))),
            Some(Value::Number(n)) => Ok(Some(Cow::Owned(n.to_string()))),
            Some(Value::Bool(b)) => Ok(Some(Cow::Owned(b.to_string()))),
            Some(Value::Array(_)) => Err(ScheduleError::FieldShape {
                field: field.to_string(),
                found: "array",
            }),
            Some(Value::Object(_)) => Err(ScheduleError::FieldShape {
                field: field.to_string(),
                found: "object",
            }),
        }
    }

    /// Lenient lookup: malformed values read as absent.
    pub fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).ok().flatten()
    }

    /// Lenient lookup that also treats empty/whitespace values as absent.
    pub fn non_empty(&self, field: &str) -> Option<Cow<'_, str>> {
        self.text(field).filter(|v| !v.trim().is_empty())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A `DD/MM/YYYY` date split into its textual components.
///
/// Only the shape is checked (at least three `/`-separated parts);
/// components are kept verbatim and compared as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleDate<'a> {
    pub day: &'a str,
    pub month: &'a str,
    pub year: &'a str,
}

impl<'a> ScheduleDate<'a> {
    pub fn parse(raw: &'a str) -> Option<Self> {
        let mut parts = raw.split('/');
        let day = parts.next()?;
        let month = parts.next()?;
        let year = parts.next()?;
        Some(Self { day, month, year })
    }

    /// Composite `YYYY-MM` key used by the year-month filters.
    pub fn year_month(&self) -> String {
        format!("{}-{}", self.year, self.month)
    }
}

/// Parse CSV content whose header row names the record fields.
///
/// Rows that fail to parse are skipped with a warning; empty cells become
/// empty string values.
pub fn read_records_from_csv_string(csv_content: &str) -> Result<Vec<Record>, ScheduleError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_content.as_bytes());

    let headers = reader.headers()?.clone();
    let mut seen = HashSet::new();
    for header in headers.iter() {
        if !seen.insert(header) {
            return Err(ScheduleError::DuplicateHeader(header.to_string()));
        }
    }

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping CSV row {}: {}", i + 2, e);
                continue;
            }
        };

        let mut record = Record::new();
        for (header, value) in headers.iter().zip(row.iter()) {
            record.insert(header, value);
        }
        records.push(record);
    }

    info!("Loaded {} schedule records from CSV content", records.len());
    Ok(records)
}

/// Parse a JSON array of flat objects.
pub fn read_records_from_json_str(json_content: &str) -> Result<Vec<Record>, ScheduleError> {
    let records: Vec<Record> = serde_json::from_str(json_content)?;
    info!("Loaded {} schedule records from JSON content", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_distinguishes_absent_null_and_shapes() {
        let record = Record::new()
            .with("Dealer", "Acme")
            .with("Model Year", 2025)
            .with("Chassis", Value::Null)
            .with("Notes", json!(["a", "b"]));

        assert_eq!(record.get("Dealer").unwrap().as_deref(), Some("Acme"));
        assert_eq!(record.get("Model Year").unwrap().as_deref(), Some("2025"));
        assert_eq!(record.get("Chassis").unwrap(), None);
        assert_eq!(record.get("Missing").unwrap(), None);
        assert!(matches!(
            record.get("Notes"),
            Err(ScheduleError::FieldShape { found: "array", .. })
        ));
        assert_eq!(record.text("Notes"), None);
    }

    #[test]
    fn non_empty_skips_blank_values() {
        let record = Record::new().with("Chassis", "   ").with("Model", "X");
        assert_eq!(record.non_empty("Chassis"), None);
        assert_eq!(record.non_empty("Model").as_deref(), Some("X"));
    }

    #[test]
    fn parses_well_formed_dates() {
        let date = ScheduleDate::parse("15/03/2025").unwrap();
        assert_eq!(date.day, "15");
        assert_eq!(date.month, "03");
        assert_eq!(date.year, "2025");
        assert_eq!(date.year_month(), "2025-03");
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(ScheduleDate::parse("bad-date"), None);
        assert_eq!(ScheduleDate::parse("15/03"), None);
        assert_eq!(ScheduleDate::parse(""), None);
    }

    #[test]
    fn keeps_date_parts_verbatim() {
        let sparse = ScheduleDate::parse("1//2025").unwrap();
        assert_eq!(sparse.month, "");
        assert_eq!(sparse.year, "2025");

        let padded = ScheduleDate::parse("15/03/ 2025").unwrap();
        assert_eq!(padded.year, " 2025");

        let extra = ScheduleDate::parse("15/03/2025/x").unwrap();
        assert_eq!(extra.year, "2025");
    }

    #[test]
    fn reads_csv_with_header_row() {
        let csv = "Dealer,Model,Chassis\nAcme,RV1, AB123\nBeta,RV2,\n";
        let records = read_records_from_csv_string(csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text("Chassis").as_deref(), Some("AB123"));
        assert_eq!(records[1].text("Chassis").as_deref(), Some(""));
        assert_eq!(records[1].non_empty("Chassis"), None);
    }

    #[test]
    fn short_csv_rows_leave_fields_absent() {
        let csv = "Dealer,Model,Chassis\nAcme\n";
        let records = read_records_from_csv_string(csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Model").unwrap(), None);
    }

    #[test]
    fn duplicate_csv_headers_are_rejected() {
        let csv = "Dealer,Dealer\nA,B\n";
        assert!(matches!(
            read_records_from_csv_string(csv),
            Err(ScheduleError::DuplicateHeader(h)) if h == "Dealer"
        ));
    }

    #[test]
    fn reads_json_array_of_objects() {
        let json = r#"[{"Dealer":"Acme","Model Year":2025},{"Chassis":null}]"#;
        let records = read_records_from_json_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text("Model Year").as_deref(), Some("2025"));
        assert!(read_records_from_json_str("{\"not\":\"an array\"}").is_err());
    }
}
