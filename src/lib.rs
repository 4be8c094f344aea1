use log::warn;
use serde::Serialize;
use std::fmt;
use wasm_bindgen::prelude::*;

pub mod aggregate;
pub mod config;
pub mod facets;
pub mod filters;
pub mod pipeline;
pub mod record;
pub mod utils;

pub use aggregate::{
    chassis_summary, count_by_dealer, drill_down, forecast_year_breakdown, percent_of,
    year_chassis_slices, ChassisPresence, ChassisSummary, DealerCount, DrillDown, PieSlice,
    YearBucket,
};
pub use facets::{derive_stages, extract_facets, forecast_months, selectable_stage, Facets};
pub use filters::{
    filter_records, matches, try_matches, FilterAction, FilterReport, FilterState, Milestone,
};
pub use pipeline::{FilterPipeline, PipelineConfig, PipelinePhase, Schedule};
pub use record::{read_records_from_csv_string, read_records_from_json_str, Record, ScheduleDate};

// Errors raised while loading or inspecting schedule records
#[derive(Debug)]
pub enum ScheduleError {
    /// A field held an array or object where text was expected
    FieldShape { field: String, found: &'static str },
    DuplicateHeader(String),
    Csv(String),
    Json(String),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::FieldShape { field, found } => write!(
                f,
                "Field '{}' holds an {} where a text value was expected",
                field, found
            ),
            ScheduleError::DuplicateHeader(header) => {
                write!(f, "Column '{}' appears more than once in the header", header)
            }
            ScheduleError::Csv(e) => write!(f, "Failed to read CSV records: {}", e),
            ScheduleError::Json(e) => write!(f, "Failed to read JSON records: {}", e),
        }
    }
}

impl std::error::Error for ScheduleError {}

impl From<csv::Error> for ScheduleError {
    fn from(e: csv::Error) -> Self {
        ScheduleError::Csv(e.to_string())
    }
}

impl From<serde_json::Error> for ScheduleError {
    fn from(e: serde_json::Error) -> Self {
        ScheduleError::Json(e.to_string())
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    // Plain objects rather than ES maps, so JS callers can index by field name
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        warn!("Failed to deserialize {}: {}", what, e);
        to_js(&format!("Failed to deserialize {}: {}", what, e))
    })
}

/// Filter entry point for JavaScript hosts.
///
/// # Arguments
/// * `records_js` - Array of flat record objects
/// * `filters_js` - Filter object using the dashboard's key names
///
/// # Returns
/// The matching records, or an error message string
#[wasm_bindgen]
pub fn filter_records_js(records_js: JsValue, filters_js: JsValue) -> JsValue {
    let records: Vec<Record> = match from_js(records_js, "records") {
        Ok(r) => r,
        Err(e) => return e,
    };
    let filters: FilterState = match from_js(filters_js, "filters") {
        Ok(f) => f,
        Err(e) => return e,
    };
    to_js(&filter_records(&records, &filters).records)
}

/// Forecast year / chassis breakdown for JavaScript hosts.
#[wasm_bindgen]
pub fn forecast_year_breakdown_js(records_js: JsValue) -> JsValue {
    match from_js::<Vec<Record>>(records_js, "records") {
        Ok(records) => to_js(&forecast_year_breakdown(&records)),
        Err(e) => e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_readable_messages() {
        let shape = ScheduleError::FieldShape {
            field: "Dealer".into(),
            found: "object",
        };
        assert_eq!(
            shape.to_string(),
            "Field 'Dealer' holds an object where a text value was expected"
        );

        let json = read_records_from_json_str("not json").unwrap_err();
        assert!(json.to_string().starts_with("Failed to read JSON records"));
    }
}
