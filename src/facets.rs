//! Distinct selectable values for each filter control, derived from the full
//! (unfiltered) record store.

use crate::config::*;
use crate::filters::Milestone;
use crate::record::{Record, ScheduleDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Map a raw `Regent Production` value to its selectable stage.
///
/// Finished records have no selectable stage, and hyphenated stages (goods in
/// transit between sites) are grouped under one label.
pub fn selectable_stage(raw: &str) -> Option<&str> {
    let stage = raw.trim();
    if stage.is_empty() || stage.eq_ignore_ascii_case(FINISHED_STAGE) {
        return None;
    }
    if stage.contains('-') {
        Some(SEA_FREIGHTING_STAGE)
    } else {
        Some(stage)
    }
}

/// Sorted, de-duplicated selectable stages across `records`.
pub fn derive_stages(records: &[Record]) -> Vec<String> {
    let stages: BTreeSet<String> = records
        .iter()
        .filter_map(|r| r.text(FIELD_REGENT_PRODUCTION))
        .filter_map(|raw| selectable_stage(&raw).map(str::to_string))
        .collect();
    stages.into_iter().collect()
}

/// Options for every dropdown and checkbox list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facets {
    /// Starts with the `"all"` sentinel.
    pub dealers: Vec<String>,
    /// The remaining option lists start with `""` ("any").
    pub models: Vec<String>,
    pub model_years: Vec<String>,
    pub model_ranges: Vec<String>,
    pub forecast_years: Vec<String>,
    pub milestone_year_months: BTreeMap<Milestone, Vec<String>>,
    /// Checkbox list, no sentinel.
    pub stages: Vec<String>,
}

fn with_sentinel(sentinel: &str, values: BTreeSet<String>) -> Vec<String> {
    std::iter::once(sentinel.to_string()).chain(values).collect()
}

fn distinct(records: &[Record], field: &str) -> BTreeSet<String> {
    records
        .iter()
        .filter_map(|r| r.non_empty(field))
        .map(|v| v.into_owned())
        .collect()
}

fn distinct_dates<F>(records: &[Record], field: &str, key: F) -> BTreeSet<String>
where
    F: Fn(&ScheduleDate) -> Option<String>,
{
    records
        .iter()
        .filter_map(|r| r.text(field))
        .filter_map(|raw| ScheduleDate::parse(&raw).and_then(|d| key(&d)))
        .filter(|k| !k.is_empty())
        .collect()
}

/// Chassis prefixes identifying a model range.
pub fn model_ranges(records: &[Record]) -> Vec<String> {
    let prefixes = records
        .iter()
        .filter_map(|r| r.non_empty(FIELD_CHASSIS))
        .filter(|c| c.chars().count() >= MODEL_RANGE_LEN)
        .map(|c| c.chars().take(MODEL_RANGE_LEN).collect::<String>())
        .collect();
    with_sentinel("", prefixes)
}

/// Years present in forecast dates, minus the hidden ones.
pub fn forecast_years(records: &[Record]) -> Vec<String> {
    let mut years = distinct_dates(records, FIELD_FORECAST_DATE, |d| Some(d.year.to_string()));
    years.retain(|y| !HIDDEN_FORECAST_YEARS.contains(&y.as_str()));
    with_sentinel("", years)
}

/// `YYYY-MM` keys of forecast dates within `year`. Empty without a year.
pub fn forecast_months(records: &[Record], year: &str) -> Vec<String> {
    if year.is_empty() {
        return Vec::new();
    }
    let months = distinct_dates(records, FIELD_FORECAST_DATE, |d| {
        (d.year == year).then(|| d.year_month())
    });
    with_sentinel("", months)
}

pub fn milestone_year_months(records: &[Record], milestone: Milestone) -> Vec<String> {
    with_sentinel(
        "",
        distinct_dates(records, milestone.field(), |d| Some(d.year_month())),
    )
}

/// Derive every facet from the full record store.
pub fn extract_facets(records: &[Record]) -> Facets {
    Facets {
        dealers: with_sentinel(ALL_DEALERS, distinct(records, FIELD_DEALER)),
        models: with_sentinel("", distinct(records, FIELD_MODEL)),
        model_years: with_sentinel("", distinct(records, FIELD_MODEL_YEAR)),
        model_ranges: model_ranges(records),
        forecast_years: forecast_years(records),
        milestone_year_months: Milestone::ALL
            .iter()
            .map(|&m| (m, milestone_year_months(records, m)))
            .collect(),
        stages: derive_stages(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(value: &str) -> Record {
        Record::new().with("Regent Production", value)
    }

    #[test]
    fn stages_skip_finished_and_group_hyphenated() {
        let records = vec![
            stage("Frame-Shop A"),
            stage("Frame-Shop B"),
            stage("Paint"),
            stage("Finished"),
        ];
        assert_eq!(derive_stages(&records), vec!["Paint", "Sea Freighting"]);
    }

    #[test]
    fn finished_is_case_insensitive() {
        assert_eq!(selectable_stage("FINISHED"), None);
        assert_eq!(selectable_stage(" finished "), None);
        assert_eq!(selectable_stage(""), None);
        assert_eq!(selectable_stage("Chassis Welding"), Some("Chassis Welding"));
    }

    #[test]
    fn dropdowns_are_sorted_with_sentinels() {
        let records = vec![
            Record::new()
                .with("Dealer", "Zeta")
                .with("Model", "RV2")
                .with("Chassis", "XYZ1"),
            Record::new()
                .with("Dealer", "Acme")
                .with("Model", "")
                .with("Model Year", "2026")
                .with("Chassis", "AB"),
            Record::new().with("Dealer", "Zeta").with("Chassis", "ABC9"),
        ];
        let facets = extract_facets(&records);
        assert_eq!(facets.dealers, vec!["all", "Acme", "Zeta"]);
        assert_eq!(facets.models, vec!["", "RV2"]);
        assert_eq!(facets.model_years, vec!["", "2026"]);
        assert_eq!(facets.model_ranges, vec!["", "ABC", "XYZ"]);
        assert!(facets.stages.is_empty());
    }

    #[test]
    fn blank_chassis_yields_no_range() {
        let records = vec![
            Record::new().with("Chassis", "   "),
            Record::new().with("Chassis", "SRC24001"),
        ];
        assert_eq!(model_ranges(&records), vec!["", "SRC"]);
    }

    #[test]
    fn sparse_dates_do_not_add_blank_options() {
        let records = vec![
            Record::new().with("Forecast Production Date", "1/03/"),
            Record::new().with("Forecast Production Date", "1//2025"),
        ];
        assert_eq!(forecast_years(&records), vec!["", "2025"]);
    }

    #[test]
    fn forecast_years_hide_configured_years_and_bad_dates() {
        let records = vec![
            Record::new().with("Forecast Production Date", "01/02/2026"),
            Record::new().with("Forecast Production Date", "01/02/2024"),
            Record::new().with("Forecast Production Date", "01/05/2025"),
            Record::new().with("Forecast Production Date", "bad-date"),
            Record::new().with("Forecast Production Date", "09/05/2025"),
        ];
        assert_eq!(forecast_years(&records), vec!["", "2025", "2026"]);
        assert_eq!(forecast_months(&records, "2025"), vec!["", "2025-05"]);
        assert!(forecast_months(&records, "").is_empty());
    }

    #[test]
    fn milestone_facets_use_year_month_keys() {
        let records = vec![
            Record::new().with("Order Sent to Longtree", "03/11/2024"),
            Record::new().with("Order Sent to Longtree", "13/01/2025"),
            Record::new().with("Plans Sent to Dealer", "13/01/2025"),
        ];
        let facets = extract_facets(&records);
        assert_eq!(
            facets.milestone_year_months[&Milestone::OrderSentToLongtree],
            vec!["", "2024-11", "2025-01"]
        );
        assert_eq!(
            facets.milestone_year_months[&Milestone::SignedPlansReceived],
            vec![""]
        );
    }
}
