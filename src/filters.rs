//! Filter state, the actions that change it, and the record predicate.

use crate::config::*;
use crate::facets::selectable_stage;
use crate::record::{Record, ScheduleDate};
use crate::ScheduleError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::rc::Rc;
use yew::Reducible;

/// Date milestones that can be narrowed to a single year-month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Milestone {
    OrderSentToLongtree,
    PlansSentToDealer,
    SignedPlansReceived,
}

impl Milestone {
    pub const ALL: [Milestone; 3] = [
        Milestone::OrderSentToLongtree,
        Milestone::PlansSentToDealer,
        Milestone::SignedPlansReceived,
    ];

    /// Record field holding the milestone date.
    pub fn field(self) -> &'static str {
        match self {
            Milestone::OrderSentToLongtree => "Order Sent to Longtree",
            Milestone::PlansSentToDealer => "Plans Sent to Dealer",
            Milestone::SignedPlansReceived => "Signed Plans Received",
        }
    }

    /// DOM id of the milestone's dropdown.
    pub fn element_id(self) -> &'static str {
        match self {
            Milestone::OrderSentToLongtree => "order_sent_to_longtree",
            Milestone::PlansSentToDealer => "plans_sent_to_dealer",
            Milestone::SignedPlansReceived => "signed_plans_received",
        }
    }
}

/// The current selection of every filter control.
///
/// Empty strings mean "any". Serialized names match the filter object used by
/// browser-side callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
    pub dealer: String,
    pub model: String,
    pub model_year: String,
    pub model_range: String,
    pub forecast_year: String,
    pub forecast_year_month: String,
    #[serde(rename = "OrderSentToLongtreeYearMonth")]
    pub order_sent_to_longtree_year_month: String,
    #[serde(rename = "PlansSentToDealerYearMonth")]
    pub plans_sent_to_dealer_year_month: String,
    #[serde(rename = "SignedPlansReceivedYearMonth")]
    pub signed_plans_received_year_month: String,
    pub selected_stages: BTreeSet<String>,
    /// True iff `selected_stages` covers every derived stage.
    pub all_stages_selected: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            dealer: String::new(),
            model: String::new(),
            model_year: String::new(),
            model_range: String::new(),
            forecast_year: String::new(),
            forecast_year_month: String::new(),
            order_sent_to_longtree_year_month: String::new(),
            plans_sent_to_dealer_year_month: String::new(),
            signed_plans_received_year_month: String::new(),
            selected_stages: BTreeSet::new(),
            all_stages_selected: true,
        }
    }
}

/// User actions on the filter controls. Stage actions carry the full derived
/// stage set so the "all selected" flag can be kept exact.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    SetDealer(String),
    SetModel(String),
    SetModelYear(String),
    SetModelRange(String),
    SetForecastYear(String),
    SetForecastYearMonth(String),
    SetMilestone(Milestone, String),
    StagesLoaded(Vec<String>),
    ToggleAllStages(Vec<String>),
    ToggleStage { stage: String, all: Vec<String> },
    SelectStages { stages: Vec<String>, all: Vec<String> },
    /// Back to defaults, with every stage in `.0` selected.
    Reset(Vec<String>),
}

fn covers_all(selected: &BTreeSet<String>, all: &[String]) -> bool {
    selected.len() == all.len() && all.iter().all(|s| selected.contains(s))
}

impl FilterState {
    pub fn milestone(&self, milestone: Milestone) -> &str {
        match milestone {
            Milestone::OrderSentToLongtree => &self.order_sent_to_longtree_year_month,
            Milestone::PlansSentToDealer => &self.plans_sent_to_dealer_year_month,
            Milestone::SignedPlansReceived => &self.signed_plans_received_year_month,
        }
    }

    fn milestone_mut(&mut self, milestone: Milestone) -> &mut String {
        match milestone {
            Milestone::OrderSentToLongtree => &mut self.order_sent_to_longtree_year_month,
            Milestone::PlansSentToDealer => &mut self.plans_sent_to_dealer_year_month,
            Milestone::SignedPlansReceived => &mut self.signed_plans_received_year_month,
        }
    }

    pub fn dealer_active(&self) -> bool {
        !self.dealer.is_empty() && self.dealer != ALL_DEALERS
    }

    pub fn stage_filter_active(&self) -> bool {
        !self.all_stages_selected
    }

    /// Number of filters currently narrowing the record set.
    pub fn active_filter_count(&self) -> usize {
        let text_filters = [
            &self.model,
            &self.model_year,
            &self.model_range,
            &self.forecast_year,
            &self.forecast_year_month,
            &self.order_sent_to_longtree_year_month,
            &self.plans_sent_to_dealer_year_month,
            &self.signed_plans_received_year_month,
        ];
        text_filters.iter().filter(|v| !v.is_empty()).count()
            + usize::from(self.dealer_active())
            + usize::from(self.stage_filter_active())
    }

    /// Produce the state that results from `action`.
    pub fn apply(&self, action: FilterAction) -> FilterState {
        let mut next = self.clone();
        match action {
            FilterAction::SetDealer(v) => next.dealer = v,
            FilterAction::SetModel(v) => next.model = v,
            FilterAction::SetModelYear(v) => next.model_year = v,
            FilterAction::SetModelRange(v) => next.model_range = v,
            FilterAction::SetForecastYear(year) => {
                // A month only makes sense inside the year it was picked from
                if year != next.forecast_year {
                    next.forecast_year_month.clear();
                }
                next.forecast_year = year;
            }
            FilterAction::SetForecastYearMonth(v) => next.forecast_year_month = v,
            FilterAction::SetMilestone(milestone, v) => *next.milestone_mut(milestone) = v,
            FilterAction::StagesLoaded(all) => {
                if next.all_stages_selected {
                    next.selected_stages = all.iter().cloned().collect();
                } else {
                    next.selected_stages.retain(|s| all.contains(s));
                    next.all_stages_selected = covers_all(&next.selected_stages, &all);
                }
            }
            FilterAction::ToggleAllStages(all) => {
                let select_all = !next.all_stages_selected;
                next.selected_stages = if select_all {
                    all.iter().cloned().collect()
                } else {
                    BTreeSet::new()
                };
                next.all_stages_selected = covers_all(&next.selected_stages, &all);
            }
            FilterAction::ToggleStage { stage, all } => {
                if !next.selected_stages.remove(&stage) {
                    next.selected_stages.insert(stage);
                }
                next.all_stages_selected = covers_all(&next.selected_stages, &all);
            }
            FilterAction::SelectStages { stages, all } => {
                if stages.is_empty() {
                    return next;
                }
                next.selected_stages = stages.into_iter().collect();
                next.all_stages_selected = covers_all(&next.selected_stages, &all);
            }
            FilterAction::Reset(all) => {
                next = FilterState {
                    selected_stages: all.into_iter().collect(),
                    ..FilterState::default()
                }
            }
        }
        next
    }
}

impl Reducible for FilterState {
    type Action = FilterAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.apply(action))
    }
}

fn field_equals(record: &Record, field: &str, expected: &str) -> Result<bool, ScheduleError> {
    Ok(record.get(field)?.as_deref() == Some(expected))
}

/// Evaluate `check` against the parsed date in `field`. Absent or malformed
/// dates never match.
fn date_matches(
    record: &Record,
    field: &str,
    check: impl Fn(&ScheduleDate) -> bool,
) -> Result<bool, ScheduleError> {
    let raw = record.get(field)?;
    Ok(raw
        .as_deref()
        .and_then(ScheduleDate::parse)
        .map_or(false, |date| check(&date)))
}

/// Decide whether `record` passes every active filter, surfacing field errors.
pub fn try_matches(record: &Record, filters: &FilterState) -> Result<bool, ScheduleError> {
    if filters.dealer_active() && !field_equals(record, FIELD_DEALER, &filters.dealer)? {
        return Ok(false);
    }
    if !filters.model.is_empty() && !field_equals(record, FIELD_MODEL, &filters.model)? {
        return Ok(false);
    }
    if !filters.model_year.is_empty()
        && !field_equals(record, FIELD_MODEL_YEAR, &filters.model_year)?
    {
        return Ok(false);
    }
    if !filters.model_range.is_empty() {
        let chassis = record.get(FIELD_CHASSIS)?;
        if !chassis.map_or(false, |c| c.starts_with(filters.model_range.as_str())) {
            return Ok(false);
        }
    }
    if !filters.forecast_year.is_empty()
        && !date_matches(record, FIELD_FORECAST_DATE, |d| d.year == filters.forecast_year)?
    {
        return Ok(false);
    }
    if !filters.forecast_year_month.is_empty()
        && !date_matches(record, FIELD_FORECAST_DATE, |d| {
            d.year_month() == filters.forecast_year_month
        })?
    {
        return Ok(false);
    }
    for milestone in Milestone::ALL {
        let wanted = filters.milestone(milestone);
        if !wanted.is_empty() && !date_matches(record, milestone.field(), |d| d.year_month() == wanted)? {
            return Ok(false);
        }
    }
    if filters.stage_filter_active() {
        let raw = record.get(FIELD_REGENT_PRODUCTION)?;
        let selected = raw
            .as_deref()
            .and_then(selectable_stage)
            .map_or(false, |stage| filters.selected_stages.contains(stage));
        if !selected {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Infallible predicate: a record whose evaluation fails is excluded.
pub fn matches(record: &Record, filters: &FilterState) -> bool {
    try_matches(record, filters).unwrap_or_else(|e| {
        warn!("Excluding record after filter error: {}", e);
        false
    })
}

/// Outcome of filtering one batch of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterReport {
    pub records: Vec<Record>,
    /// Records dropped because their evaluation failed.
    pub failed: usize,
}

/// Run every record through the predicate. One bad record never aborts the
/// batch.
pub fn filter_records(records: &[Record], filters: &FilterState) -> FilterReport {
    let mut report = FilterReport::default();
    for record in records {
        match try_matches(record, filters) {
            Ok(true) => report.records.push(record.clone()),
            Ok(false) => {}
            Err(e) => {
                warn!("Excluding record after filter error: {}", e);
                report.failed += 1;
            }
        }
    }
    debug!(
        "Filtered {} records down to {} ({} failed evaluation)",
        records.len(),
        report.records.len(),
        report.failed
    );
    report
}
