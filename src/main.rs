//! Production schedule dashboard built with Yew.
//! Loads the schedule, wires filter state into the debounced pipeline and
//! renders the table and charts from the published result.

use log::error;
use schedule_dashboard::{read_records_from_csv_string, FilterAction, FilterState, Record};
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod chart;
mod components;
mod hooks;

use components::{FilterPanel, ForecastYearBreakdown, LoadingOverlay, ScheduleSummary, ScheduleTable};
use hooks::{use_debounced_filter, use_facets, use_forecast_months};

const SCHEDULE_CSV: &str = include_str!("schedule.csv");

// ──────────────────────────────────────────────────────────────────────────────

/// Root component: loads the schedule and feeds the filtered result to the views.
#[function_component(Dashboard)]
fn dashboard() -> Html {
    // The store is replaced wholesale on load, never edited in place
    let records = use_state(|| None::<Rc<[Record]>>);
    let load_error = use_state(|| None::<String>);
    let filters = use_reducer(FilterState::default);
    let show_charts = use_state(|| true);

    // Load schedule from CSV on mount
    {
        let records = records.clone();
        let load_error = load_error.clone();
        use_effect_with((), move |_| match read_records_from_csv_string(SCHEDULE_CSV) {
            Ok(loaded) => records.set(Some(loaded.into())),
            Err(e) => {
                error!("Failed to load schedule: {}", e);
                load_error.set(Some(e.to_string()));
            }
        });
    }

    let dispatch = {
        let dispatcher = filters.dispatcher();
        Callback::from(move |action: FilterAction| dispatcher.dispatch(action))
    };

    let facets = use_facets((*records).clone());
    let forecast_months = use_forecast_months((*records).clone(), filters.forecast_year.clone());

    // Reconcile the stage selection whenever the derived stage list changes
    {
        let dispatch = dispatch.clone();
        use_effect_with(facets.stages.clone(), move |stages| {
            dispatch.emit(FilterAction::StagesLoaded(stages.clone()));
            || ()
        });
    }

    let filtered = use_debounced_filter((*records).clone(), (*filters).clone());

    let on_toggle_charts = {
        let show_charts = show_charts.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            show_charts.set(input.checked());
        })
    };

    let store_len = (*records).as_ref().map_or(0, |r| r.len());

    html! {
        <div class="container">
            <h1>{ "Production Schedule" }</h1>
            if let Some(err) = &*load_error {
                <div class="current-error">{ format!("Could not load schedule: {}", err) }</div>
            }
            <FilterPanel
                facets={facets.clone()}
                forecast_months={forecast_months.clone()}
                filters={(*filters).clone()}
                dispatch={dispatch.clone()}
            />
            <div class="results-header">
                <span>{ format!("{} of {} records", filtered.records.len(), store_len) }</span>
                if filtered.failed > 0 {
                    <span class="input-error">
                        { format!("{} records could not be evaluated", filtered.failed) }
                    </span>
                }
                <label class="checkbox-group">
                    <input type="checkbox" checked={*show_charts} onchange={on_toggle_charts} />
                    { "Show charts" }
                </label>
            </div>
            <ScheduleSummary records={filtered.records.clone()} />
            if *show_charts {
                <ForecastYearBreakdown records={filtered.records.clone()} />
            }
            <div class="results-area">
                <LoadingOverlay is_loading={filtered.is_filtering} message="Filtering records..." />
                <ScheduleTable records={filtered.records.clone()} />
            </div>
        </div>
    }
}

/// Entry point: installs the panic hook and renders the dashboard.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<Dashboard>::new().render();
}
