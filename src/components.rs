//! Yew view components for the schedule dashboard.
//!
//! Components receive already-filtered records; none of them filter on
//! their own.

use crate::chart::{destroy_chart, render_pie_chart};
use schedule_dashboard::config::{
    ALL_DEALERS, DRILLDOWN_LIMIT, TABLE_COLUMNS, TABLE_PAGE_SIZE, YEAR_CHART_CANVAS,
};
use schedule_dashboard::utils::{format_year_month, option_label};
use schedule_dashboard::{
    chassis_summary, count_by_dealer, drill_down, forecast_year_breakdown, year_chassis_slices,
    ChassisPresence, Facets, FilterAction, FilterState, Milestone, Record,
};
use std::rc::Rc;
use wasm_bindgen::prelude::Closure;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

fn milestone_label(milestone: Milestone) -> &'static str {
    match milestone {
        Milestone::OrderSentToLongtree => "Order Sent to Longtree:",
        Milestone::PlansSentToDealer => "Plans Sent to Dealer:",
        Milestone::SignedPlansReceived => "Signed Plans Received:",
    }
}

/// Renders one dropdown. `format` turns option values into display text.
fn render_select(
    id: &str,
    label: &str,
    options: &[String],
    selected: &str,
    format: impl Fn(&str) -> String,
    onchange: Callback<String>,
) -> Html {
    let onchange = Callback::from(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        onchange.emit(select.value());
    });

    html! {
        <div class="form-group">
            <label for={id.to_string()}>{ label }</label>
            <select id={id.to_string()} {onchange}>
                { options.iter().map(|value| html! {
                    <option value={value.clone()} selected={value == selected}>
                        { format(value.as_str()) }
                    </option>
                }).collect::<Html>() }
            </select>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct FilterPanelProps {
    pub facets: Rc<Facets>,
    pub forecast_months: Rc<Vec<String>>,
    pub filters: FilterState,
    pub dispatch: Callback<FilterAction>,
}

/// Dropdowns and stage checkboxes driving the filter state.
#[function_component(FilterPanel)]
pub fn filter_panel(props: &FilterPanelProps) -> Html {
    let facets = &props.facets;
    let filters = &props.filters;
    let send = |make: fn(String) -> FilterAction| props.dispatch.reform(make);

    let all_stages = facets.stages.clone();
    let on_toggle_all = {
        let dispatch = props.dispatch.clone();
        let all = all_stages.clone();
        Callback::from(move |_: Event| dispatch.emit(FilterAction::ToggleAllStages(all.clone())))
    };
    let on_reset = {
        let all = all_stages.clone();
        props
            .dispatch
            .reform(move |_: MouseEvent| FilterAction::Reset(all.clone()))
    };

    html! {
        <div class="filters">
            <h2>{ "Filters" }</h2>
            <div class="form-row">
                { render_select("dealer", "Dealer:", &facets.dealers, &filters.dealer,
                    |v| if v == ALL_DEALERS { "All Dealers".to_string() } else { v.to_string() },
                    send(FilterAction::SetDealer)) }
                { render_select("model", "Model:", &facets.models, &filters.model,
                    |v| option_label(v, "All Models"), send(FilterAction::SetModel)) }
                { render_select("model_year", "Model Year:", &facets.model_years, &filters.model_year,
                    |v| option_label(v, "All Years"), send(FilterAction::SetModelYear)) }
                { render_select("model_range", "Model Range:", &facets.model_ranges, &filters.model_range,
                    |v| option_label(v, "All Ranges"), send(FilterAction::SetModelRange)) }
            </div>
            <div class="form-row">
                { render_select("forecast_year", "Forecast Year:", &facets.forecast_years, &filters.forecast_year,
                    |v| option_label(v, "All Years"), send(FilterAction::SetForecastYear)) }
                if !filters.forecast_year.is_empty() {
                    { render_select("forecast_month", "Forecast Month:", &props.forecast_months,
                        &filters.forecast_year_month, format_year_month,
                        send(FilterAction::SetForecastYearMonth)) }
                }
                { Milestone::ALL.iter().map(|&milestone| {
                    let options = facets.milestone_year_months.get(&milestone).cloned().unwrap_or_default();
                    let dispatch = props.dispatch.clone();
                    render_select(
                        milestone.element_id(),
                        milestone_label(milestone),
                        &options,
                        filters.milestone(milestone),
                        format_year_month,
                        Callback::from(move |v: String| dispatch.emit(FilterAction::SetMilestone(milestone, v))),
                    )
                }).collect::<Html>() }
            </div>
            <div class="stage-filter">
                <label>
                    <input type="checkbox" checked={filters.all_stages_selected} onchange={on_toggle_all} />
                    { "All Stages" }
                </label>
                { all_stages.iter().map(|stage| {
                    let dispatch = props.dispatch.clone();
                    let all = all_stages.clone();
                    let name = stage.clone();
                    let onchange = {
                        let dispatch = dispatch.clone();
                        let all = all.clone();
                        let name = name.clone();
                        Callback::from(move |_: Event| {
                            dispatch.emit(FilterAction::ToggleStage { stage: name.clone(), all: all.clone() });
                        })
                    };
                    let only = Callback::from(move |_: MouseEvent| {
                        dispatch.emit(FilterAction::SelectStages { stages: vec![name.clone()], all: all.clone() });
                    });
                    html! {
                        <label>
                            <input type="checkbox" checked={filters.selected_stages.contains(stage)} {onchange} />
                            { stage }
                            <button class="link small" onclick={only}>{ "only" }</button>
                        </label>
                    }
                }).collect::<Html>() }
            </div>
            <button class="btn-secondary small"
                onclick={on_reset}>
                { format!("Clear Filters ({} active)", filters.active_filter_count()) }
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ScheduleTableProps {
    pub records: Rc<Vec<Record>>,
}

/// Renders the filtered records, one page at a time.
#[function_component(ScheduleTable)]
pub fn schedule_table(props: &ScheduleTableProps) -> Html {
    let page = use_state(|| 0usize);
    let total = props.records.len();
    let page_count = total.div_ceil(TABLE_PAGE_SIZE).max(1);
    let current = (*page).min(page_count - 1);

    // Back to the first page whenever a new result is published
    {
        let page = page.clone();
        use_effect_with(props.records.clone(), move |_| {
            page.set(0);
            || ()
        });
    }

    if total == 0 {
        return html! {
            <div class="results">
                <p class="no-results-message">{ "No records match the current filters" }</p>
            </div>
        };
    }

    let start = current * TABLE_PAGE_SIZE;
    let end = (start + TABLE_PAGE_SIZE).min(total);

    let go_to = |target: usize| {
        let page = page.clone();
        Callback::from(move |_: MouseEvent| page.set(target))
    };

    html! {
        <div class="results">
            <div class="big-table-container">
                <table class="schedule-table">
                    <thead>
                        <tr>
                            { TABLE_COLUMNS.iter().map(|c| html! { <th>{ *c }</th> }).collect::<Html>() }
                        </tr>
                    </thead>
                    <tbody>
                        { props.records[start..end].iter().map(render_record_row).collect::<Html>() }
                    </tbody>
                </table>
            </div>
            <div class="pager">
                <button disabled={current == 0} onclick={go_to(current.saturating_sub(1))}>{ "Previous" }</button>
                <span>{ format!("Showing {}-{} of {}", start + 1, end, total) }</span>
                <button disabled={current + 1 >= page_count} onclick={go_to(current + 1)}>{ "Next" }</button>
            </div>
        </div>
    }
}

fn render_record_row(record: &Record) -> Html {
    html! {
        <tr>
            { TABLE_COLUMNS.iter().map(|field| {
                html! { <td>{ record.text(field).unwrap_or_default().into_owned() }</td> }
            }).collect::<Html>() }
        </tr>
    }
}

#[derive(Properties, PartialEq)]
pub struct ForecastYearBreakdownProps {
    pub records: Rc<Vec<Record>>,
}

/// Pie chart of forecast year by chassis presence. Clicking a "no chassis"
/// slice lists the dealers behind it.
#[function_component(ForecastYearBreakdown)]
pub fn forecast_year_breakdown_chart(props: &ForecastYearBreakdownProps) -> Html {
    let buckets = use_memo(props.records.clone(), |records| forecast_year_breakdown(records));
    let slices = use_memo(buckets.clone(), |buckets| year_chassis_slices(buckets));
    let selected = use_state(|| None::<usize>);

    {
        let selected = selected.clone();
        use_effect_with(slices.clone(), move |slices| {
            selected.set(None);
            let on_click = Closure::wrap(Box::new(move |idx: usize| selected.set(Some(idx)))
                as Box<dyn FnMut(usize)>);
            render_pie_chart(YEAR_CHART_CANVAS, slices, &on_click);
            // The chart calls back into `on_click` until it is destroyed
            move || {
                destroy_chart(YEAR_CHART_CANVAS);
                drop(on_click);
            }
        });
    }

    let details = (*selected)
        .and_then(|idx| slices.get(idx))
        .map(|slice| {
            if slice.presence != ChassisPresence::NoChassis {
                return html! {
                    <p>{ format!("{}: {} records", slice.label, slice.count) }</p>
                };
            }
            let drill = buckets
                .iter()
                .find(|b| b.year == slice.year)
                .map(|b| b.drill_down())
                .unwrap_or_else(|| drill_down(&[], 0));
            html! {
                <div class="drill-down">
                    <strong>{ format!("{}: {} records", slice.label, slice.count) }</strong>
                    <div>{ "No Chassis Dealers:" }</div>
                    <ul>
                        { drill.dealers.iter().map(|d| html! {
                            <li>{ format!("{} ({})", d.dealer, d.count) }</li>
                        }).collect::<Html>() }
                    </ul>
                    if let Some(more) = drill.overflow_label() {
                        <div>{ more }</div>
                    }
                </div>
            }
        })
        .unwrap_or_default();

    html! {
        <div class="chart-section">
            <h3>{ "Forecast Production by Year" }</h3>
            if slices.is_empty() {
                <p class="no-results-message">{ "No dated records to chart" }</p>
            }
            <canvas id={YEAR_CHART_CANVAS}></canvas>
            { details }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ScheduleSummaryProps {
    pub records: Rc<Vec<Record>>,
}

/// Headline totals: records with and without a chassis, and the busiest
/// dealers.
#[function_component(ScheduleSummary)]
pub fn schedule_summary(props: &ScheduleSummaryProps) -> Html {
    let summary = chassis_summary(&props.records);
    let dealers = count_by_dealer(&props.records);
    let top = drill_down(&dealers, DRILLDOWN_LIMIT);

    html! {
        <div class="summary">
            <div class="summary-card">{ format!("Total: {}", summary.total()) }</div>
            <div class="summary-card">{ format!("With Chassis: {}", summary.with_chassis) }</div>
            <div class="summary-card">{ format!("No Chassis: {}", summary.no_chassis) }</div>
            <ul class="dealer-counts">
                { top.dealers.iter().map(|d| html! {
                    <li>{ format!("{}: {}", d.dealer, d.count) }</li>
                }).collect::<Html>() }
            </ul>
            if let Some(more) = top.overflow_label() {
                <div>{ more }</div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LoadingOverlayProps {
    pub is_loading: bool,
    pub message: AttrValue,
}

#[function_component(LoadingOverlay)]
pub fn loading_overlay(props: &LoadingOverlayProps) -> Html {
    if !props.is_loading {
        return html! {};
    }
    html! {
        <div class="loading-overlay">
            <div class="spinner"></div>
            <p>{ props.message.clone() }</p>
        </div>
    }
}
