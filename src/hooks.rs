use gloo_timers::callback::Timeout;
use log::debug;
use schedule_dashboard::{
    extract_facets, forecast_months, Facets, FilterPipeline, FilterState, Record, Schedule,
};
use std::rc::Rc;
use yew::prelude::*;

/// Output of the debounced filter pipeline as seen by the view.
#[derive(Clone, PartialEq)]
pub struct FilteredRecords {
    /// Last published result. Table and charts read only this.
    pub records: Rc<Vec<Record>>,
    /// Records dropped because their evaluation failed.
    pub failed: usize,
    /// Shown while a large store is waiting to be refiltered.
    pub is_filtering: bool,
}

fn now_ms() -> f64 {
    gloo_utils::window()
        .performance()
        .map(|p| p.now())
        .unwrap_or_default()
}

/// Identity of the record store. The store is replaced, never mutated, so a
/// pointer comparison tells whether it changed.
fn store_key(records: &Option<Rc<[Record]>>) -> Option<*const Record> {
    records.as_ref().map(|r| r.as_ptr())
}

/// Refilter `records` whenever the store or `filters` change, waiting for
/// the debounce delay first.
///
/// Each change cancels the previous timer (dropping a `Timeout` clears it)
/// and the pipeline's generation check drops any run that still slips
/// through.
#[hook]
pub fn use_debounced_filter(records: Option<Rc<[Record]>>, filters: FilterState) -> FilteredRecords {
    let pipeline = use_mut_ref(FilterPipeline::default);
    let published = use_state(|| Rc::new(Vec::<Record>::new()));
    let failed = use_state(|| 0usize);
    let is_filtering = use_state(|| false);

    {
        let published = published.clone();
        let failed = failed.clone();
        let is_filtering = is_filtering.clone();
        let records = records.clone();
        use_effect_with((store_key(&records), filters), move |(_, filters)| {
            let schedule = pipeline.borrow_mut().request(records.as_deref());
            let timer = match schedule {
                Schedule::Publish(report) => {
                    published.set(Rc::new(report.records));
                    failed.set(report.failed);
                    is_filtering.set(false);
                    None
                }
                Schedule::Deferred {
                    generation,
                    delay_ms,
                } => {
                    is_filtering.set(pipeline.borrow().is_busy());
                    let filters = filters.clone();
                    Some(Timeout::new(delay_ms, move || {
                        let Some(records) = records else { return };
                        let started = now_ms();
                        let report = pipeline.borrow_mut().run(generation, &records, &filters);
                        if let Some(report) = report {
                            debug!(
                                "Published {} of {} records in {:.1} ms",
                                report.records.len(),
                                records.len(),
                                now_ms() - started
                            );
                            published.set(Rc::new(report.records));
                            failed.set(report.failed);
                            is_filtering.set(false);
                        }
                    }))
                }
            };
            move || drop(timer)
        });
    }

    FilteredRecords {
        records: (*published).clone(),
        failed: *failed,
        is_filtering: *is_filtering,
    }
}

/// Facets of the full store, recomputed only when the store is replaced.
#[hook]
pub fn use_facets(records: Option<Rc<[Record]>>) -> Rc<Facets> {
    let key = store_key(&records);
    use_memo(key, move |_| {
        records
            .as_deref()
            .map(extract_facets)
            .unwrap_or_default()
    })
}

/// Month options for the picked forecast year.
#[hook]
pub fn use_forecast_months(records: Option<Rc<[Record]>>, year: String) -> Rc<Vec<String>> {
    let key = (store_key(&records), year);
    use_memo(key, move |(_, year)| {
        records
            .as_deref()
            .map(|r| forecast_months(r, year))
            .unwrap_or_default()
    })
}
