//! JavaScript interop for Chart.js visualization.
//! Provides Rust bindings to chart helper functions defined in chart_helpers.js.

use schedule_dashboard::PieSlice;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen(module = "/chart_helpers.js")]
extern "C" {
    #[wasm_bindgen(js_name = renderPieChart)]
    fn render_pie_chart_js(
        canvas_id: &str,
        labels: JsValue,
        values: JsValue,
        on_click: &js_sys::Function,
    );

    #[wasm_bindgen(js_name = destroyChart)]
    pub fn destroy_chart(canvas_id: &str);
}

/// Draw `slices` as a pie on the canvas with id `canvas_id`.
///
/// `on_click` receives the index of the clicked slice and must stay alive
/// for as long as the chart is shown.
pub fn render_pie_chart(canvas_id: &str, slices: &[PieSlice], on_click: &Closure<dyn FnMut(usize)>) {
    let labels: Vec<String> = slices
        .iter()
        .map(|s| format!("{} ({}%)", s.label, s.percent))
        .collect();
    let values: Vec<usize> = slices.iter().map(|s| s.count).collect();

    render_pie_chart_js(
        canvas_id,
        serde_wasm_bindgen::to_value(&labels).unwrap_or(JsValue::NULL),
        serde_wasm_bindgen::to_value(&values).unwrap_or(JsValue::NULL),
        on_click.as_ref().unchecked_ref(),
    );
}
