//! Application-level configuration constants.

// Filter pipeline
pub const DEBOUNCE_MS: u32 = 300;
pub const BUSY_INDICATOR_THRESHOLD: usize = 100;

// Record field names
pub const FIELD_DEALER: &str = "Dealer";
pub const FIELD_MODEL: &str = "Model";
pub const FIELD_MODEL_YEAR: &str = "Model Year";
pub const FIELD_CHASSIS: &str = "Chassis";
pub const FIELD_FORECAST_DATE: &str = "Forecast Production Date";
pub const FIELD_REGENT_PRODUCTION: &str = "Regent Production";

// Facet sentinels and synthetic labels
pub const ALL_DEALERS: &str = "all";
pub const FINISHED_STAGE: &str = "finished";
pub const SEA_FREIGHTING_STAGE: &str = "Sea Freighting";
pub const UNKNOWN_DEALER: &str = "Unknown";
pub const MODEL_RANGE_LEN: usize = 3;

// Years that are never offered in the forecast year dropdown
pub const HIDDEN_FORECAST_YEARS: &[&str] = &["2024"];

// Chart drill-down
pub const DRILLDOWN_LIMIT: usize = 10;

// UI
pub const TABLE_PAGE_SIZE: usize = 50;
pub const YEAR_CHART_CANVAS: &str = "forecastYearChart";

// Columns of the schedule table, in display order
pub const TABLE_COLUMNS: &[&str] = &[
    FIELD_CHASSIS,
    FIELD_DEALER,
    FIELD_MODEL,
    FIELD_MODEL_YEAR,
    FIELD_FORECAST_DATE,
    FIELD_REGENT_PRODUCTION,
    "Order Sent to Longtree",
    "Plans Sent to Dealer",
    "Signed Plans Received",
];
