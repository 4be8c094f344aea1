//! Category counts backing the dashboard charts.

use crate::config::*;
use crate::record::{Record, ScheduleDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChassisPresence {
    WithChassis,
    NoChassis,
}

impl ChassisPresence {
    /// A chassis counts as present when it is non-empty after trimming.
    pub fn of(record: &Record) -> Self {
        if record.non_empty(FIELD_CHASSIS).is_some() {
            ChassisPresence::WithChassis
        } else {
            ChassisPresence::NoChassis
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChassisPresence::WithChassis => "With Chassis",
            ChassisPresence::NoChassis => "No Chassis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealerCount {
    pub dealer: String,
    pub count: usize,
}

/// Largest count first, ties by dealer name.
fn sorted_dealer_counts(counts: BTreeMap<String, usize>) -> Vec<DealerCount> {
    let mut out: Vec<DealerCount> = counts
        .into_iter()
        .map(|(dealer, count)| DealerCount { dealer, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.dealer.cmp(&b.dealer)));
    out
}

fn dealer_of(record: &Record) -> String {
    record
        .non_empty(FIELD_DEALER)
        .map(|d| d.into_owned())
        .unwrap_or_else(|| UNKNOWN_DEALER.to_string())
}

/// Records sharing one forecast year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBucket {
    pub year: String,
    pub total: usize,
    pub with_chassis: usize,
    pub no_chassis: usize,
    /// Dealers owning the records that have no chassis yet.
    pub no_chassis_dealers: Vec<DealerCount>,
}

impl YearBucket {
    pub fn count(&self, presence: ChassisPresence) -> usize {
        match presence {
            ChassisPresence::WithChassis => self.with_chassis,
            ChassisPresence::NoChassis => self.no_chassis,
        }
    }

    pub fn drill_down(&self) -> DrillDown {
        drill_down(&self.no_chassis_dealers, DRILLDOWN_LIMIT)
    }
}

/// Group records by forecast year and chassis presence.
///
/// Records whose forecast date is missing or malformed fall outside every
/// bucket. Buckets come back in ascending year order.
pub fn forecast_year_breakdown(records: &[Record]) -> Vec<YearBucket> {
    #[derive(Default)]
    struct Tally {
        with_chassis: usize,
        no_chassis: usize,
        dealers: BTreeMap<String, usize>,
    }

    let mut by_year: BTreeMap<String, Tally> = BTreeMap::new();
    let mut undated = 0;

    for record in records {
        let raw = record.text(FIELD_FORECAST_DATE);
        let Some(date) = raw.as_deref().and_then(ScheduleDate::parse) else {
            undated += 1;
            continue;
        };

        let tally = by_year.entry(date.year.to_string()).or_default();
        match ChassisPresence::of(record) {
            ChassisPresence::WithChassis => tally.with_chassis += 1,
            ChassisPresence::NoChassis => {
                tally.no_chassis += 1;
                *tally.dealers.entry(dealer_of(record)).or_insert(0) += 1;
            }
        }
    }

    if undated > 0 {
        debug!("{} records without a usable forecast date left out of year buckets", undated);
    }

    by_year
        .into_iter()
        .map(|(year, tally)| YearBucket {
            year,
            total: tally.with_chassis + tally.no_chassis,
            with_chassis: tally.with_chassis,
            no_chassis: tally.no_chassis,
            no_chassis_dealers: sorted_dealer_counts(tally.dealers),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChassisSummary {
    pub with_chassis: usize,
    pub no_chassis: usize,
}

impl ChassisSummary {
    pub fn total(&self) -> usize {
        self.with_chassis + self.no_chassis
    }
}

/// With/without chassis totals over every record, dated or not.
pub fn chassis_summary(records: &[Record]) -> ChassisSummary {
    records
        .iter()
        .fold(ChassisSummary::default(), |mut acc, r| {
            match ChassisPresence::of(r) {
                ChassisPresence::WithChassis => acc.with_chassis += 1,
                ChassisPresence::NoChassis => acc.no_chassis += 1,
            }
            acc
        })
}

/// Record count per dealer, largest first.
pub fn count_by_dealer(records: &[Record]) -> Vec<DealerCount> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(dealer_of(record)).or_insert(0) += 1;
    }
    sorted_dealer_counts(counts)
}

/// `count / total` as a whole percentage, rounded to nearest.
pub fn percent_of(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

/// One pie slice: a (year, chassis presence) category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub year: String,
    pub presence: ChassisPresence,
    pub count: usize,
    pub percent: u32,
}

/// Flatten year buckets into labelled slices, skipping empty categories.
pub fn year_chassis_slices(buckets: &[YearBucket]) -> Vec<PieSlice> {
    let total: usize = buckets.iter().map(|b| b.total).sum();
    buckets
        .iter()
        .flat_map(|bucket| {
            [ChassisPresence::WithChassis, ChassisPresence::NoChassis]
                .into_iter()
                .map(move |presence| (bucket, presence))
        })
        .filter(|(bucket, presence)| bucket.count(*presence) > 0)
        .map(|(bucket, presence)| {
            let count = bucket.count(presence);
            PieSlice {
                label: format!("{} - {}", bucket.year, presence.label()),
                year: bucket.year.clone(),
                presence,
                count,
                percent: percent_of(count, total),
            }
        })
        .collect()
}

/// A capped dealer list for a clicked "no chassis" slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillDown {
    pub dealers: Vec<DealerCount>,
    /// Dealers left out of `dealers`.
    pub remaining: usize,
}

impl DrillDown {
    pub fn overflow_label(&self) -> Option<String> {
        (self.remaining > 0).then(|| format!("...and {} more", self.remaining))
    }
}

pub fn drill_down(dealers: &[DealerCount], limit: usize) -> DrillDown {
    let shown = dealers.len().min(limit);
    DrillDown {
        dealers: dealers[..shown].to_vec(),
        remaining: dealers.len() - shown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(date: &str, chassis: &str, dealer: Option<&str>) -> Record {
        let record = Record::new()
            .with("Forecast Production Date", date)
            .with("Chassis", chassis);
        match dealer {
            Some(d) => record.with("Dealer", d),
            None => record,
        }
    }

    #[test]
    fn year_bucket_counts_both_presences() {
        let records = vec![
            dated("1/1/2025", "", None),
            dated("1/1/2025", "AB123", None),
        ];
        let buckets = forecast_year_breakdown(&records);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].year, "2025");
        assert_eq!(buckets[0].total, 2);
        let breakdown_total: usize = buckets[0].no_chassis_dealers.iter().map(|d| d.count).sum();
        assert_eq!(breakdown_total, 1);
        assert_eq!(buckets[0].no_chassis_dealers[0].dealer, UNKNOWN_DEALER);
    }

    #[test]
    fn sparse_dates_still_land_in_their_year() {
        let buckets = forecast_year_breakdown(&[dated("1//2025", "", Some("Acme"))]);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].year, "2025");
        assert_eq!(buckets[0].no_chassis, 1);
    }

    #[test]
    fn malformed_dates_fall_outside_buckets() {
        let records = vec![
            dated("bad-date", "", Some("Acme")),
            Record::new().with("Dealer", "Acme"),
            dated("01/02/2026", "  ", Some("Acme")),
            dated("01/02/2025", "X1", Some("Beta")),
        ];
        let buckets = forecast_year_breakdown(&records);
        let years: Vec<&str> = buckets.iter().map(|b| b.year.as_str()).collect();
        assert_eq!(years, vec!["2025", "2026"]);
        assert_eq!(buckets[1].no_chassis, 1);
        assert!(buckets[0].no_chassis_dealers.is_empty());
    }

    #[test]
    fn no_chassis_dealers_sorted_by_count() {
        let records = vec![
            dated("01/01/2025", "", Some("Zeta")),
            dated("01/01/2025", "", Some("Beta")),
            dated("01/01/2025", "", Some("Zeta")),
            dated("01/01/2025", "", Some("Acme")),
        ];
        let dealers: Vec<(String, usize)> = forecast_year_breakdown(&records)[0]
            .no_chassis_dealers
            .iter()
            .map(|d| (d.dealer.clone(), d.count))
            .collect();
        assert_eq!(
            dealers,
            vec![
                ("Zeta".to_string(), 2),
                ("Acme".to_string(), 1),
                ("Beta".to_string(), 1)
            ]
        );
    }

    #[test]
    fn slices_carry_rounded_percentages() {
        let records = vec![
            dated("01/01/2025", "", None),
            dated("01/01/2025", "A", None),
            dated("01/01/2026", "B", None),
        ];
        let slices = year_chassis_slices(&forecast_year_breakdown(&records));
        let summary: Vec<(&str, usize, u32)> = slices
            .iter()
            .map(|s| (s.label.as_str(), s.count, s.percent))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("2025 - With Chassis", 1, 33),
                ("2025 - No Chassis", 1, 33),
                ("2026 - With Chassis", 1, 33),
            ]
        );
    }

    #[test]
    fn percent_of_handles_empty_total() {
        assert_eq!(percent_of(0, 0), 0);
        assert_eq!(percent_of(1, 8), 13);
        assert_eq!(percent_of(2, 3), 67);
    }

    #[test]
    fn drill_down_caps_the_list() {
        let dealers: Vec<DealerCount> = (0..13)
            .map(|i| DealerCount {
                dealer: format!("Dealer {:02}", i),
                count: 1,
            })
            .collect();
        let drill = drill_down(&dealers, DRILLDOWN_LIMIT);
        assert_eq!(drill.dealers.len(), 10);
        assert_eq!(drill.overflow_label().as_deref(), Some("...and 3 more"));

        let short = drill_down(&dealers[..4], DRILLDOWN_LIMIT);
        assert_eq!(short.remaining, 0);
        assert_eq!(short.overflow_label(), None);
    }

    #[test]
    fn chassis_and_dealer_totals() {
        let records = vec![
            dated("bad", "", Some("Acme")),
            dated("01/01/2025", "C1", Some("Acme")),
            dated("01/01/2025", "", Some("Beta")),
        ];
        let summary = chassis_summary(&records);
        assert_eq!(summary.with_chassis, 1);
        assert_eq!(summary.no_chassis, 2);
        assert_eq!(summary.total(), 3);

        let by_dealer = count_by_dealer(&records);
        assert_eq!(by_dealer[0], DealerCount { dealer: "Acme".into(), count: 2 });
        assert_eq!(by_dealer[1].dealer, "Beta");
    }
}
