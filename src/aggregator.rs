use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::{DaySummary, ForecastPeriod};

/// Day label in the form "Mon Oct 19 2026"
pub fn day_label(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

#[derive(Debug)]
struct DayBucket {
    label: String,
    date: NaiveDate,
    temps: Vec<i32>,
    pops: Vec<i32>,
    winds: Vec<String>,
}

impl DayBucket {
    fn new(label: String, date: NaiveDate) -> Self {
        Self {
            label,
            date,
            temps: Vec::new(),
            pops: Vec::new(),
            winds: Vec::new(),
        }
    }

    fn push(&mut self, period: &ForecastPeriod) {
        if let Some(temperature) = period.temperature {
            self.temps.push(temperature);
        }
        if let Some(pop) = period.pop() {
            self.pops.push(pop);
        }
        if !period.wind_speed.is_empty() {
            self.winds.push(period.wind_speed.clone());
        }
    }

    fn summarize(self) -> DaySummary {
        DaySummary {
            max_temp: self.temps.iter().copied().max(),
            min_temp: self.temps.iter().copied().min(),
            max_pop: self.pops.iter().copied().max().unwrap_or(0),
            representative_wind: self.winds.into_iter().next(),
            label: self.label,
            date: self.date,
        }
    }
}

/// Groups periods by the calendar day of their start time and reduces each day.
///
/// Days come out in the order they are first seen in `periods`, not sorted.
/// The date is taken in the offset the service reported, i.e. the forecast
/// location's local time.
pub fn aggregate(periods: &[ForecastPeriod]) -> Vec<DaySummary> {
    let mut buckets: Vec<DayBucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for period in periods {
        let date = period.start_time.date_naive();
        let label = day_label(date);
        let slot = *index.entry(label.clone()).or_insert_with(|| {
            buckets.push(DayBucket::new(label, date));
            buckets.len() - 1
        });
        buckets[slot].push(period);
    }

    tracing::debug!(
        "Aggregated {} periods into {} days",
        periods.len(),
        buckets.len()
    );

    buckets.into_iter().map(DayBucket::summarize).collect()
}
