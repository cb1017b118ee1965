//! Render-time views over the working table.

use chrono::NaiveDate;
use std::cmp::Ordering;

use crate::model::{City, Day, Metric, ObservationTable, WeatherObservation};

/// Outcome of a single-city lookup. `NoData` is an ordinary result, not an
/// error: the caller shows a "no data" notice and renders nothing else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'a> {
    Found(&'a WeatherObservation),
    NoData { city: City, day: Day, date: Option<NaiveDate> },
}

impl<'a> Selection<'a> {
    pub fn observation(&self) -> Option<&'a WeatherObservation> {
        match *self {
            Selection::Found(obs) => Some(obs),
            Selection::NoData { .. } => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::NoData { .. })
    }
}

/// Look up `city` on `day`, where `today` is the render-time date.
///
/// If the table was fetched before midnight and is rendered after it, the
/// dates no longer line up and the result is `NoData`.
pub fn select(table: &ObservationTable, city: City, day: Day, today: NaiveDate) -> Selection<'_> {
    let date = day.resolve(today);

    match date.and_then(|date| table.get(city, date)) {
        Some(obs) => Selection::Found(obs),
        None => Selection::NoData { city, day, date },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    pub city: City,
    /// One cell per column of the matrix, `None` where the table has no row.
    pub values: Vec<Option<f64>>,
}

impl PivotRow {
    fn max_value(&self) -> Option<f64> {
        self.values.iter().flatten().copied().fold(None, |acc, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
    }
}

/// City by date matrix of one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotMatrix {
    pub metric: Metric,
    /// Column dates, oldest first.
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<PivotRow>,
}

impl PivotMatrix {
    pub fn cities(&self) -> Vec<City> {
        self.rows.iter().map(|row| row.city).collect()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn row(&self, city: City) -> Option<&PivotRow> {
        self.rows.iter().find(|row| row.city == city)
    }

    pub fn value(&self, city: City, date: NaiveDate) -> Option<f64> {
        let col = self.dates.iter().position(|d| *d == date)?;
        self.row(city)?.values[col]
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Each row scaled by its own largest value, so rows compare by shape.
    /// A row whose largest value is not positive has no meaningful scale and
    /// comes back with every cell missing.
    pub fn normalized(&self) -> PivotMatrix {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let values = match row.max_value() {
                    Some(max) if max > 0.0 => {
                        row.values.iter().map(|v| v.map(|v| v / max)).collect()
                    }
                    _ => vec![None; row.values.len()],
                };
                PivotRow { city: row.city, values }
            })
            .collect();

        PivotMatrix { metric: self.metric, dates: self.dates.clone(), rows }
    }
}

/// Reshape the table into one row per city and one column per date.
///
/// Rows start ordered by city name, then are stably sorted by the most recent
/// column, highest first. Rows with no value in that column go last.
pub fn pivot(table: &ObservationTable, metric: Metric) -> PivotMatrix {
    let dates = table.dates();

    let mut cities: Vec<City> = table.iter().map(|row| row.city).collect();
    cities.sort_by_key(|city| city.as_str());
    cities.dedup();

    let mut rows: Vec<PivotRow> = cities
        .into_iter()
        .map(|city| PivotRow {
            city,
            values: dates
                .iter()
                .map(|date| table.get(city, *date).map(|obs| metric.value_of(obs)))
                .collect(),
        })
        .collect();

    if !dates.is_empty() {
        let last = dates.len() - 1;
        rows.sort_by(|a, b| descending_missing_last(a.values[last], b.values[last]));
    }

    PivotMatrix { metric, dates, rows }
}

fn descending_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
