//! Plain-text rendering of dashboard views.

use std::fmt::Write;

use pakweather_core::{
    ConditionCategory, HumidityBand, Metric, PivotMatrix, Selection, TemperatureBand,
};

const CITY_WIDTH: usize = 12;
const CELL_WIDTH: usize = 12;

/// Single-city card, or the "no data" notice.
pub fn card(selection: &Selection<'_>) -> String {
    let obs = match selection {
        Selection::Found(obs) => *obs,
        Selection::NoData { city, day, .. } => {
            return format!("warning: No weather data available for {city} on {day}");
        }
    };

    let temp = TemperatureBand::from_celsius(obs.temperature_celsius);
    let humidity = HumidityBand::from_percent(obs.humidity_percent);
    let condition = ConditionCategory::classify(&obs.condition);

    let mut out = String::new();
    let _ = writeln!(out, "Weather details for {} ({})", obs.city, obs.date.format("%Y-%m-%d"));
    let _ = writeln!(
        out,
        "  {:<12}{:>8.1} °C   [{}]",
        "Temperature",
        obs.temperature_celsius,
        temp.as_str()
    );
    let _ = writeln!(
        out,
        "  {:<12}{:>8.0} %    [{}]",
        "Humidity",
        obs.humidity_percent,
        humidity.as_str()
    );
    let _ = write!(out, "  {:<12}{:>8}      [{}]", "Condition", obs.condition, condition.as_str());
    out
}

fn title(metric: Metric, relative: bool) -> &'static str {
    match (metric, relative) {
        (Metric::Temperature, false) => "Temperature Trends Across Cities",
        (Metric::Humidity, false) => "Humidity Patterns Across Cities",
        (Metric::Temperature, true) => "Relative Temperature Comparison",
        (Metric::Humidity, true) => "Relative Humidity Comparison",
    }
}

/// City by date table. Missing cells print as `-`.
pub fn matrix(matrix: &PivotMatrix, relative: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} | {}", title(matrix.metric, relative), matrix.metric.label());

    if matrix.is_empty() {
        let _ = writeln!(out, "  no data available");
        return out;
    }

    let _ = write!(out, "{:<CITY_WIDTH$}", "City");
    for date in &matrix.dates {
        let _ = write!(out, "{:>CELL_WIDTH$}", date.format("%Y-%m-%d").to_string());
    }
    out.push('\n');

    for row in &matrix.rows {
        let _ = write!(out, "{:<CITY_WIDTH$}", row.city.as_str());
        for value in &row.values {
            let cell = match (value, relative) {
                (Some(v), false) => format!("{v:.1}"),
                (Some(v), true) => format!("{v:.2}"),
                (None, _) => "-".to_string(),
            };
            let _ = write!(out, "{cell:>CELL_WIDTH$}");
        }
        out.push('\n');
    }

    out
}
