use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

/// The fixed set of locations the dashboard knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum City {
    Karachi,
    Lahore,
    Islamabad,
    Rawalpindi,
    Faisalabad,
    Hyderabad,
    Multan,
    Peshawar,
    Quetta,
    Sialkot,
    Bahawalpur,
    Sargodha,
    Gujranwala,
    Abbottabad,
    Mirpur,
}

impl City {
    pub fn as_str(&self) -> &'static str {
        match self {
            City::Karachi => "Karachi",
            City::Lahore => "Lahore",
            City::Islamabad => "Islamabad",
            City::Rawalpindi => "Rawalpindi",
            City::Faisalabad => "Faisalabad",
            City::Hyderabad => "Hyderabad",
            City::Multan => "Multan",
            City::Peshawar => "Peshawar",
            City::Quetta => "Quetta",
            City::Sialkot => "Sialkot",
            City::Bahawalpur => "Bahawalpur",
            City::Sargodha => "Sargodha",
            City::Gujranwala => "Gujranwala",
            City::Abbottabad => "Abbottabad",
            City::Mirpur => "Mirpur",
        }
    }

    /// All cities in dashboard order.
    pub const fn all() -> &'static [City] {
        &[
            City::Karachi,
            City::Lahore,
            City::Islamabad,
            City::Rawalpindi,
            City::Faisalabad,
            City::Hyderabad,
            City::Multan,
            City::Peshawar,
            City::Quetta,
            City::Sialkot,
            City::Bahawalpur,
            City::Sargodha,
            City::Gujranwala,
            City::Abbottabad,
            City::Mirpur,
        ]
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for City {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();

        City::all()
            .iter()
            .copied()
            .find(|city| city.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                let supported: Vec<&str> = City::all().iter().map(City::as_str).collect();
                anyhow::anyhow!(
                    "Unknown city '{value}'. Supported cities: {}.",
                    supported.join(", ")
                )
            })
    }
}

impl std::str::FromStr for City {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::try_from(s)
    }
}

/// Which of the two fetched days a view refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Day {
    Today,
    Yesterday,
}

impl Day {
    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Today => "Today",
            Day::Yesterday => "Yesterday",
        }
    }

    /// Turn the relative day into a calendar date, counting from `today`.
    pub fn resolve(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Day::Today => Some(today),
            Day::Yesterday => today.pred_opt(),
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column of the working table used by comparison views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Humidity,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temp (°C)",
            Metric::Humidity => "Humidity (%)",
        }
    }

    pub fn value_of(&self, observation: &WeatherObservation) -> f64 {
        match self {
            Metric::Temperature => observation.temperature_celsius,
            Metric::Humidity => observation.humidity_percent,
        }
    }
}

/// Provider-level values, before they are pinned to a city and a date.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    pub condition: String,
}

impl Reading {
    pub fn observe(self, city: City, date: NaiveDate) -> WeatherObservation {
        WeatherObservation {
            city,
            date,
            temperature_celsius: self.temperature_celsius,
            humidity_percent: self.humidity_percent,
            condition: self.condition,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub city: City,
    pub date: NaiveDate,
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    pub condition: String,
}

/// The working table: at most one observation per (city, date).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    rows: Vec<WeatherObservation>,
}

impl ObservationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. A row for an existing (city, date) pair is handed back
    /// and the table is left unchanged.
    pub fn insert(&mut self, observation: WeatherObservation) -> Result<(), WeatherObservation> {
        if self.get(observation.city, observation.date).is_some() {
            return Err(observation);
        }
        self.rows.push(observation);
        Ok(())
    }

    pub fn get(&self, city: City, date: NaiveDate) -> Option<&WeatherObservation> {
        self.rows.iter().find(|row| row.city == city && row.date == date)
    }

    pub fn rows(&self) -> &[WeatherObservation] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeatherObservation> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct dates present in the table, oldest first.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.rows.iter().map(|row| row.date).collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }
}

impl FromIterator<WeatherObservation> for ObservationTable {
    fn from_iter<I: IntoIterator<Item = WeatherObservation>>(iter: I) -> Self {
        let mut table = ObservationTable::new();
        for observation in iter {
            if let Err(dup) = table.insert(observation) {
                tracing::warn!(
                    city = %dup.city,
                    date = %dup.date,
                    "dropping duplicate observation"
                );
            }
        }
        table
    }
}

impl<'a> IntoIterator for &'a ObservationTable {
    type Item = &'a WeatherObservation;
    type IntoIter = std::slice::Iter<'a, WeatherObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
