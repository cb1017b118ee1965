//! One fetch cycle: two provider calls per city, folded into the working table.
//!
//! Provider failures stop here. Each city carries its own pair of outcomes, and
//! an omitted observation is simply absent from the table.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::{
    cache::TableSource,
    clock::Clock,
    model::{City, Day, ObservationTable, Reading},
    provider::{Omission, ProviderResult, WeatherProvider},
};

#[derive(Debug, Clone, PartialEq)]
pub struct CityOutcome {
    pub city: City,
    pub today: ProviderResult,
    pub yesterday: ProviderResult,
}

impl CityOutcome {
    pub fn outcome(&self, day: Day) -> &ProviderResult {
        match day {
            Day::Today => &self.today,
            Day::Yesterday => &self.yesterday,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    pub today: NaiveDate,
    pub yesterday: Option<NaiveDate>,
    pub outcomes: Vec<CityOutcome>,
}

impl FetchReport {
    pub fn outcome_for(&self, city: City) -> Option<&CityOutcome> {
        self.outcomes.iter().find(|o| o.city == city)
    }

    /// Every observation that did not make it into the table, with the reason.
    pub fn omissions(&self) -> Vec<(City, Day, &Omission)> {
        let mut out = Vec::new();
        for outcome in &self.outcomes {
            for day in [Day::Today, Day::Yesterday] {
                if let Err(reason) = outcome.outcome(day) {
                    out.push((outcome.city, day, reason));
                }
            }
        }
        out
    }

    /// Today rows first within each city, cities in fetch order.
    pub fn table(&self) -> ObservationTable {
        let mut rows = Vec::with_capacity(self.outcomes.len() * 2);
        for outcome in &self.outcomes {
            if let Ok(reading) = &outcome.today {
                rows.push(reading.clone().observe(outcome.city, self.today));
            }
            if let (Ok(reading), Some(date)) = (&outcome.yesterday, self.yesterday) {
                rows.push(reading.clone().observe(outcome.city, date));
            }
        }
        rows.into_iter().collect()
    }
}

/// Run one fetch cycle and keep the per-city outcomes.
///
/// `today` is the fetch-time local date; the history request asks for the day
/// before it. Repeated cities are fetched once.
pub async fn fetch_report(
    provider: &dyn WeatherProvider,
    cities: &[City],
    today: NaiveDate,
) -> FetchReport {
    let yesterday = Day::Yesterday.resolve(today);
    let mut outcomes: Vec<CityOutcome> = Vec::with_capacity(cities.len());

    for &city in cities {
        if outcomes.iter().any(|o| o.city == city) {
            tracing::debug!(%city, "city listed twice, skipping repeat");
            continue;
        }

        let (today_res, yesterday_res) = tokio::join!(provider.current(city), async {
            match yesterday {
                Some(date) => provider.history(city, date).await,
                None => Err(Omission::MalformedResponse(format!("no calendar day before {today}"))),
            }
        });

        log_outcome(city, Day::Today, &today_res);
        log_outcome(city, Day::Yesterday, &yesterday_res);

        outcomes.push(CityOutcome { city, today: today_res, yesterday: yesterday_res });
    }

    FetchReport { today, yesterday, outcomes }
}

/// Run one fetch cycle and return only the working table.
pub async fn fetch_all(
    provider: &dyn WeatherProvider,
    cities: &[City],
    today: NaiveDate,
) -> ObservationTable {
    fetch_report(provider, cities, today).await.table()
}

fn log_outcome(city: City, day: Day, outcome: &Result<Reading, Omission>) {
    match outcome {
        Ok(_) => tracing::debug!(%city, %day, "observation fetched"),
        Err(reason) => tracing::warn!(%city, %day, %reason, "observation omitted"),
    }
}

/// Production table source: a provider, the city list and the clock that
/// decides which day is "today" at fetch time.
#[derive(Debug, Clone)]
pub struct Fetcher {
    provider: Arc<dyn WeatherProvider>,
    cities: Vec<City>,
    clock: Arc<dyn Clock>,
}

impl Fetcher {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        cities: Vec<City>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { provider, cities, clock }
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub async fn fetch_report(&self) -> FetchReport {
        fetch_report(self.provider.as_ref(), &self.cities, self.clock.today()).await
    }
}

#[async_trait]
impl TableSource for Fetcher {
    async fn load(&self) -> ObservationTable {
        let report = self.fetch_report().await;
        let omitted = report.omissions().len();
        let table = report.table();
        tracing::info!(rows = table.len(), omitted, "fetch cycle complete");
        table
    }
}
