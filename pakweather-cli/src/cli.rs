use std::{sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{
    CustomUserError, MultiSelect, Password, PasswordDisplayMode, list_option::ListOption,
    validator::Validation,
};
use pakweather_core::{
    City, Clock, Config, Day, Fetcher, Metric, ResultCache, SystemClock, WeatherApiProvider, pivot,
    select,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "pakweather", version, about = "Weather dashboard for Pakistani cities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key and pick the cities to track.
    Configure,

    /// List the tracked cities.
    Cities,

    /// Show one city's card.
    Show {
        /// City name, e.g. "Karachi".
        city: City,

        #[arg(long, value_enum, default_value_t = DayArg::Today)]
        day: DayArg,
    },

    /// Compare all tracked cities, today against yesterday.
    Compare {
        /// Only this metric; both when absent.
        #[arg(long, value_enum)]
        metric: Option<MetricArg>,

        /// Scale each city by its own maximum.
        #[arg(long)]
        relative: bool,
    },

    /// Redraw the comparison periodically. Data is refetched at most once an hour.
    Watch {
        /// Seconds between redraws.
        #[arg(long, default_value_t = 300)]
        interval: u64,

        #[arg(long, value_enum)]
        metric: Option<MetricArg>,

        #[arg(long)]
        relative: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DayArg {
    Today,
    Yesterday,
}

impl From<DayArg> for Day {
    fn from(value: DayArg) -> Self {
        match value {
            DayArg::Today => Day::Today,
            DayArg::Yesterday => Day::Yesterday,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    Temperature,
    Humidity,
}

impl From<MetricArg> for Metric {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Temperature => Metric::Temperature,
            MetricArg::Humidity => Metric::Humidity,
        }
    }
}

fn metrics(selected: Option<MetricArg>) -> Vec<Metric> {
    match selected {
        Some(m) => vec![m.into()],
        None => vec![Metric::Temperature, Metric::Humidity],
    }
}

/// Provider, cache and clock wired from the on-disk config.
struct Dashboard {
    cache: ResultCache<Fetcher>,
    clock: Arc<dyn Clock>,
}

impl Dashboard {
    fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?.to_owned();
        let provider = Arc::new(WeatherApiProvider::with_base_url(api_key, config.base_url()));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let fetcher = Fetcher::new(provider, config.cities(), Arc::clone(&clock));
        let cache = ResultCache::with_ttl(fetcher, Arc::clone(&clock), config.cache_ttl());
        tracing::debug!(
            base_url = config.base_url(),
            cities = cache.source().cities().len(),
            ttl = ?cache.ttl(),
            "dashboard ready"
        );

        Ok(Self { cache, clock })
    }

    async fn comparison(&self, selected: Option<MetricArg>, relative: bool) -> String {
        let table = self.cache.get_or_fetch().await;

        metrics(selected)
            .into_iter()
            .map(|metric| {
                let matrix = pivot(&table, metric);
                if relative {
                    render::matrix(&matrix.normalized(), true)
                } else {
                    render::matrix(&matrix, false)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Cities => {
                let config = Config::load()?;
                for city in config.cities() {
                    println!("{city}");
                }
            }
            Command::Show { city, day } => {
                let dashboard = Dashboard::from_config(&Config::load()?)?;
                let table = dashboard.cache.get_or_fetch().await;
                let selection = select(&table, city, day.into(), dashboard.clock.today());
                println!("{}", render::card(&selection));
            }
            Command::Compare { metric, relative } => {
                let dashboard = Dashboard::from_config(&Config::load()?)?;
                println!("{}", dashboard.comparison(metric, relative).await);
            }
            Command::Watch { interval, metric, relative } => {
                let dashboard = Dashboard::from_config(&Config::load()?)?;
                let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));

                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            let body = dashboard.comparison(metric, relative).await;
                            let stamp = dashboard.clock.now().format("%Y-%m-%d %H:%M:%S UTC");
                            println!("{stamp}\n{body}");
                        }
                        res = tokio::signal::ctrl_c() => {
                            res.context("Failed to listen for Ctrl-C")?;
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let current = config.cities();
    let defaults: Vec<usize> = City::all()
        .iter()
        .enumerate()
        .filter(|(_, city)| current.contains(city))
        .map(|(idx, _)| idx)
        .collect();

    let cities = MultiSelect::new("Cities to track:", City::all().to_vec())
        .with_default(&defaults)
        .with_validator(require_city)
        .prompt()
        .context("Failed to read city selection")?;
    config.cities = if cities.len() == City::all().len() { None } else { Some(cities) };

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn require_city(selected: &[ListOption<&City>]) -> Result<Validation, CustomUserError> {
    if selected.is_empty() {
        Ok(Validation::Invalid("Select at least one city.".into()))
    } else {
        Ok(Validation::Valid)
    }
}
