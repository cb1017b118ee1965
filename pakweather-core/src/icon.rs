//! Categorical buckets for dashboard icons.
//!
//! Every resolver is total: inputs that match nothing land in an explicit
//! default bucket.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureBand {
    Hot,
    Moderate,
    Cold,
}

impl TemperatureBand {
    pub fn from_celsius(temp: f64) -> Self {
        if temp >= 40.0 {
            TemperatureBand::Hot
        } else if temp >= 25.0 {
            TemperatureBand::Moderate
        } else {
            TemperatureBand::Cold
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureBand::Hot => "hot",
            TemperatureBand::Moderate => "moderate",
            TemperatureBand::Cold => "cold",
        }
    }

    pub fn asset_path(&self) -> &'static str {
        match self {
            TemperatureBand::Hot => "icons/temperature_hot.png",
            TemperatureBand::Moderate => "icons/temperature_moderate.png",
            TemperatureBand::Cold => "icons/temperature_cold.png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HumidityBand {
    High,
    Mid,
    Low,
}

impl HumidityBand {
    pub fn from_percent(humidity: f64) -> Self {
        if humidity >= 70.0 {
            HumidityBand::High
        } else if humidity >= 40.0 {
            HumidityBand::Mid
        } else {
            HumidityBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HumidityBand::High => "high",
            HumidityBand::Mid => "mid",
            HumidityBand::Low => "low",
        }
    }

    pub fn asset_path(&self) -> &'static str {
        match self {
            HumidityBand::High => "icons/humidity_high.png",
            HumidityBand::Mid => "icons/humidity_mid.png",
            HumidityBand::Low => "icons/humidity_low.png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionCategory {
    Sunny,
    Cloudy,
    Rainy,
    Thunder,
    Snowy,
    Fog,
}

/// Keyword rules, checked top to bottom; the first rule with a keyword
/// contained in the lower-cased condition text wins.
const CONDITION_RULES: &[(&[&str], ConditionCategory)] = &[
    (&["sunny", "clear"], ConditionCategory::Sunny),
    (&["cloudy", "overcast"], ConditionCategory::Cloudy),
    (&["rain", "drizzle"], ConditionCategory::Rainy),
    (&["thunder", "storm"], ConditionCategory::Thunder),
    (&["snow", "sleet"], ConditionCategory::Snowy),
    (&["fog", "mist"], ConditionCategory::Fog),
];

impl ConditionCategory {
    pub const DEFAULT: ConditionCategory = ConditionCategory::Cloudy;

    pub fn classify(condition: &str) -> Self {
        let text = condition.to_lowercase();

        CONDITION_RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|kw| text.contains(kw)))
            .map(|(_, category)| *category)
            .unwrap_or(Self::DEFAULT)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionCategory::Sunny => "sunny",
            ConditionCategory::Cloudy => "cloudy",
            ConditionCategory::Rainy => "rainy",
            ConditionCategory::Thunder => "thunder",
            ConditionCategory::Snowy => "snowy",
            ConditionCategory::Fog => "fog",
        }
    }

    pub fn asset_path(&self) -> &'static str {
        match self {
            ConditionCategory::Sunny => "icons/sunny.png",
            ConditionCategory::Cloudy => "icons/cloudy.png",
            ConditionCategory::Rainy => "icons/rainy.png",
            ConditionCategory::Thunder => "icons/thunder.png",
            ConditionCategory::Snowy => "icons/snowy.png",
            ConditionCategory::Fog => "icons/fog.png",
        }
    }
}
