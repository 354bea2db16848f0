use crate::datagov::{outlook, two_hour, Resource};
use crate::error::{Error, Result};
use crate::units::time;

const NO_FORECAST: &str = "No forecast available";
const UNKNOWN_FORECAST: &str = "Unknown";
const DEFAULT_START: &str = "Now";
const DEFAULT_END: &str = "2 hours later";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MinMax {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl From<Option<outlook::Bounds>> for MinMax {
    fn from(bounds: Option<outlook::Bounds>) -> Self {
        let bounds = bounds.unwrap_or_default();
        Self {
            min: bounds.low,
            max: bounds.high,
        }
    }
}

/// One day of the multi-day outlook.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub temperature: MinMax,
    pub humidity: MinMax,
    pub forecast_text: String,
    pub forecast_summary: Option<String>,
    pub wind_speed: MinMax,
    pub wind_direction: Option<String>,
    /// The API's own day label. Display dates are computed from the fetch date instead.
    pub date: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<outlook::Entry> for ForecastDay {
    fn from(entry: outlook::Entry) -> Self {
        let text = entry.forecast.unwrap_or_default();
        let wind = entry.wind.unwrap_or_default();
        Self {
            temperature: entry.temperature.into(),
            humidity: entry.relative_humidity.into(),
            forecast_text: non_empty(text.text).unwrap_or_else(|| NO_FORECAST.to_string()),
            forecast_summary: non_empty(text.summary),
            wind_speed: wind.speed.into(),
            wind_direction: non_empty(wind.direction),
            date: non_empty(entry.day),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outlook {
    pub forecasts: Vec<ForecastDay>,
    pub updated_timestamp: Option<String>,
}

impl TryFrom<outlook::Response> for Outlook {
    type Error = Error;

    fn try_from(response: outlook::Response) -> Result<Self> {
        let malformed = |reason: &str| Error::malformed(Resource::Outlook, reason);
        let record = response
            .data
            .and_then(|data| data.records)
            .and_then(|records| records.into_iter().next())
            .ok_or_else(|| malformed("missing data.records[0]"))?;
        let forecasts = record
            .forecasts
            .ok_or_else(|| malformed("missing data.records[0].forecasts"))?;
        if forecasts.is_empty() {
            return Err(Error::NoForecastData);
        }
        Ok(Self {
            forecasts: forecasts.into_iter().map(ForecastDay::from).collect(),
            updated_timestamp: non_empty(record.updated_timestamp),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Two-hour forecast for one named area.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaForecast {
    pub name: String,
    pub location: Option<Location>,
    pub forecast_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidPeriod {
    pub start: String,
    pub end: String,
}

impl From<Option<two_hour::ValidPeriod>> for ValidPeriod {
    fn from(period: Option<two_hour::ValidPeriod>) -> Self {
        let period = period.unwrap_or_default();
        Self {
            start: non_empty(period.start)
                .map_or_else(|| DEFAULT_START.to_string(), |raw| time::display_time(&raw)),
            end: non_empty(period.end)
                .map_or_else(|| DEFAULT_END.to_string(), |raw| time::display_time(&raw)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaIndex {
    pub areas: Vec<AreaForecast>,
    pub valid_period: ValidPeriod,
    pub updated_timestamp: Option<String>,
}

impl AreaIndex {
    pub fn find(&self, name: &str) -> Option<&AreaForecast> {
        self.areas.iter().find(|area| area.name == name)
    }

    /// Case-insensitive lookup used for typed input.
    pub fn resolve(&self, text: &str) -> Option<&AreaForecast> {
        self.areas
            .iter()
            .find(|area| area.name.to_lowercase() == text.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

impl TryFrom<two_hour::Response> for AreaIndex {
    type Error = Error;

    fn try_from(response: two_hour::Response) -> Result<Self> {
        let data = response
            .data
            .ok_or_else(|| Error::malformed(Resource::AreaForecast, "missing data"))?;
        let items = data
            .items
            .ok_or_else(|| Error::malformed(Resource::AreaForecast, "missing data.items"))?;
        let item = items.into_iter().next().unwrap_or_default();
        let forecasts = item.forecasts.unwrap_or_default();

        let mut areas: Vec<AreaForecast> = data
            .area_metadata
            .unwrap_or_default()
            .into_iter()
            .map(|meta| {
                let forecast_text = forecasts
                    .iter()
                    .find(|f| f.area.as_deref() == Some(meta.name.as_str()))
                    .and_then(|f| non_empty(f.forecast.clone()))
                    .unwrap_or_else(|| UNKNOWN_FORECAST.to_string());
                AreaForecast {
                    location: meta.label_location.and_then(|l| {
                        Some(Location {
                            latitude: l.latitude?,
                            longitude: l.longitude?,
                        })
                    }),
                    name: meta.name,
                    forecast_text,
                }
            })
            .collect();
        areas.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            areas,
            valid_period: item.valid_period.into(),
            updated_timestamp: non_empty(item.update_timestamp),
        })
    }
}
