use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::weather::{AreaIndex, Outlook};

pub const OUTLOOK_URL: &str = "https://api-open.data.gov.sg/v2/real-time/api/four-day-outlook";
pub const AREA_URL: &str = "https://api-open.data.gov.sg/v2/real-time/api/two-hr-forecast";

const USER_AGENT: &str = concat!("sgwx/", env!("CARGO_PKG_VERSION"));

/// The two data.gov.sg resources the app reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Outlook,
    AreaForecast,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Outlook => write!(f, "four-day outlook"),
            Resource::AreaForecast => write!(f, "two-hour area forecast"),
        }
    }
}

pub mod outlook {
    use super::*;

    #[derive(Deserialize, Debug, Default)]
    pub struct Response {
        pub data: Option<Data>,
    }

    #[derive(Deserialize, Debug, Default)]
    pub struct Data {
        pub records: Option<Vec<Record>>,
    }

    #[derive(Deserialize, Debug, Default)]
    pub struct Record {
        #[serde(rename = "updatedTimestamp")]
        pub updated_timestamp: Option<String>,

        pub forecasts: Option<Vec<Entry>>,
    }

    #[derive(Deserialize, Debug, Default)]
    pub struct Entry {
        pub temperature: Option<Bounds>,

        #[serde(rename = "relativeHumidity")]
        pub relative_humidity: Option<Bounds>,

        pub forecast: Option<Text>,

        pub wind: Option<Wind>,

        pub day: Option<String>,
    }

    #[derive(Deserialize, Debug, Default, Clone, Copy)]
    pub struct Bounds {
        pub low: Option<f64>,
        pub high: Option<f64>,
    }

    #[derive(Deserialize, Debug, Default)]
    pub struct Text {
        pub text: Option<String>,
        pub summary: Option<String>,
    }

    #[derive(Deserialize, Debug, Default)]
    pub struct Wind {
        pub speed: Option<Bounds>,
        pub direction: Option<String>,
    }
}

pub mod two_hour {
    use super::*;

    #[derive(Deserialize, Debug, Default)]
    pub struct Response {
        pub data: Option<Data>,
    }

    #[derive(Deserialize, Debug, Default)]
    pub struct Data {
        pub items: Option<Vec<Item>>,

        pub area_metadata: Option<Vec<AreaMetadata>>,
    }

    #[derive(Deserialize, Debug, Default)]
    pub struct Item {
        pub valid_period: Option<ValidPeriod>,

        pub update_timestamp: Option<String>,

        pub forecasts: Option<Vec<AreaEntry>>,
    }

    #[derive(Deserialize, Debug, Default)]
    pub struct ValidPeriod {
        pub start: Option<String>,
        pub end: Option<String>,
    }

    #[derive(Deserialize, Debug)]
    pub struct AreaEntry {
        pub area: Option<String>,
        pub forecast: Option<String>,
    }

    #[derive(Deserialize, Debug)]
    pub struct AreaMetadata {
        pub name: String,
        pub label_location: Option<LabelLocation>,
    }

    #[derive(Deserialize, Debug, Default, Clone, Copy)]
    pub struct LabelLocation {
        pub latitude: Option<f64>,
        pub longitude: Option<f64>,
    }
}

/// Where the view gets its data from.
pub trait WeatherSource {
    fn outlook(&self) -> Result<Outlook>;

    fn area_index(&self) -> Result<AreaIndex>;
}

/// Blocking client for the data.gov.sg real-time weather API.
#[derive(Debug, Clone)]
pub struct DataGov {
    client: Client,
    outlook_url: String,
    area_url: String,
}

impl DataGov {
    pub fn new(
        outlook_url: impl Into<String>,
        area_url: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            outlook_url: outlook_url.into(),
            area_url: area_url.into(),
        })
    }

    pub fn fetch_outlook(&self) -> Result<outlook::Response> {
        get_web_json(&self.client, &self.outlook_url, Resource::Outlook)
    }

    pub fn fetch_two_hour(&self) -> Result<two_hour::Response> {
        get_web_json(&self.client, &self.area_url, Resource::AreaForecast)
    }
}

impl WeatherSource for DataGov {
    fn outlook(&self) -> Result<Outlook> {
        let outlook = Outlook::try_from(self.fetch_outlook()?)?;
        info!(days = outlook.forecasts.len(), "fetched outlook");
        Ok(outlook)
    }

    fn area_index(&self) -> Result<AreaIndex> {
        let index = AreaIndex::try_from(self.fetch_two_hour()?)?;
        info!(areas = index.areas.len(), "fetched area index");
        Ok(index)
    }
}

fn get_web_json<T: DeserializeOwned>(client: &Client, url: &str, resource: Resource) -> Result<T> {
    debug!(%url, %resource, "GET");
    let response = client
        .get(url)
        .send()
        .map_err(|source| Error::Network { resource, source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status {
            resource,
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .map_err(|source| Error::Network { resource, source })?;
    serde_json::from_slice(&body).map_err(|err| Error::malformed(resource, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outlook_fields_use_api_names() {
        let raw: outlook::Response = serde_json::from_str(
            r#"{"data":{"records":[{"updatedTimestamp":"2024-05-01T06:00:00+08:00",
                "forecasts":[{"relativeHumidity":{"low":60,"high":95},"day":"Thursday"}]}]}}"#,
        )
        .unwrap();
        let records = raw.data.unwrap().records.unwrap();
        let record = &records[0];
        assert_eq!(
            record.updated_timestamp.as_deref(),
            Some("2024-05-01T06:00:00+08:00")
        );
        let entry = &record.forecasts.as_ref().unwrap()[0];
        assert_eq!(entry.relative_humidity.unwrap().high, Some(95.0));
        assert!(entry.temperature.is_none());
    }

    #[test]
    fn area_rows_may_omit_fields() {
        let raw: two_hour::Response = serde_json::from_str(
            r#"{"data":{"area_metadata":[{"name":"Bedok","label_location":{}}],
                "items":[{"forecasts":[{"forecast":"Cloudy"},{"area":"Bedok","forecast":"Fair"}]}]}}"#,
        )
        .unwrap();
        let data = raw.data.unwrap();
        let meta = &data.area_metadata.as_ref().unwrap()[0];
        assert!(meta.label_location.unwrap().latitude.is_none());
        let items = data.items.unwrap();
        let forecasts = items[0].forecasts.as_ref().unwrap();
        assert!(forecasts[0].area.is_none());
        assert_eq!(forecasts[1].area.as_deref(), Some("Bedok"));
    }

    #[test]
    fn resource_names() {
        assert_eq!(Resource::Outlook.to_string(), "four-day outlook");
        assert_eq!(Resource::AreaForecast.to_string(), "two-hour area forecast");
    }
}
