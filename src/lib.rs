//! Terminal client for the data.gov.sg weather API: a four-day outlook with
//! day navigation plus two-hour forecasts for named areas.

pub mod app;
pub mod cli;
pub mod datagov;
pub mod error;
pub mod logging;
pub mod ui;
pub mod units;
pub mod view;
pub mod weather;

pub use datagov::{DataGov, WeatherSource};
pub use error::{Error, Result};
pub use view::{WeatherDisplay, WeatherView};
