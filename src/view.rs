//! The weather view-model: fetched data, the user's selection and the record
//! the screen renders.
//!
//! Every mutation rebuilds [`WeatherDisplay`] from scratch, so the area
//! forecast can only ever be attached to the first (today's) forecast day.

use chrono::{DateTime, Days, Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::datagov::WeatherSource;
use crate::error::{Error, Result};
use crate::units::time;
use crate::weather::{AreaForecast, AreaIndex, ForecastDay, Outlook, ValidPeriod};

/// Everything needed to draw the weather panel.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherDisplay {
    pub location: String,
    pub day: ForecastDay,
    pub index: usize,
    pub total: usize,
    pub date: NaiveDate,
    pub label: String,
    pub is_today: bool,
    pub area: Option<AreaForecast>,
    pub valid_period: Option<ValidPeriod>,
    pub last_updated: String,
}

#[derive(Debug, Clone)]
pub struct WeatherView {
    location: String,
    outlook: Option<Outlook>,
    anchor: NaiveDate,
    last_updated: String,
    index: usize,
    areas: Option<AreaIndex>,
    selected: Option<String>,
    loading: bool,
    error: Option<String>,
    display: Option<WeatherDisplay>,
}

impl WeatherView {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            outlook: None,
            anchor: Local::now().date_naive(),
            last_updated: String::new(),
            index: 0,
            areas: None,
            selected: None,
            loading: false,
            error: None,
            display: None,
        }
    }

    pub fn display(&self) -> Option<&WeatherDisplay> {
        self.display.as_ref()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn areas(&self) -> Option<&AreaIndex> {
        self.areas.as_ref()
    }

    pub fn selected_region(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn day_count(&self) -> usize {
        self.outlook.as_ref().map_or(0, |o| o.forecasts.len())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_advance(&self) -> bool {
        self.day_count() > 1
    }

    /// The region picker needs a loaded area index.
    pub fn can_pick_region(&self) -> bool {
        self.areas.is_some() && !self.loading
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Fetch the outlook and, if that worked, the area index.
    ///
    /// Failures are recorded in the error slot; an area failure leaves the
    /// outlook in place.
    pub fn fetch<S: WeatherSource + ?Sized>(&mut self, source: &S) {
        self.fetch_at(source, Local::now());
    }

    pub fn fetch_at<S: WeatherSource + ?Sized>(&mut self, source: &S, now: DateTime<Local>) {
        self.begin_fetch();
        match source.outlook() {
            Ok(outlook) => {
                self.apply_outlook(outlook, now);
                match source.area_index() {
                    Ok(index) => self.apply_areas(index),
                    Err(err) => {
                        warn!(error = %err, "area index fetch failed");
                        self.fail(&err);
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "outlook fetch failed");
                self.fail(&err);
            }
        }
        self.loading = false;
    }

    pub fn apply_outlook(&mut self, outlook: Outlook, fetched_at: DateTime<Local>) {
        self.anchor = fetched_at.date_naive();
        self.last_updated = outlook.updated_timestamp.as_deref().map_or_else(
            || time::format_timestamp(&fetched_at.to_rfc3339()),
            time::format_timestamp,
        );
        self.outlook = Some(outlook);
        self.areas = None;
        self.index = 0;
        self.refresh();
    }

    pub fn apply_areas(&mut self, index: AreaIndex) {
        self.areas = Some(index);
        self.refresh();
    }

    pub fn fail(&mut self, err: &Error) {
        self.error = Some(err.user_message());
    }

    pub fn select_day(&mut self, index: usize) -> Result<()> {
        let len = self.day_count();
        if index >= len {
            return Err(Error::DayOutOfRange { index, len });
        }
        self.index = index;
        self.refresh();
        Ok(())
    }

    pub fn advance_day(&mut self) {
        if self.can_advance() {
            self.index = (self.index + 1) % self.day_count();
            self.refresh();
        }
    }

    pub fn previous_day(&mut self) {
        if self.can_advance() {
            let len = self.day_count();
            self.index = (self.index + len - 1) % len;
            self.refresh();
        }
    }

    /// Select an area by its exact name.
    pub fn select_region(&mut self, name: &str) -> Result<()> {
        match &self.areas {
            Some(index) if index.find(name).is_some() => {
                self.selected = Some(name.to_string());
                self.location = name.to_string();
            }
            Some(index) if !index.is_empty() => {
                return Err(Error::RegionNotFound(name.to_string()));
            }
            _ => {
                self.selected = None;
                self.location = name.to_string();
            }
        }
        info!(region = name, "region selected");
        self.refresh();
        Ok(())
    }

    /// Resolve typed text to an area, ignoring case.
    pub fn update_location(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyLocation);
        }
        let resolved = self
            .areas
            .as_ref()
            .and_then(|index| index.resolve(text))
            .map(|area| area.name.clone());
        match resolved {
            Some(name) => self.select_region(&name),
            None => self.select_region(text),
        }
    }

    /// Drop all fetched data, the selection and any error.
    pub fn clear(&mut self) {
        debug!("clearing weather view");
        self.outlook = None;
        self.areas = None;
        self.selected = None;
        self.index = 0;
        self.error = None;
        self.last_updated.clear();
        self.display = None;
    }

    fn refresh(&mut self) {
        let Some(outlook) = &self.outlook else {
            self.display = None;
            return;
        };
        let Some(day) = outlook.forecasts.get(self.index) else {
            self.display = None;
            return;
        };

        let date = self
            .anchor
            .checked_add_days(Days::new(self.index as u64))
            .unwrap_or(self.anchor);
        let is_today = self.index == 0;
        let area = match (&self.selected, &self.areas) {
            (Some(name), Some(index)) if is_today => index.find(name).cloned(),
            _ => None,
        };
        let valid_period = area
            .as_ref()
            .and(self.areas.as_ref())
            .map(|index| index.valid_period.clone());

        self.display = Some(WeatherDisplay {
            location: self.location.clone(),
            day: day.clone(),
            index: self.index,
            total: outlook.forecasts.len(),
            date,
            label: time::day_label(self.index, day.date.as_deref(), date),
            is_today,
            area,
            valid_period,
            last_updated: self.last_updated.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datagov::Resource;
    use crate::weather::MinMax;
    use chrono::TimeZone;

    fn day(text: &str, low: f64) -> ForecastDay {
        ForecastDay {
            temperature: MinMax { min: Some(low), max: Some(low + 8.0) },
            humidity: MinMax { min: Some(55.0), max: Some(95.0) },
            forecast_text: text.to_string(),
            forecast_summary: None,
            wind_speed: MinMax { min: Some(10.0), max: Some(20.0) },
            wind_direction: Some("S".to_string()),
            date: None,
        }
    }

    fn outlook() -> Outlook {
        Outlook {
            forecasts: vec![
                day("Showers", 24.0),
                day("Thundery Showers", 25.0),
                day("Fair", 26.0),
                day("Cloudy", 27.0),
            ],
            updated_timestamp: Some("2024-05-01T06:00:00+08:00".to_string()),
        }
    }

    fn area(name: &str, text: &str) -> AreaForecast {
        AreaForecast {
            name: name.to_string(),
            location: None,
            forecast_text: text.to_string(),
        }
    }

    fn areas() -> AreaIndex {
        AreaIndex {
            areas: vec![
                area("Bedok", "Cloudy"),
                area("Singapore", "Light Rain"),
                area("Yishun", "Fair"),
            ],
            valid_period: ValidPeriod {
                start: "1:00 PM".to_string(),
                end: "3:00 PM".to_string(),
            },
            updated_timestamp: None,
        }
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    struct Fixed {
        outlook: fn() -> Result<Outlook>,
        areas: fn() -> Result<AreaIndex>,
    }

    impl WeatherSource for Fixed {
        fn outlook(&self) -> Result<Outlook> {
            (self.outlook)()
        }

        fn area_index(&self) -> Result<AreaIndex> {
            (self.areas)()
        }
    }

    fn loaded() -> WeatherView {
        let mut view = WeatherView::new("Singapore");
        view.fetch_at(
            &Fixed {
                outlook: || Ok(outlook()),
                areas: || Ok(areas()),
            },
            now(),
        );
        view
    }

    #[test]
    fn fetch_displays_today() {
        let view = loaded();
        assert!(!view.is_loading());
        assert_eq!(view.error(), None);
        let display = view.display().unwrap();
        assert_eq!(display.index, 0);
        assert_eq!(display.total, 4);
        assert!(display.is_today);
        assert_eq!(display.label, "Today");
        assert_eq!(display.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(display.day.forecast_text, "Showers");
        assert_eq!(display.location, "Singapore");
        assert!(display.area.is_none());
        assert!(view.can_pick_region());
    }

    #[test]
    fn select_first_day_matches_initial_display() {
        let mut view = loaded();
        let initial = view.display().cloned();
        view.select_day(0).unwrap();
        assert_eq!(view.display().cloned(), initial);
    }

    #[test]
    fn select_day_uses_local_dates() {
        let mut view = loaded();
        view.select_day(2).unwrap();
        let display = view.display().unwrap();
        assert_eq!(display.date, NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
        assert_eq!(display.label, "Friday");
        assert!(!display.is_today);
        assert_eq!(display.day.forecast_text, "Fair");
    }

    #[test]
    fn select_day_out_of_range() {
        let mut view = loaded();
        view.advance_day();
        let before = view.display().cloned();
        let err = view.select_day(4).unwrap_err();
        assert!(matches!(err, Error::DayOutOfRange { index: 4, len: 4 }));
        assert_eq!(view.display().cloned(), before);
        assert!(WeatherView::new("x").select_day(0).is_err());
    }

    #[test]
    fn advance_day_cycles() {
        let mut view = loaded();
        view.select_region("Bedok").unwrap();
        let start = view.display().cloned();
        let mut seen = Vec::new();
        for _ in 0..4 {
            view.advance_day();
            seen.push(view.current_index());
        }
        assert_eq!(seen, [1, 2, 3, 0]);
        assert_eq!(view.display().cloned(), start);
    }

    #[test]
    fn previous_day_wraps() {
        let mut view = loaded();
        view.previous_day();
        assert_eq!(view.current_index(), 3);
        view.previous_day();
        assert_eq!(view.current_index(), 2);
    }

    #[test]
    fn single_day_does_not_advance() {
        let mut view = WeatherView::new("Singapore");
        let mut single = outlook();
        single.forecasts.truncate(1);
        view.apply_outlook(single, now());
        assert!(!view.can_advance());
        let before = view.display().cloned();
        view.advance_day();
        view.previous_day();
        assert_eq!(view.current_index(), 0);
        assert_eq!(view.display().cloned(), before);
    }

    #[test]
    fn region_selection_is_idempotent() {
        let mut view = loaded();
        view.select_region("Yishun").unwrap();
        let once = view.display().cloned();
        view.select_region("Yishun").unwrap();
        assert_eq!(view.display().cloned(), once);
        let display = view.display().unwrap();
        assert_eq!(display.location, "Yishun");
        assert_eq!(display.area.as_ref().unwrap().forecast_text, "Fair");
        assert_eq!(display.valid_period.as_ref().unwrap().start, "1:00 PM");
    }

    #[test]
    fn area_hidden_after_today() {
        let mut view = loaded();
        view.select_region("Singapore").unwrap();
        for index in 1..4 {
            view.select_day(index).unwrap();
            let display = view.display().unwrap();
            assert!(display.area.is_none());
            assert!(display.valid_period.is_none());
            assert_eq!(view.selected_region(), Some("Singapore"));
        }
    }

    #[test]
    fn four_days_back_to_singapore() {
        let mut view = loaded();
        view.select_region("Singapore").unwrap();
        assert_eq!(
            view.display().unwrap().area.as_ref().unwrap().forecast_text,
            "Light Rain"
        );
        for _ in 0..3 {
            view.advance_day();
            assert!(view.display().unwrap().area.is_none());
        }
        view.advance_day();
        let display = view.display().unwrap();
        assert_eq!(display.index, 0);
        assert_eq!(display.area.as_ref().unwrap().name, "Singapore");
        assert_eq!(display.area.as_ref().unwrap().forecast_text, "Light Rain");
    }

    #[test]
    fn unknown_region_with_loaded_areas() {
        let mut view = loaded();
        view.select_region("Bedok").unwrap();
        let err = view.select_region("Atlantis").unwrap_err();
        assert!(matches!(err, Error::RegionNotFound(ref name) if name == "Atlantis"));
        assert_eq!(view.selected_region(), Some("Bedok"));
    }

    #[test]
    fn region_without_areas_sets_label() {
        let mut view = WeatherView::new("Singapore");
        view.apply_outlook(outlook(), now());
        view.select_region("Jurong").unwrap();
        assert_eq!(view.selected_region(), None);
        assert_eq!(view.display().unwrap().location, "Jurong");
    }

    #[test]
    fn update_location_resolves_case() {
        let mut view = loaded();
        view.update_location("  singapore ").unwrap();
        assert_eq!(view.selected_region(), Some("Singapore"));
        assert!(matches!(view.update_location("   "), Err(Error::EmptyLocation)));
        assert!(matches!(
            view.update_location("Mars"),
            Err(Error::RegionNotFound(_))
        ));
    }

    #[test]
    fn area_failure_keeps_outlook() {
        let mut view = WeatherView::new("Singapore");
        view.fetch_at(
            &Fixed {
                outlook: || Ok(outlook()),
                areas: || {
                    Err(Error::Status {
                        resource: Resource::AreaForecast,
                        status: 500,
                    })
                },
            },
            now(),
        );
        assert!(view.display().is_some());
        assert_eq!(
            view.error(),
            Some("Failed to fetch area weather data. Please try again.")
        );
        assert!(!view.can_pick_region());
    }

    #[test]
    fn outlook_failure_keeps_stale_view() {
        let mut view = loaded();
        let before = view.display().cloned();
        view.fetch_at(
            &Fixed {
                outlook: || {
                    Err(Error::Status {
                        resource: Resource::Outlook,
                        status: 503,
                    })
                },
                areas: || Ok(areas()),
            },
            now(),
        );
        assert_eq!(view.error(), Some("Failed to fetch weather data: 503"));
        assert_eq!(view.display().cloned(), before);
        assert!(!view.is_loading());
    }

    #[test]
    fn refetch_keeps_selection_and_resets_day() {
        let mut view = loaded();
        view.select_region("Bedok").unwrap();
        view.advance_day();
        view.fetch_at(
            &Fixed {
                outlook: || Ok(outlook()),
                areas: || Ok(areas()),
            },
            now(),
        );
        let display = view.display().unwrap();
        assert_eq!(display.index, 0);
        assert_eq!(display.area.as_ref().unwrap().name, "Bedok");
    }

    #[test]
    fn clear_empties_everything() {
        let mut view = loaded();
        view.select_region("Bedok").unwrap();
        view.fail(&Error::EmptyLocation);
        view.clear();
        assert!(view.display().is_none());
        assert!(view.areas().is_none());
        assert_eq!(view.selected_region(), None);
        assert_eq!(view.error(), None);
        assert_eq!(view.day_count(), 0);
        assert!(!view.can_pick_region());
    }

    #[test]
    fn last_updated_falls_back_to_fetch_time() {
        let mut view = WeatherView::new("Singapore");
        let mut no_stamp = outlook();
        no_stamp.updated_timestamp = None;
        view.apply_outlook(no_stamp, now());
        assert_eq!(
            view.display().unwrap().last_updated,
            time::format_timestamp(&now().to_rfc3339())
        );
    }
}
