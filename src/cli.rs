use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

use crate::datagov::{AREA_URL, OUTLOOK_URL};
use crate::units::Units;

const ABOUT: &str = "Singapore weather TUI";

const LONG_ABOUT: &str = "
TUI for viewing the four-day outlook and two-hour area forecasts published on data.gov.sg.

The optional positional argument is the location shown in the location field on start-up
(e.g. Singapore, Bedok, Ang Mo Kio). Press `e` to edit it and Enter to look it up among the
two-hour forecast areas, or `a` to pick an area from the list.

Nothing is saved between runs.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(
        default_value = "Singapore",
        help = "Initial location (e.g. Singapore, Bedok, Yishun)"
    )]
    pub location: String,

    #[arg(long, value_enum, default_value_t = Units::Metric, help = "Display units")]
    pub units: Units,

    #[arg(long, default_value_t = 10, help = "HTTP request timeout in seconds")]
    pub timeout: u64,

    #[arg(long, default_value = OUTLOOK_URL, help = "Four-day outlook endpoint")]
    pub outlook_url: String,

    #[arg(long, default_value = AREA_URL, help = "Two-hour area forecast endpoint")]
    pub area_url: String,

    #[arg(long, help = "Log file (defaults to sgwx.log in the temp directory)")]
    pub log_file: Option<PathBuf>,

    #[arg(long, help = "Log filter, overrides RUST_LOG (e.g. debug, sgwx=trace)")]
    pub log_level: Option<String>,
}

impl Args {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("sgwx.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["sgwx"]);
        assert_eq!(args.location, "Singapore");
        assert_eq!(args.units, Units::Metric);
        assert_eq!(args.timeout, 10);
        assert_eq!(args.outlook_url, OUTLOOK_URL);
        assert_eq!(args.area_url, AREA_URL);
        assert!(args.log_path().ends_with("sgwx.log"));
    }

    #[test]
    fn overrides() {
        let args = Args::parse_from([
            "sgwx",
            "Bedok",
            "--units",
            "imperial",
            "--area-url",
            "http://localhost:9999/areas",
            "--log-file",
            "/tmp/wx.log",
        ]);
        assert_eq!(args.location, "Bedok");
        assert_eq!(args.units, Units::Imperial);
        assert_eq!(args.area_url, "http://localhost:9999/areas");
        assert_eq!(args.log_path(), PathBuf::from("/tmp/wx.log"));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
