use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{error::Error, io, time::Duration};

use sgwx::app::{run_app, App, Outcome};
use sgwx::cli::Args;
use sgwx::{logging, DataGov};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let log_path = args.log_path();
    if let Err(err) = logging::init(&log_path, args.log_level.as_deref()) {
        eprintln!("logging disabled ({}): {err}", log_path.display());
    }

    let source = DataGov::new(
        &args.outlook_url,
        &args.area_url,
        Duration::from_secs(args.timeout),
    )?;
    let mut app = App::new(Box::new(source), &args.location, args.units);

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match res {
        Ok(Outcome::Logout) => {
            tracing::info!("user logged out");
            println!("Logged out.");
        }
        Ok(_) => tracing::info!("exiting"),
        Err(err) => {
            tracing::error!(error = %err, "terminal failure");
            eprintln!("{} ({err})", err.user_message());
        }
    }

    Ok(())
}
