mod app;
mod braille;
mod commands;
mod logging;
mod ui;
mod viewport;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use app::App;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use commands::OutputFormat;
use coords2country::{Answer, CachePolicy, Config, Geocoder, VotePolicy};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

/// Exit status when a coordinate lies outside the mapped band
const EXIT_UNRESOLVED: u8 = 2;

/// Offline coordinates to country lookup
#[derive(Parser)]
#[command(
    name = "coords2country",
    version,
    about,
    args_conflicts_with_subcommands = true,
    allow_negative_numbers = true
)]
struct Cli {
    /// Latitude in degrees, north positive
    #[arg(requires = "lon")]
    lat: Option<f64>,

    /// Longitude in degrees, east positive
    lon: Option<f64>,

    /// Print the numeric Wikidata id instead of the name
    #[arg(long)]
    qid: bool,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,

    #[command(flatten)]
    resources: ResourceArgs,

    /// More output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct ResourceArgs {
    /// Directory holding the raster and intensity table
    #[arg(long, value_name = "DIR", global = true)]
    resources: Option<PathBuf>,

    /// Raster file, relative to the resource directory unless absolute
    #[arg(long, value_name = "FILE", global = true)]
    raster: Option<PathBuf>,

    /// Intensity table, relative to the resource directory unless absolute
    #[arg(long, value_name = "FILE", global = true)]
    table: Option<PathBuf>,

    /// Let the first country met in a ring win instead of the majority
    #[arg(long, global = true)]
    first_seen: bool,

    /// Largest ring searched around sea and border pixels
    #[arg(long, value_name = "PIXELS", global = true)]
    max_radius: Option<u32>,
}

impl ResourceArgs {
    fn config(&self) -> Config {
        let mut config = Config::default().with_max_search_radius(self.max_radius);
        if let Some(dir) = &self.resources {
            config = config.with_resource_dir(dir);
        }
        if let Some(raster) = &self.raster {
            config = config.with_raster_file(raster);
        }
        if let Some(table) = &self.table {
            config = config.with_table_file(table);
        }
        if self.first_seen {
            config = config.with_vote(VotePolicy::FirstSeen);
        }
        config
    }
}

#[derive(Subcommand)]
enum Command {
    /// Resolve one coordinate
    #[command(allow_negative_numbers = true)]
    Lookup {
        lat: f64,
        lon: f64,
        #[arg(long)]
        qid: bool,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Check a table of known coordinates against the map
    Validate {
        #[arg(default_value = "data/countries.csv")]
        path: PathBuf,
    },
    /// Browse the map in the terminal and inspect countries under the mouse
    Explore,
}

fn answer(qid: bool) -> Answer {
    if qid {
        Answer::NumericId
    } else {
        Answer::Name
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.resources.config();

    let resolved = match cli.command {
        // Logging would corrupt the alternate screen
        Some(Command::Explore) => return explore(&config).map(|()| ExitCode::SUCCESS),
        Some(Command::Validate { path }) => {
            logging::init_logging(cli.verbose);
            let geocoder = Geocoder::new(&config.with_cache(CachePolicy::Retain));
            return commands::validate(&geocoder, &path).map(|ok| {
                if ok {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            });
        }
        Some(Command::Lookup { lat, lon, qid, format }) => {
            logging::init_logging(cli.verbose);
            commands::lookup(&Geocoder::new(&config), lat, lon, answer(qid), format)?
        }
        None => {
            let (Some(lat), Some(lon)) = (cli.lat, cli.lon) else {
                Cli::command().print_help()?;
                return Ok(ExitCode::FAILURE);
            };
            logging::init_logging(cli.verbose);
            commands::lookup(&Geocoder::new(&config), lat, lon, answer(cli.qid), cli.format)?
        }
    };

    Ok(if resolved {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_UNRESOLVED)
    })
}

fn explore(config: &Config) -> Result<()> {
    let geocoder = Geocoder::new(&config.clone().with_cache(CachePolicy::Retain));
    // Fail on missing resources before the terminal switches to raw mode
    geocoder
        .resources()
        .context("loading map resources for the explorer")?;

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, geocoder);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events for panning, zooming and hovering
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for cursor marker and hover lookup
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        // Scroll wheel for zooming towards mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        // Click and drag to pan
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, geocoder: Geocoder) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(geocoder, size.width as usize, size.height as usize)?;

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                    // Pan with hjkl or arrow keys
                    KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                    KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                    KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
                    KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
