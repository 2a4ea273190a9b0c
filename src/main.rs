use std::fs::{self, File};
use std::io::Write;
use std::panic;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dexgrid::action::Action;
use dexgrid::app::App;
use dexgrid::cli::{Cli, Command, LogSink};
use dexgrid::config::Config;
use dexgrid::controller::{Commit, Controller};
use dexgrid::event::Event;
use dexgrid::fetcher::PageFetcher;
use dexgrid::pokeapi::PokeApi;
use dexgrid::tui::{self, EventHandler};
use dexgrid::ui;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (config, config_error) = match Config::load(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let config = config.with_overrides(cli.api_base.clone(), cli.page_size)?;

    // Initialize logging
    init_logging(&config.log.filter, cli.log_sink())?;
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "ignoring config file, using defaults");
    }

    let api = PokeApi::new(&config.api.base_url)?;
    let fetcher = PageFetcher::new(Arc::new(api));

    if let Some(Command::Dump { pages }) = cli.command {
        return dump(fetcher, config.api.page_size, pages).await;
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    // Run the application
    let result = run(fetcher, config.api.page_size).await;

    // Restore terminal
    tui::restore()?;

    result
}

fn init_logging(filter: &str, sink: LogSink) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let registry = tracing_subscriber::registry().with(env_filter);

    match sink {
        LogSink::File(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let file = File::create(&path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        LogSink::Stderr => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        LogSink::Off => {}
    }
    Ok(())
}

/// Run `pages` page cycles without a terminal UI and print the records as
/// JSON lines.
async fn dump(
    fetcher: PageFetcher,
    page_size: usize,
    pages: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = Controller::new(page_size);
    let mut stdout = std::io::stdout();
    let mut printed = 0;

    for _ in 0..pages {
        match controller.load_next(&fetcher).await? {
            Some(Commit::Appended(count)) => {
                let start = controller.collection().len() - count;
                for record in &controller.collection()[start..] {
                    writeln!(stdout, "{}", serde_json::to_string(record)?)?;
                }
                printed += count;
            }
            Some(Commit::Stale) => {}
            None => break,
        }
    }

    tracing::info!(records = printed, "dump finished");
    Ok(())
}

async fn run(fetcher: PageFetcher, page_size: usize) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize terminal
    let mut terminal = tui::init()?;

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create app state
    let mut app = App::new(fetcher, page_size, action_tx.clone());
    let size = terminal.size()?;
    app.update(Action::Resize(size.width, size.height));

    // Create event handler
    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    // Main loop
    loop {
        // Handle events and actions
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
