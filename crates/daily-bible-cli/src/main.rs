use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use daily_bible_config::Config;
use daily_bible_engine::{
    BibleApi, HttpBibleClient, Reader, TranslationOption, translation_options,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env,
    fs::File,
    io::{Stdout, stdout},
    process,
    time::Duration,
};

mod app;
mod ui;

use app::{App, Flow};

/// The terminal owns stdout and stderr, so logs go to a file.
fn init_logging() {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env();

    let log_path = env::temp_dir().join("daily-bible.log");
    match File::create(&log_path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    init_logging();

    // Determine base URL from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let mut config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Usage: {} [api-base-url]", args[0]);
            process::exit(1);
        }
    };

    match args.len() {
        1 => {}
        2 => config.api_base_url = args[1].clone(),
        _ => {
            eprintln!("Usage: {} [api-base-url]", args[0]);
            process::exit(1);
        }
    }
    log::info!(
        "Using {} with translation {}",
        config.api_base_url,
        config.translation
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let client = HttpBibleClient::new(config.api_base_url.clone());
    let translations = runtime.block_on(load_translations(&client, &config.translation));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut reader = Reader::new(client, config.translation.clone());
    reader.start();
    let mut app = App::new(reader, translations);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Translation picker options, with the configured code always present.
async fn load_translations<C: BibleApi>(client: &C, configured: &str) -> Vec<TranslationOption> {
    let mut options = match client.fetch_translations().await {
        Ok(fetched) => translation_options(&fetched),
        Err(e) => {
            log::warn!("Failed to load translations, using built-in list: {e}");
            translation_options(&[])
        }
    };
    if !options.iter().any(|option| option.value == configured) {
        options.insert(
            0,
            TranslationOption {
                value: configured.to_string(),
                label: configured.to_string(),
            },
        );
    }
    options
}

fn run_app<C: BibleApi + 'static>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<C>,
) -> Result<()> {
    loop {
        app.refresh();
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key) == Flow::Quit
        {
            return Ok(());
        }
    }
}
