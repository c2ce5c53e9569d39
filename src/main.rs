mod app;
mod batch;
mod bulk;
mod config;
mod engine;
mod entry;
mod history;
mod store;
mod transfer;
mod ui;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, EditField, PromptKind};
use config::Config;
use engine::{DrawError, DrawOptions, Session};
use store::EntryStore;

#[derive(Parser, Debug)]
#[command(name = "garagara")]
#[command(about = "Weighted color-ball draw simulator with stock tracking")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, global = true, default_value = "~/.config/garagara/config.toml")]
    config: String,

    /// Initial entries from a CSV or JSON setup file (preset colors otherwise)
    #[arg(long, global = true)]
    setup: Option<PathBuf>,

    /// Fixed RNG seed, overrides the config
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw a batch without the TUI and print the counts
    Draw {
        /// Number of balls to draw
        #[arg(long, short = 'n', default_value_t = 1)]
        count: usize,

        /// Never draw the same entry twice in this batch
        #[arg(long)]
        no_repeat: bool,

        /// Draw out-of-stock entries and leave stock untouched
        #[arg(long)]
        ignore_stock: bool,

        /// Also write the batch as CSV
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Skip the spin delay
        #[arg(long)]
        instant: bool,
    },
    /// Print a generated palette setup as JSON
    Palette {
        /// Number of colors, at most 360
        count: usize,

        /// Common stock for every color, blank for unlimited
        #[arg(long)]
        stock: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref(), cli.command.is_some())?;

    let mut config = Config::load(&cli.config)?;
    if let Some(seed) = cli.seed {
        config.draw.seed = Some(seed);
    }

    match cli.command {
        Some(Command::Palette { count, stock }) => {
            let stock = match stock {
                Some(raw) => bulk::parse_stock(&raw),
                None => config.palette.stock(),
            };
            let setups = bulk::generate_palette(count, stock);
            println!("{}", transfer::export_setup_json(&setups)?);
            Ok(())
        }
        Some(Command::Draw {
            count,
            no_repeat,
            ignore_stock,
            output,
            instant,
        }) => {
            let store = load_store(cli.setup.as_deref()).await?;
            let options = DrawOptions {
                count,
                no_repeat,
                respect_stock: !ignore_stock,
            };
            run_draw(store, &config, &options, output.as_deref(), instant).await
        }
        None => {
            let store = load_store(cli.setup.as_deref()).await?;
            run_tui(store, config).await
        }
    }
}

/// Logs go to `--log-file` when given. Without one the TUI only lets
/// warnings through to stderr.
fn init_logging(log_file: Option<&Path>, headless: bool) -> Result<()> {
    let default_filter = if log_file.is_some() || headless {
        "garagara=info"
    } else {
        "garagara=warn"
    };
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| default_filter.into()),
    );

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
    }
    Ok(())
}

async fn load_store(setup: Option<&Path>) -> Result<EntryStore> {
    match setup {
        Some(path) => {
            let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref());
            let setups = transfer::read_setup_file(&path)
                .await
                .with_context(|| format!("Failed to load setup from {}", path.display()))?;
            Ok(EntryStore::from_setups(setups))
        }
        None => Ok(EntryStore::with_preset()),
    }
}

/// Headless batch draw: spin, commit, print the counts
async fn run_draw(
    store: EntryStore,
    config: &Config,
    options: &DrawOptions,
    output: Option<&Path>,
    instant: bool,
) -> Result<()> {
    let mut session = Session::seeded(store, config.draw.seed);
    let outcome = if instant {
        session.draw_batch(options)
    } else {
        let plan = session.plan_batch(options);
        if !plan.is_empty() {
            tokio::time::sleep(config.draw.spin_duration()).await;
        }
        session.commit_batch(plan, Utc::now())
    };
    if outcome.drawn == 0 {
        return Err(DrawError::NoEligibleEntries.into());
    }
    if let Some(truncation) = outcome.truncated {
        tracing::warn!("{}", truncation);
    }

    let batch = session.batch();
    for group in batch.counts() {
        println!("{:>5}  {}  {}", group.count, group.hex.to_uppercase(), group.label);
    }
    println!("{:>5}  total", batch.total());

    if let Some(path) = output {
        let csv = transfer::batch_csv(batch)?;
        tokio::fs::write(path, csv)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Batch written to {}", path.display());
    }
    Ok(())
}

async fn run_tui(store: EntryStore, config: Config) -> Result<()> {
    if store.is_empty() {
        tracing::warn!("Starting with no entries");
    } else {
        tracing::info!("Starting with {} entries", store.len());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, config);

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui::draw(f, app))?;

        // redraw often while the drum spins
        let timeout = if app.is_spinning() {
            Duration::from_millis(30)
        } else {
            Duration::from_millis(100)
        };
        if !event::poll(timeout)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(());
        }

        if app.is_prompting() {
            match key.code {
                KeyCode::Esc => app.cancel_prompt(),
                KeyCode::Enter => app.submit_prompt().await,
                KeyCode::Backspace => app.pop_prompt_char(),
                KeyCode::Char(c) => app.push_prompt_char(c),
                _ => {}
            }
            continue;
        }

        let now = Instant::now();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
            KeyCode::Enter | KeyCode::Char(' ') => app.draw_once(now),
            KeyCode::Char('b') => app.draw_batch(now),
            KeyCode::Char('+') | KeyCode::Char('=') => app.increase_count(),
            KeyCode::Char('-') => app.decrease_count(),
            KeyCode::Char('n') => app.toggle_no_repeat(),
            KeyCode::Char('s') => app.toggle_respect_stock(),
            KeyCode::Char('a') => app.start_prompt(PromptKind::Add),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
            KeyCode::Char('e') => app.start_edit(EditField::Label),
            KeyCode::Char('w') => app.start_edit(EditField::Weight),
            KeyCode::Char('t') => app.start_edit(EditField::Stock),
            KeyCode::Char('h') => app.start_edit(EditField::Hex),
            KeyCode::Char('B') => app.start_prompt(PromptKind::Bulk),
            KeyCode::Char('L') => app.start_prompt(PromptKind::HexList),
            KeyCode::Char('P') => app.start_prompt(PromptKind::Palette),
            KeyCode::Char('I') => app.start_prompt(PromptKind::Import),
            KeyCode::Char('R') => app.start_prompt(PromptKind::ConfirmReset),
            KeyCode::Char('r') => app.export_results().await,
            KeyCode::Char('X') => app.export_batch().await,
            KeyCode::Char('S') => app.save_setup().await,
            KeyCode::Char('c') => app.clear_history(),
            KeyCode::Char('C') => app.clear_batch(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::PageUp => app.page_up(),
            KeyCode::PageDown => app.page_down(),
            KeyCode::Home => app.home(),
            KeyCode::End => app.end(),
            KeyCode::Tab => app.tab_next(),
            _ => {}
        }
    }
}
