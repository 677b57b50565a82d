mod app;
mod components;
mod draw;
mod export;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use sweepstake_domain::client::SweepstakeClient;
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

enum Mode {
    Tui,
    Build,
    Exit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppSettings::load();
    let client = SweepstakeClient::new(&settings.data_dir, settings.source.clone());

    match handle_cli_args() {
        Mode::Exit => Ok(()),
        Mode::Build => run_build(&client, &settings).await,
        Mode::Tui => run_tui(client, settings).await,
    }
}

async fn run_build(client: &SweepstakeClient, settings: &AppSettings) -> anyhow::Result<()> {
    match export::run(client, &settings.public_dir).await {
        Ok(summary) => {
            println!("{summary}");
            Ok(())
        }
        Err(e) => {
            eprintln!("build failed: {e:#}");
            std::process::exit(1);
        }
    }
}

async fn run_tui(client: SweepstakeClient, settings: AppSettings) -> anyhow::Result<()> {
    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Error)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let refresh_interval = settings.refresh_interval;
    let app = Arc::new(Mutex::new(App::new(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(client, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Periodic reload thread
    let periodic_updater = PeriodicRefresher::new(network_req_tx.clone(), refresh_interval);
    let periodic_task = tokio::spawn(periodic_updater.run());

    // Trigger the first load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    periodic_task.abort();

    Ok(())
}

fn handle_cli_args() -> Mode {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return Mode::Tui;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            Mode::Exit
        }
        "-V" | "--version" => {
            println!("sweepstake {}", env!("CARGO_PKG_VERSION"));
            Mode::Exit
        }
        "-b" | "--build" => Mode::Build,
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "sweepstake - tournament sweepstake prize board

Usage:
  sweepstake            interactive prize board
  sweepstake --build    write <public>/<id>/index.json for buildable sweepstakes
  sweepstake --help
  sweepstake --version

Environment:
  SWEEPSTAKE_DATA_DIR      Directory holding tournaments/ (default data)
  SWEEPSTAKE_SOURCE        Sweepstakes manifest path or http(s) URL (default <data>/sweepstakes.json)
  SWEEPSTAKE_BASIC_AUTH    user:password for a URL source
  SWEEPSTAKE_PUBLIC_DIR    Build output directory (default public)
  SWEEPSTAKE_REFRESH_SECS  Reload period in the prize board (default 60)
  SWEEPSTAKE_LOG           Log level: error, warn, info, debug, trace"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = network_requests.send(NetworkRequest::LoadSweepstakes).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::SweepstakesLoaded { boards } => {
            let mut guard = app.lock().await;
            guard.on_sweepstakes_loaded(boards);
        }
        NetworkResponse::Error { message } => {
            error!("Load error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

/// Best effort: also runs from the panic hook and the quit key.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
