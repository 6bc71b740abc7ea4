use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use dmnt_sync::app::{App, Startup};
use dmnt_sync::client::HttpTranslationClient;
use dmnt_sync::clock::SystemClock;
use dmnt_sync::components::debug_log::{install_panic_hook, set_global_debug_log};
use dmnt_sync::components::{DebugLogComponent, DiagnosticsPanel};
use dmnt_sync::config::{Cli, SyncConfig};
use dmnt_sync::constants::FRAME_INTERVAL;
use dmnt_sync::drivers::OutputDriver;
use dmnt_sync::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use dmnt_sync::error::AppResult;
use dmnt_sync::event_loop::{ControlFlow, EventLoop};
use dmnt_sync::store::{JsonFileStore, MemoryStore, SessionStore};
use dmnt_sync::sync::{BackgroundDispatcher, IdleScheduler, SyncController};
use dmnt_sync::tracing_sub;

fn main() -> ExitCode {
    let config = match SyncConfig::try_from(Cli::parse()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("dmnt-sync: {err}");
            return ExitCode::from(2);
        }
    };
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dmnt-sync: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: SyncConfig) -> AppResult<()> {
    let (debug_log, log_handle) = DebugLogComponent::new_default();
    set_global_debug_log(log_handle);
    install_panic_hook();
    tracing_sub::init(config.log_level);
    info!(server = %config.server, "starting");

    let client = HttpTranslationClient::new(&config.server, config.timeout)?;
    let store: Box<dyn SessionStore> = match &config.state_file {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::new()),
    };
    let (diagnostics, sink) = DiagnosticsPanel::new();
    let controller = SyncController::new(
        IdleScheduler::new(config.poll_interval, config.idle_threshold),
        BackgroundDispatcher::new(client),
        SystemClock,
        store,
        Box::new(sink),
    );
    let mut app = App::new(
        controller,
        diagnostics,
        Some(debug_log),
        config.export_dir.clone(),
    );
    app.start(&Startup {
        source_import: config.source_import.clone(),
        derived_import: config.derived_import.clone(),
        seed_example: config.seed_example,
    })?;

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut event_loop = EventLoop::new(ConsoleInputDriver::new(), FRAME_INTERVAL);
    let result = event_loop.run(|event| match event {
        Some(event) => Ok(app.handle_event(&event)),
        None => {
            app.idle_step();
            output.draw(|frame| app.draw(frame))?;
            Ok(ControlFlow::Continue)
        }
    });
    app.shutdown();
    output.exit()?;

    if let Err(err) = &result {
        error!("event loop stopped: {err}");
    }
    result?;
    info!("bye");
    Ok(())
}
