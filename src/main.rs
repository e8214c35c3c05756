use anyhow::Result;
use moebius::app::{App, AppEvent, Services, WindowManager};
use moebius::backend::HeadlessBackend;
use moebius::backend::bridge;
use moebius::cli;
use moebius::menu::StandardMenuBuilder;
use moebius::platform::Platform;
use moebius::traits::NoPresence;
use moebius_config::{FilePreferences, MemoryPreferences, PreferencesStore};
use std::sync::Arc;
use tokio::sync::mpsc;

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let runtime_options = match cli::process_cli() {
        cli::CliResult::Exit(code) => {
            if code == 0 {
                return Ok(());
            }
            std::process::exit(code);
        }
        cli::CliResult::Continue(options) => options,
    };
    moebius::debug::init_log_bridge(runtime_options.log_level);

    log::info!("Starting moebius {}", moebius::VERSION);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let prefs: Arc<dyn PreferencesStore> = match FilePreferences::load() {
            Ok(prefs) => {
                log::info!("Loaded preferences from {}", prefs.path().display());
                Arc::new(prefs)
            }
            Err(e) => {
                log::warn!("Failed to load preferences, using defaults: {}", e);
                Arc::new(MemoryPreferences::default())
            }
        };

        let backend = HeadlessBackend::default();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        backend.connect_events(event_tx.clone());
        backend.connect_observer(notice_tx);

        let backend_arc = Arc::new(backend.clone());
        let services = Services {
            windows: backend_arc.clone(),
            dialogs: backend_arc.clone(),
            host: backend_arc,
            menus: Arc::new(StandardMenuBuilder::new()),
            prefs,
            presence: Arc::new(NoPresence),
        };
        let window_manager = Arc::new(WindowManager::new(services, Platform::current()));
        let app = Arc::new(App::new(window_manager));

        let writer = bridge::spawn_stdout_writer(notice_rx);
        let _reader = bridge::spawn_stdin_reader(backend, event_tx.clone());

        if event_tx
            .send(AppEvent::Ready {
                files: runtime_options.files,
            })
            .is_err()
        {
            anyhow::bail!("event loop closed before startup");
        }
        drop(event_tx);

        app.run(event_rx).await;
        writer.abort();
        Ok(())
    })?;

    log::info!("Event loop exited, shutting down runtime");
    runtime.shutdown_timeout(std::time::Duration::from_secs(2));
    Ok(())
}
