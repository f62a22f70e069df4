//! Main TUI runner - entry point and event loop

use std::sync::Arc;

use farmdesk_api::Backend;
use farmdesk_app::actions::handle_action;
use farmdesk_app::process::process_message;
use farmdesk_app::{signals, AppState, DynPreferences, Message, Settings, UpdateAction};
use farmdesk_core::prelude::*;
use tokio::sync::mpsc;

use crate::{event, render, terminal};

/// Run the dashboard until the user quits or a signal arrives.
pub async fn run<B>(settings: Settings, prefs: DynPreferences, backend: Arc<B>) -> Result<()>
where
    B: Backend + Send + Sync + 'static,
{
    terminal::install_panic_hook();

    let mut term = ratatui::init();
    if let Err(e) = terminal::enable_mouse() {
        warn!("{}", e);
    }

    let mut state = AppState::new(settings, prefs);
    let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);

    // SIGINT/SIGTERM/SIGHUP arrive as Message::Shutdown
    signals::spawn_signal_handler(msg_tx.clone());

    // Claims drive the menu; everything else waits for them
    handle_action(UpdateAction::LoadCurrentUser, msg_tx.clone(), Arc::clone(&backend));

    let result = run_loop(&mut term, &mut state, msg_rx, &msg_tx, &backend);

    terminal::disable_mouse();
    ratatui::restore();

    info!("Farmdesk exiting");
    result
}

/// Main event loop
fn run_loop<B>(
    terminal: &mut ratatui::DefaultTerminal,
    state: &mut AppState,
    mut msg_rx: mpsc::Receiver<Message>,
    msg_tx: &mpsc::Sender<Message>,
    backend: &Arc<B>,
) -> Result<()>
where
    B: Backend + Send + Sync + 'static,
{
    while !state.should_quit() {
        // Backend results and signals
        while let Ok(msg) = msg_rx.try_recv() {
            process_message(state, msg, msg_tx, backend);
        }

        terminal.draw(|frame| render::view(frame, state))?;

        // Terminal input, or a tick after the poll timeout
        if let Some(message) = event::poll()? {
            process_message(state, message, msg_tx, backend);
        }
    }

    Ok(())
}
