// TUI module - terminal user interface
//
// Terminal setup/teardown and the event loop. The loop multiplexes three
// sources with tokio::select!: crossterm input (polled so the loop never
// blocks the redraw tick), a periodic tick, and the session-event channel.
// Events are delivered to App strictly one at a time; ordering is the only
// concurrency discipline the core needs.

pub mod app;
pub mod keys;
pub mod scroll;
pub mod scrollback;
pub mod view;

use crate::config::Config;
use crate::events::SessionEvent;
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI until the user quits.
pub async fn run_tui(
    mut event_rx: mpsc::Receiver<SessionEvent>,
    log_buffer: LogBuffer,
    config: Config,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;

    // Where the terminal supports it, ask for key release events so held
    // chords resolve precisely; everywhere else the modifier-flag sync
    // covers us.
    let enhanced_keys = matches!(supports_keyboard_enhancement(), Ok(true));
    if enhanced_keys {
        let _ = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        );
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::with_config(&config, log_buffer);

    let result = run_event_loop(&mut terminal, &mut app, &mut event_rx).await;

    // Restore terminal
    if enhanced_keys {
        let _ = execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::Receiver<SessionEvent>,
) -> Result<()> {
    // Periodic redraw tick (20 FPS upper bound).
    let mut tick_interval = tokio::time::interval(Duration::from_millis(50));

    loop {
        terminal
            .draw(|f| view::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard, mouse, and focus input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => app.handle_key_event(key_event),
                        Ok(Event::Mouse(mouse_event)) => app.handle_mouse_event(mouse_event),
                        Ok(Event::FocusLost) => app.on_focus_lost(),
                        _ => {}
                    }
                }
            } => {}

            // Periodic tick so the status bar stays fresh even when idle
            _ = tick_interval.tick() => {}

            // Session events from the feed
            Some(session_event) = event_rx.recv() => {
                app.handle_session_event(session_event);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
