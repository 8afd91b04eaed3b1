// Application state for the terminal client
//
// App owns everything the event loop touches: scrollback, the viewport and
// its scroll anchor, the key-combo dispatcher, the input line, and the
// theme. The loop feeds it discrete events one at a time; there is no
// shared mutable state anywhere else.

use crate::config::Config;
use crate::events::SessionEvent;
use crate::logging::LogBuffer;
use crate::text::{split_into_lines, TagNode};
use crate::theme::Theme;
use crate::tui::keys::{self, KeyCombos};
use crate::tui::scroll::{ScrollAnchor, ScrollSurface, Viewport};
use crate::tui::scrollback::Scrollback;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use std::sync::mpsc;

/// Actions produced by key-combo callbacks and drained after dispatch.
///
/// Callbacks run synchronously inside the key-down handler but cannot
/// borrow App (they live inside its dispatcher), so they emit actions
/// through a channel instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComboAction {
    ClearScrollback,
    JumpToBottom,
    Quit,
}

pub struct App {
    pub scrollback: Scrollback,
    pub viewport: Viewport,
    pub anchor: ScrollAnchor,
    pub theme: Theme,
    pub keys: KeyCombos,
    /// Current contents of the input line.
    pub input: String,
    pub connected: bool,
    pub should_quit: bool,
    pub log_buffer: LogBuffer,
    actions: mpsc::Receiver<ComboAction>,
}

impl App {
    pub fn with_config(config: &Config, log_buffer: LogBuffer) -> Self {
        let (tx, actions) = mpsc::channel();

        let mut keys = KeyCombos::new();
        for (combo, action) in [
            (["Control", "l"], ComboAction::ClearScrollback),
            (["Control", "q"], ComboAction::Quit),
            (["Control", "End"], ComboAction::JumpToBottom),
        ] {
            let tx = tx.clone();
            keys.on(combo, move |_press| {
                let _ = tx.send(action);
            });
        }

        App {
            scrollback: Scrollback::new(config.scrollback),
            viewport: Viewport::default(),
            anchor: ScrollAnchor::with_slack(config.scroll_slack_rows),
            theme: Theme::by_name(&config.theme),
            keys,
            input: String::new(),
            connected: false,
            should_quit: false,
            log_buffer,
            actions,
        }
    }

    // ─── Session events ──────────────────────────────────────────────

    pub fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Display(chunk) => self.append_chunk(chunk),
            SessionEvent::Echo(text) => self.echo(text),
            SessionEvent::Connected => {
                self.connected = true;
                tracing::info!("connected");
            }
            SessionEvent::Disconnected => {
                self.connected = false;
                tracing::warn!("disconnected");
            }
        }
    }

    /// Split one chunk and append the result, anchoring around the
    /// mutation: measure, mutate, then scroll. Never re-splits history.
    fn append_chunk(&mut self, chunk: TagNode) {
        let lines = split_into_lines(vec![chunk]);
        if lines.is_empty() {
            return;
        }

        self.anchor.before_update(self.viewport.metrics());

        let evicted = self.scrollback.append(lines);
        self.viewport
            .set_extent(self.scrollback.len() as u32, self.viewport.client_height);
        if evicted > 0 {
            // History shifted under the window; keep a reading user on the
            // same rows. Irrelevant when anchored - the snap below wins.
            self.viewport.scroll_by(-(evicted as i32));
        }

        self.anchor.after_update(&mut self.viewport);
    }

    /// Locally echo the player's input in the fixed echo color.
    fn echo(&mut self, text: String) {
        let chunk = TagNode::element(
            "sent-text",
            [] as [(&str, &str); 0],
            vec![TagNode::Text(text + "\n")],
        );
        self.append_chunk(chunk);
    }

    // ─── Input events ────────────────────────────────────────────────

    pub fn handle_key_event(&mut self, event: KeyEvent) {
        match event.kind {
            // Repeat counts as another key-down: the dispatcher's
            // duplicate-entry semantics are part of the contract.
            KeyEventKind::Press | KeyEventKind::Repeat => {
                keys::sync_modifiers(&mut self.keys, event.modifiers);
                let id = keys::key_identifier(&event);
                if let Some(id) = &id {
                    self.keys.key_down(id.clone());
                }
                self.drain_actions();
                self.handle_local_key(&event);
                // Most terminals never report key release. Treat
                // non-modifier keys as tapped so they cannot stick;
                // modifiers are reconciled from the flags on every event.
                if let Some(id) = &id {
                    if !keys::is_modifier_identifier(id) {
                        self.keys.key_up(id);
                    }
                }
            }
            KeyEventKind::Release => {
                if let Some(id) = keys::key_identifier(&event) {
                    self.keys.key_up(&id);
                }
                keys::sync_modifiers(&mut self.keys, event.modifiers);
            }
        }
    }

    /// Non-combo keys: input-line editing and scrollback navigation.
    fn handle_local_key(&mut self, event: &KeyEvent) {
        let page = self.viewport.client_height.saturating_sub(1).max(1) as i32;

        match event.code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Esc => self.input.clear(),
            KeyCode::PageUp => self.viewport.scroll_by(-page),
            KeyCode::PageDown => self.viewport.scroll_by(page),
            KeyCode::Up => self.viewport.scroll_by(-1),
            KeyCode::Down => self.viewport.scroll_by(1),
            KeyCode::Home => self.viewport.scroll_to_top(),
            KeyCode::End => self.viewport.scroll_to_bottom(),
            KeyCode::Char(c) if !self.keys.is_modifier_key_pressed() => {
                self.input.push(c);
            }
            _ => {}
        }
    }

    fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.input);
        if text.trim().is_empty() {
            return;
        }
        tracing::debug!("input submitted: {}", text);
        self.echo(text);
    }

    pub fn handle_mouse_event(&mut self, event: MouseEvent) {
        match event.kind {
            MouseEventKind::ScrollUp => self.viewport.scroll_by(-3),
            MouseEventKind::ScrollDown => self.viewport.scroll_by(3),
            _ => {}
        }
    }

    /// The terminal lost focus: a chord interrupted by Alt-Tab must not
    /// leave keys stuck down.
    pub fn on_focus_lost(&mut self) {
        self.keys.reset();
    }

    fn drain_actions(&mut self) {
        while let Ok(action) = self.actions.try_recv() {
            match action {
                ComboAction::ClearScrollback => {
                    self.scrollback.clear();
                    self.viewport.set_extent(0, self.viewport.client_height);
                    tracing::info!("scrollback cleared");
                }
                ComboAction::JumpToBottom => self.viewport.scroll_to_bottom(),
                ComboAction::Quit => self.should_quit = true,
            }
        }
    }
}
