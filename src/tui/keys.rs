// Key-combo dispatcher
//
// Tracks the ordered set of currently-held keys and fires callbacks
// registered against exact held-key sequences. Order is part of the
// signature: pressing Control then L is a different combo than L then
// Control. That is deliberate - listeners register the exact chord they
// mean.
//
// Key-repeat quirk: a repeated key-down without an intervening key-up
// appends a duplicate entry, changing the signature. This mirrors the
// observed behavior of the protocol this client speaks; see the tests
// before "fixing" it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};
use std::collections::HashMap;

/// Keys whose presence makes [`KeyCombos::is_modifier_key_pressed`] true.
pub const MODIFIER_KEYS: [&str; 3] = ["Control", "Alt", "Meta"];

/// Whether an identifier names a modifier key (Shift included - it chords
/// but does not count as a modifier for the query above).
pub fn is_modifier_identifier(id: &str) -> bool {
    matches!(id, "Shift" | "Control" | "Alt" | "Meta")
}

/// The event handed to combo callbacks: the key-down that completed the
/// signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
}

type Callback = Box<dyn FnMut(&KeyPress) + Send>;

/// Stateful combo tracker. One instance per input surface; it owns the
/// held-key sequence and the listener table exclusively.
#[derive(Default)]
pub struct KeyCombos {
    /// Held keys in press order. Duplicates possible under key-repeat.
    keys_down: Vec<String>,
    /// Exact signature -> callbacks in registration order.
    listeners: HashMap<Vec<String>, Vec<Callback>>,
}

impl KeyCombos {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for an exact held-key sequence. Multiple
    /// callbacks may share a signature; all fire, in registration order.
    pub fn on<I, S>(&mut self, combo: I, callback: impl FnMut(&KeyPress) + Send + 'static)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let signature: Vec<String> = combo.into_iter().map(Into::into).collect();
        self.listeners
            .entry(signature)
            .or_default()
            .push(Box::new(callback));
    }

    /// A key went down: append it and dispatch any listener registered for
    /// the resulting full sequence. A miss is a silent no-op.
    pub fn key_down(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.keys_down.push(key.clone());

        let signature = self.keys_down.clone();
        if let Some(callbacks) = self.listeners.get_mut(&signature) {
            let press = KeyPress { key };
            for callback in callbacks {
                callback(&press);
            }
        }
    }

    /// A key went up: remove every occurrence (key-repeat may have stacked
    /// several).
    pub fn key_up(&mut self, key: &str) {
        self.keys_down.retain(|k| k != key);
    }

    /// Focus was lost: drop all held keys unconditionally so a chord
    /// interrupted by Alt-Tab cannot stick.
    pub fn reset(&mut self) {
        self.keys_down.clear();
    }

    /// Currently-held keys in press order.
    pub fn keys_down(&self) -> &[String] {
        &self.keys_down
    }

    /// Whether Control, Alt, or Meta is currently held.
    pub fn is_modifier_key_pressed(&self) -> bool {
        self.keys_down
            .iter()
            .any(|k| MODIFIER_KEYS.contains(&k.as_str()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Crossterm adaptation
// ─────────────────────────────────────────────────────────────────────────────

/// Identifier for a crossterm key event, DOM-style: characters verbatim,
/// named keys by name. Keys with no stable identifier return None.
pub fn key_identifier(event: &KeyEvent) -> Option<String> {
    let id = match event.code {
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::F(n) => return Some(format!("F{n}")),
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Escape",
        KeyCode::Backspace => "Backspace",
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::Insert => "Insert",
        KeyCode::Delete => "Delete",
        KeyCode::Modifier(m) => modifier_identifier(m)?,
        _ => return None,
    };
    Some(id.to_string())
}

fn modifier_identifier(code: ModifierKeyCode) -> Option<&'static str> {
    match code {
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => Some("Shift"),
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => Some("Control"),
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => Some("Alt"),
        ModifierKeyCode::LeftSuper
        | ModifierKeyCode::RightSuper
        | ModifierKeyCode::LeftMeta
        | ModifierKeyCode::RightMeta => Some("Meta"),
        _ => None,
    }
}

/// Reconcile the held-modifier state with a crossterm modifier set.
///
/// Most terminals never deliver modifier keys as their own press/release
/// events - they arrive as flags on the next real key. Before dispatching
/// that key we bring the tracker in line: newly-set modifiers are pressed
/// (once - flags are level-triggered, so no duplicates), cleared ones are
/// released. Modifiers-first ordering is what makes ["Control", "l"] the
/// natural registration.
pub fn sync_modifiers(combos: &mut KeyCombos, modifiers: KeyModifiers) {
    const FLAGS: [(KeyModifiers, &str); 4] = [
        (KeyModifiers::SHIFT, "Shift"),
        (KeyModifiers::CONTROL, "Control"),
        (KeyModifiers::ALT, "Alt"),
        (KeyModifiers::SUPER, "Meta"),
    ];

    for (flag, id) in FLAGS {
        let held = combos.keys_down().iter().any(|k| k == id);
        if modifiers.contains(flag) && !held {
            combos.key_down(id);
        } else if !modifiers.contains(flag) && held {
            combos.key_up(id);
        }
    }
}
