//! Keyboard shortcuts and the editor commands they trigger.

use serde::{Deserialize, Serialize};

/// Keyboard modifier state. `meta` (Cmd on macOS) counts as ctrl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };

    fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Something the editor can be asked to do from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorCommand {
    Undo,
    Redo,
    Save,
    DeleteSelection,
    Deselect,
    ZoomIn,
    ZoomOut,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub command: EditorCommand,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: EditorCommand,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key) && self.ctrl == modifiers.command() && self.shift == modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use EditorCommand::*;

        vec![
            Shortcut::new("Z", true, false, Undo, "Undo"),
            Shortcut::new("Y", true, false, Redo, "Redo"),
            Shortcut::new("Z", true, true, Redo, "Redo"),
            Shortcut::new("S", true, false, Save, "Save now"),
            Shortcut::new("Delete", false, false, DeleteSelection, "Delete selected element"),
            Shortcut::new("Backspace", false, false, DeleteSelection, "Delete selected element"),
            Shortcut::new("Escape", false, false, Deselect, "Clear selection"),
            Shortcut::new("=", true, false, ZoomIn, "Zoom in"),
            Shortcut::new("-", true, false, ZoomOut, "Zoom out"),
        ]
    }

    /// The command bound to a key press, if any.
    pub fn lookup(key: &str, modifiers: Modifiers) -> Option<EditorCommand> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, modifiers))
            .map(|s| s.command)
    }

    /// Render the shortcut table, one shortcut per line.
    pub fn describe() -> String {
        Self::all()
            .iter()
            .map(|s| format!("  {:20} {}", s.format(), s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
