//! Keyboard reordering
//!
//! Non-pointer access to the same reorder path: arrow keys move a focus
//! marker through the list, Enter/Space confirms a move of the active item
//! to the focused position, Escape cancels. Recognized keys report
//! `prevent_default` so the host suppresses scrolling; anything else passes
//! through.

/// Keys the adapter understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderKey {
    MoveFocusUp,
    MoveFocusDown,
    Confirm,
    Cancel,
    Other,
}

impl ReorderKey {
    /// Map a DOM-style key name (`KeyboardEvent.key`).
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowUp" => Self::MoveFocusUp,
            "ArrowDown" => Self::MoveFocusDown,
            "Enter" | " " => Self::Confirm,
            "Escape" => Self::Cancel,
            _ => Self::Other,
        }
    }

    pub fn is_recognized(self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// Move requested by a confirm key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardMove {
    pub source: usize,
    pub drop: usize,
}

/// Result of feeding one key to the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    pub prevent_default: bool,
    pub action: Option<KeyboardMove>,
}

impl KeyOutcome {
    fn handled() -> Self {
        Self {
            prevent_default: true,
            action: None,
        }
    }

    fn ignored() -> Self {
        Self {
            prevent_default: false,
            action: None,
        }
    }
}

/// Focus marker and keyboard-dragging flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardReorder {
    focused: Option<usize>,
    dragging: bool,
}

impl KeyboardReorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// An item received focus.
    pub fn focus(&mut self, index: usize) {
        self.focused = Some(index);
    }

    /// Focus left the list.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Feed a key for the item at `active_index` in a list of `len` items.
    ///
    /// A confirm that yields a move leaves the adapter in the dragging
    /// state; call [`finish`](Self::finish) once the reorder has been
    /// issued.
    pub fn handle_key(&mut self, key: ReorderKey, active_index: usize, len: usize) -> KeyOutcome {
        match key {
            ReorderKey::MoveFocusUp => {
                let from = self.focused.unwrap_or(active_index);
                if len > 0 {
                    self.focused = Some(from.saturating_sub(1).min(len - 1));
                }
                KeyOutcome::handled()
            }
            ReorderKey::MoveFocusDown => {
                let from = self.focused.unwrap_or(active_index);
                if len > 0 {
                    self.focused = Some((from + 1).min(len - 1));
                }
                KeyOutcome::handled()
            }
            ReorderKey::Confirm => match self.focused {
                Some(focused) if focused != active_index => {
                    self.dragging = true;
                    KeyOutcome {
                        prevent_default: true,
                        action: Some(KeyboardMove {
                            source: active_index,
                            drop: focused,
                        }),
                    }
                }
                _ => KeyOutcome::handled(),
            },
            ReorderKey::Cancel => {
                self.focused = None;
                self.dragging = false;
                KeyOutcome::handled()
            }
            ReorderKey::Other => KeyOutcome::ignored(),
        }
    }

    /// Clear the dragging flag and focus after a confirmed move.
    pub fn finish(&mut self) {
        self.dragging = false;
        self.focused = None;
    }
}
