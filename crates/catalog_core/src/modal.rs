//! crates/catalog_core/src/modal.rs
//!
//! The product dialog and the controller that decides what its confirm
//! button does.

use std::fmt;

/// Which action the dialog is open for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalMode {
    #[default]
    None,
    Create,
    Edit,
    Delete,
}

impl ModalMode {
    /// Whether fields may be edited in this mode.
    pub fn is_editable(self) -> bool {
        matches!(self, ModalMode::Create | ModalMode::Edit)
    }
}

impl fmt::Display for ModalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ModalMode::None => "none",
            ModalMode::Create => "create",
            ModalMode::Edit => "edit",
            ModalMode::Delete => "delete",
        };
        f.write_str(label)
    }
}

/// Dialog options fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogOptions {
    /// Whether a keyboard shortcut may close the dialog.
    pub keyboard_dismiss: bool,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            keyboard_dismiss: false,
        }
    }
}

/// A single dialog instance. Shown or hidden, nothing in between.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dialog {
    visible: bool,
    options: DialogOptions,
}

impl Dialog {
    pub fn new(options: DialogOptions) -> Self {
        Self {
            visible: false,
            options,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn options(&self) -> DialogOptions {
        self.options
    }
}

/// Owns the dialog and the current mode.
///
/// Closing only hides the dialog; the last mode is kept but reported as
/// inactive until the next `open`.
#[derive(Debug, Clone, Default)]
pub struct ModalController {
    mode: ModalMode,
    dialog: Dialog,
}

impl ModalController {
    pub fn new(options: DialogOptions) -> Self {
        Self {
            mode: ModalMode::None,
            dialog: Dialog::new(options),
        }
    }

    pub fn open(&mut self, mode: ModalMode) {
        self.mode = mode;
        self.dialog.show();
    }

    pub fn close(&mut self) {
        self.dialog.hide();
    }

    /// The last mode set by `open`, whether or not the dialog is visible.
    pub fn mode(&self) -> ModalMode {
        self.mode
    }

    /// The mode that is currently in effect: `None` while hidden.
    pub fn active_mode(&self) -> ModalMode {
        if self.dialog.is_visible() {
            self.mode
        } else {
            ModalMode::None
        }
    }

    pub fn is_open(&self) -> bool {
        self.dialog.is_visible()
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }
}
