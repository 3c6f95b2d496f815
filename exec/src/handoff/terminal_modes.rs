// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Which terminal modes [`crate::CrosstermHostTerminal`] manages for the host app. They
/// are turned on by [`enter()`], turned off on release, and turned back on by restore.
///
/// The alternate screen is special: restore only re-enters it if it was active when the
/// terminal was released.
///
/// [`enter()`]: crate::CrosstermHostTerminal::enter
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalModes {
    pub alternate_screen: bool,
    pub mouse_capture: bool,
    pub bracketed_paste: bool,
    pub focus_change: bool,
    pub hide_cursor: bool,
}

impl Default for TerminalModes {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            mouse_capture: true,
            bracketed_paste: false,
            focus_change: false,
            hide_cursor: true,
        }
    }
}

impl TerminalModes {
    /// Nothing but raw mode. Useful for inline (non full screen) apps.
    #[must_use]
    pub fn raw_mode_only() -> Self {
        Self {
            alternate_screen: false,
            mouse_capture: false,
            bracketed_paste: false,
            focus_change: false,
            hide_cursor: false,
        }
    }

    #[must_use]
    pub fn with_alternate_screen(mut self, enabled: bool) -> Self {
        self.alternate_screen = enabled;
        self
    }

    #[must_use]
    pub fn with_mouse_capture(mut self, enabled: bool) -> Self {
        self.mouse_capture = enabled;
        self
    }

    #[must_use]
    pub fn with_bracketed_paste(mut self, enabled: bool) -> Self {
        self.bracketed_paste = enabled;
        self
    }

    #[must_use]
    pub fn with_focus_change(mut self, enabled: bool) -> Self {
        self.focus_change = enabled;
        self
    }

    #[must_use]
    pub fn with_hide_cursor(mut self, enabled: bool) -> Self {
        self.hide_cursor = enabled;
        self
    }
}
