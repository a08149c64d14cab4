//! Screen selection.

/// Top-level screen. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Register,
    Notes,
}

/// Panel shown inside the notes screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NotesTab {
    #[default]
    Create,
    List,
}

/// Enablement of the two notes-screen navigation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControls {
    pub create_enabled: bool,
    pub list_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRouter {
    screen: Screen,
    tab: NotesTab,
}

impl ViewRouter {
    /// Initial-load decision: a stored token opens the notes screen.
    pub const fn initial(has_token: bool) -> Self {
        Self {
            screen: if has_token {
                Screen::Notes
            } else {
                Screen::Login
            },
            tab: NotesTab::Create,
        }
    }

    pub const fn screen(&self) -> Screen {
        self.screen
    }

    pub const fn tab(&self) -> NotesTab {
        self.tab
    }

    pub fn is_visible(&self, screen: Screen) -> bool {
        self.screen == screen
    }

    /// Swap from login to register. Ignored on the notes screen.
    pub fn go_to_register(&mut self) {
        if self.screen == Screen::Login {
            self.screen = Screen::Register;
        }
    }

    /// Swap from register to login. Ignored on the notes screen.
    pub fn go_to_login(&mut self) {
        if self.screen == Screen::Register {
            self.screen = Screen::Login;
        }
    }

    pub fn authenticated(&mut self) {
        self.screen = Screen::Notes;
        self.tab = NotesTab::Create;
    }

    pub fn logged_out(&mut self) {
        self.screen = Screen::Login;
        self.tab = NotesTab::Create;
    }

    /// Select a notes panel. Returns `false` when the tab was already active
    /// or the notes screen is not shown.
    pub fn select_tab(&mut self, tab: NotesTab) -> bool {
        if self.screen != Screen::Notes || self.tab == tab {
            return false;
        }
        self.tab = tab;
        true
    }

    /// The active tab's control is disabled; only meaningful on the notes
    /// screen, where exactly one control is enabled.
    pub fn nav_controls(&self) -> NavControls {
        let on_notes = self.screen == Screen::Notes;
        NavControls {
            create_enabled: on_notes && self.tab != NotesTab::Create,
            list_enabled: on_notes && self.tab != NotesTab::List,
        }
    }
}
