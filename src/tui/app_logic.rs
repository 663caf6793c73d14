use super::app_state::{SessionOutcome, StatusMessage};
use crate::entry_filter::EntryFilter;
use crate::navigator::{Entry, PARENT_MARKER, StoreNavigator};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// --- TuiApp struct and impl ---
pub struct TuiApp {
    pub(super) navigator: StoreNavigator,
    pub(super) query: String,
    pub(super) visible: Vec<Entry>,
    pub(super) selected: Option<usize>,
    pub(super) scroll_offset: usize,
    pub(super) list_viewport_height: usize,
    pub(super) status: Option<StatusMessage>,
    pub(super) quit: bool,
    pub(super) outcome: SessionOutcome,
}

impl TuiApp {
    pub fn new(navigator: StoreNavigator) -> Self {
        let mut app = TuiApp {
            navigator,
            query: String::new(),
            visible: Vec::new(),
            selected: None,
            scroll_offset: 0,
            quit: false,
            list_viewport_height: 0, // Will be updated by ui_renderer
            status: None,
            outcome: SessionOutcome::Cancelled,
        };
        app.refresh_view();
        app
    }

    pub fn into_outcome(self) -> SessionOutcome {
        self.outcome
    }

    /// Recomputes the filtered view and resets the selection, as after any
    /// navigation or query change.
    pub(super) fn refresh_view(&mut self) {
        self.visible = EntryFilter::filter(self.navigator.list(), &self.query);
        self.selected = EntryFilter::default_selection(&self.visible);
        self.scroll_offset = 0;
    }

    pub(super) fn selected_entry(&self) -> Option<&Entry> {
        self.selected.and_then(|pos| self.visible.get(pos))
    }

    /// Breadcrumb for the listing title: `/` at the root, `/Social/Work` below.
    pub(super) fn location_label(&self) -> String {
        let relative = self.navigator.relative_location();
        if relative.as_os_str().is_empty() {
            "/".to_string()
        } else {
            format!("/{}", relative.display())
        }
    }

    pub(super) fn select_next_visible_item(&mut self) {
        self.move_selection_in_visible_list(1);
    }

    pub(super) fn select_previous_visible_item(&mut self) {
        self.move_selection_in_visible_list(-1);
    }

    pub(super) fn move_selection_in_visible_list(&mut self, delta: i32) {
        if self.visible.is_empty() {
            self.selected = None;
            return;
        }
        let len = self.visible.len() as i32;
        self.selected = Some(match self.selected {
            Some(pos) => (pos as i32 + delta).rem_euclid(len) as usize,
            None if delta > 0 => 0,
            None => self.visible.len() - 1,
        });
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn ensure_selection_is_visible_in_viewport(&mut self) {
        if self.visible.is_empty() || self.list_viewport_height == 0 {
            self.scroll_offset = 0;
            return;
        }
        let list_height = self.list_viewport_height;
        if let Some(pos) = self.selected {
            if pos < self.scroll_offset {
                self.scroll_offset = pos;
            } else if pos >= self.scroll_offset + list_height {
                self.scroll_offset = pos.saturating_sub(list_height - 1);
            }
        }
        let num_visible_items = self.visible.len();
        if num_visible_items <= list_height {
            self.scroll_offset = 0;
        } else {
            self.scroll_offset = self.scroll_offset.min(num_visible_items - list_height);
        }
    }

    pub(super) fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.status = None;
        self.refresh_view();
    }

    /// Backspace: shortens the query, or goes up a level once it is empty.
    pub(super) fn pop_query_char(&mut self) {
        if self.query.pop().is_some() {
            self.status = None;
            self.refresh_view();
        } else {
            self.go_to_parent();
        }
    }

    pub(super) fn clear_query(&mut self) {
        self.query.clear();
        self.status = None;
        self.refresh_view();
    }

    pub(super) fn go_to_parent(&mut self) {
        if self.navigator.move_to(PARENT_MARKER) {
            log::debug!("back up to {}", self.navigator.current().display());
            self.status = None;
            self.refresh_view();
        } else {
            self.status = Some(StatusMessage::AtStoreRoot);
        }
    }

    pub(super) fn reload_directory(&mut self) {
        if self.navigator.refresh() {
            self.status = None;
            self.refresh_view();
        } else {
            self.status = Some(StatusMessage::Error(
                "Cannot re-read the current directory".to_string(),
            ));
        }
    }

    /// Enter: directories are opened, a secret ends the session.
    pub(super) fn activate_selected(&mut self) {
        let Some(entry) = self.selected_entry().cloned() else {
            return;
        };

        if entry.is_dir() {
            if self.navigator.move_to(entry.name()) {
                self.query.clear();
                self.status = None;
                self.refresh_view();
            } else {
                self.status = Some(StatusMessage::CannotOpen(entry.name().to_string()));
            }
            return;
        }

        match self.navigator.resolve_secret(entry.index()) {
            Ok(Some(reference)) => {
                log::info!("chose {}", reference);
                self.outcome = SessionOutcome::Chosen(reference);
                self.quit = true;
            }
            Ok(None) => {}
            Err(e) => self.status = Some(StatusMessage::Error(e.to_string())),
        }
    }

    // --- Event handling ---
    pub(super) fn handle_key_event(&mut self, key_event: KeyEvent) {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        match key_event.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if ctrl => self.quit = true,
            KeyCode::Enter => self.activate_selected(),
            KeyCode::Backspace => self.pop_query_char(),
            KeyCode::Char('u') if ctrl => self.clear_query(),
            KeyCode::Char('r') if ctrl => self.reload_directory(),
            KeyCode::Down | KeyCode::Tab => self.select_next_visible_item(),
            KeyCode::Char('n') if ctrl => self.select_next_visible_item(),
            KeyCode::Up | KeyCode::BackTab => self.select_previous_visible_item(),
            KeyCode::Char('p') if ctrl => self.select_previous_visible_item(),
            KeyCode::Char(c) if !ctrl => self.push_query_char(c),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::ListOptions;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn store() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("Social")).unwrap();
        fs::write(tmp.path().join("Social/twitter.gpg"), b"x").unwrap();
        fs::write(tmp.path().join("Social/mastodon.gpg"), b"x").unwrap();
        fs::write(tmp.path().join("bank.gpg"), b"x").unwrap();
        fs::write(tmp.path().join("email.gpg"), b"x").unwrap();
        tmp
    }

    fn app(tmp: &TempDir) -> TuiApp {
        TuiApp::new(StoreNavigator::open(tmp.path(), ListOptions::default()).unwrap())
    }

    fn press(app: &mut TuiApp, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut TuiApp, c: char) {
        app.handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_str(app: &mut TuiApp, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn visible_names(app: &TuiApp) -> Vec<&str> {
        app.visible.iter().map(Entry::name).collect()
    }

    #[test]
    fn starts_at_root_with_first_entry_selected() {
        let tmp = store();
        let app = app(&tmp);
        assert_eq!(visible_names(&app), vec!["Social", "bank", "email"]);
        assert_eq!(app.selected, Some(0));
        assert_eq!(app.location_label(), "/");
    }

    #[test]
    fn typing_filters_case_insensitively() {
        let tmp = store();
        let mut app = app(&tmp);
        type_str(&mut app, "MAIL");
        assert_eq!(visible_names(&app), vec!["email"]);
        assert_eq!(app.selected, Some(0));

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.query, "MA");
        assert_eq!(visible_names(&app), vec!["email"]);

        ctrl(&mut app, 'u');
        assert!(app.query.is_empty());
        assert_eq!(visible_names(&app), vec!["Social", "bank", "email"]);
    }

    #[test]
    fn filtering_never_changes_navigation_state() {
        let tmp = store();
        let mut app = app(&tmp);
        type_str(&mut app, "zzz");
        assert!(app.visible.is_empty());
        assert_eq!(app.selected, None);
        assert_eq!(app.navigator.list().len(), 3);

        press(&mut app, KeyCode::Enter);
        assert!(!app.quit);
    }

    #[test]
    fn enter_on_directory_descends_and_clears_query() {
        let tmp = store();
        let mut app = app(&tmp);
        type_str(&mut app, "soc");
        press(&mut app, KeyCode::Enter);

        assert!(app.query.is_empty());
        assert_eq!(app.location_label(), "/Social");
        assert_eq!(visible_names(&app), vec![PARENT_MARKER, "mastodon", "twitter"]);
        // parent marker is skipped for the initial selection
        assert_eq!(app.selected, Some(1));
    }

    #[test]
    fn backspace_on_empty_query_goes_up() {
        let tmp = store();
        let mut app = app(&tmp);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.location_label(), "/Social");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.location_label(), "/");
        assert_eq!(app.status, None);

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.location_label(), "/");
        assert_eq!(app.status, Some(StatusMessage::AtStoreRoot));
    }

    #[test]
    fn enter_on_parent_marker_goes_up() {
        let tmp = store();
        let mut app = app(&tmp);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_entry().map(Entry::name), Some(PARENT_MARKER));

        press(&mut app, KeyCode::Enter);
        assert!(app.navigator.is_at_root());
    }

    #[test]
    fn selection_wraps_around() {
        let tmp = store();
        let mut app = app(&tmp);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, Some(2));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, Some(0));
        press(&mut app, KeyCode::Tab);
        ctrl(&mut app, 'n');
        assert_eq!(app.selected, Some(2));
        ctrl(&mut app, 'p');
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn enter_on_secret_chooses_it_and_quits() {
        let tmp = store();
        let mut app = app(&tmp);
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "twit");
        press(&mut app, KeyCode::Enter);

        assert!(app.quit);
        match app.into_outcome() {
            SessionOutcome::Chosen(reference) => {
                assert_eq!(reference.as_path(), Path::new("Social").join("twitter"))
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn escape_cancels() {
        let tmp = store();
        let mut app = app(&tmp);
        press(&mut app, KeyCode::Esc);
        assert!(app.quit);
        assert_eq!(app.into_outcome(), SessionOutcome::Cancelled);

        let mut app = self::app(&tmp);
        ctrl(&mut app, 'c');
        assert!(app.quit);
    }

    #[test]
    fn vanished_directory_reports_status() {
        let tmp = store();
        let mut app = app(&tmp);
        fs::remove_dir_all(tmp.path().join("Social")).unwrap();

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.location_label(), "/");
        assert_eq!(
            app.status,
            Some(StatusMessage::CannotOpen("Social".to_string()))
        );

        ctrl(&mut app, 'r');
        assert_eq!(visible_names(&app), vec!["bank", "email"]);
        assert_eq!(app.status, None);
    }

    #[test]
    fn viewport_follows_selection() {
        let tmp = TempDir::new().unwrap();
        for i in 0..10 {
            fs::write(tmp.path().join(format!("s{}.gpg", i)), b"x").unwrap();
        }
        let mut app = app(&tmp);
        app.list_viewport_height = 3;

        for _ in 0..4 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.selected, Some(4));
        assert_eq!(app.scroll_offset, 2);

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, Some(1));
        assert_eq!(app.scroll_offset, 1);

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, Some(9));
        assert_eq!(app.scroll_offset, 7);
    }
}
