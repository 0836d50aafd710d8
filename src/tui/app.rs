//! TUI application state and main event loop

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;

use super::backend::{Backend, BackendCommand, BackendResponse};
use super::chats::ChatsState;
use super::compose::ComposeState;
use super::form::ListingFormState;
use super::listings::ListingsState;
use super::search::SearchState;
use super::ui;
use crate::config::Config;
use crate::models::MessageDraft;

/// Target frame rate for UI updates (~30 fps)
const FRAME_DURATION_MS: u64 = 33;

/// How long a transient status notification stays visible.
const STATUS_TTL: Duration = Duration::from_secs(4);

/// Active pane in the TUI
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Listings,
    Chats,
    Compose,
}

impl Pane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pane::Listings => "listings",
            Pane::Chats => "chats",
            Pane::Compose => "compose",
        }
    }

    fn next(self) -> Self {
        match self {
            Pane::Listings => Pane::Chats,
            Pane::Chats => Pane::Compose,
            Pane::Compose => Pane::Listings,
        }
    }
}

/// Application state: one container per concern, each the single mutation
/// point for its entity, updated only after the matching call resolves.
pub struct App {
    /// Whether the app should exit
    pub should_exit: bool,
    /// Local agent identity (senderId on outgoing messages)
    pub agent_id: i64,
    pub agent_name: String,
    /// Active pane
    pub active_pane: Pane,
    pub listings: ListingsState,
    pub chats: ChatsState,
    pub compose: ComposeState,
    pub search: SearchState,
    pub form: ListingFormState,
    /// Transient status notification
    pub status_message: Option<String>,
    pub status_is_error: bool,
    status_set_at: Option<Instant>,
    backend: Backend,
}

impl App {
    /// Build the app and kick off the initial listings load.
    pub fn new(backend: Backend, agent_id: i64, agent_name: String) -> Self {
        let mut app = Self {
            should_exit: false,
            agent_id,
            chats: ChatsState::seeded(agent_id, &agent_name),
            agent_name,
            active_pane: Pane::default(),
            listings: ListingsState::default(),
            compose: ComposeState::default(),
            search: SearchState::default(),
            form: ListingFormState::default(),
            status_message: None,
            status_is_error: false,
            status_set_at: None,
            backend,
        };
        app.refresh_listings();
        app
    }

    /// Issue a (re)load of the listings collection.
    pub fn refresh_listings(&mut self) {
        let ticket = self.listings.begin_load();
        self.backend.send(BackendCommand::LoadListings { ticket });
    }

    // -----------------------------------------------------------------
    // Input handling
    // -----------------------------------------------------------------

    /// Handle input events
    pub fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(FRAME_DURATION_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    self.handle_key(key);
                }
                Event::Resize(_, _) => {
                    // Terminal resized - will be handled on next draw
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.search.active {
            self.handle_search_key(key);
            return;
        }
        if self.form.active {
            self.handle_form_key(key);
            return;
        }

        // Ctrl+K opens search from anywhere.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('k') {
            self.search.activate();
            return;
        }

        match key.code {
            KeyCode::Tab => self.active_pane = self.active_pane.next(),
            KeyCode::Char('q') if self.active_pane != Pane::Compose => {
                self.should_exit = true;
            }
            KeyCode::Char('r') if self.active_pane != Pane::Compose => {
                self.refresh_listings();
            }
            KeyCode::Char('n') if self.active_pane != Pane::Compose => {
                self.form.open();
            }
            _ => match self.active_pane {
                Pane::Listings => self.handle_listings_key(key),
                Pane::Chats => self.handle_chats_key(key),
                Pane::Compose => self.handle_compose_key(key),
            },
        }
    }

    fn handle_listings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.listings.select_previous(),
            KeyCode::Down => self.listings.select_next(),
            _ => {}
        }
    }

    fn handle_chats_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.chats.select_previous(),
            KeyCode::Down => self.chats.select_next(),
            KeyCode::Enter => self.active_pane = Pane::Compose,
            _ => {}
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_message(),
            KeyCode::Esc => self.active_pane = Pane::Chats,
            KeyCode::Backspace => self.compose.backspace(),
            KeyCode::Left => self.compose.move_left(),
            KeyCode::Right => self.compose.move_right(),
            KeyCode::Char(c) => self.compose.insert_char(c),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.search.deactivate(),
            KeyCode::Enter => {
                let ticket = self.search.begin_search();
                self.backend.send(BackendCommand::SearchListings {
                    query: self.search.query.clone(),
                    ticket,
                });
            }
            KeyCode::Up => self.search.select_previous(),
            KeyCode::Down => self.search.select_next(),
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Char(c) => self.search.insert_char(c),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.form.close(),
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.previous_field(),
            KeyCode::Enter => self.submit_listing(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) => self.form.insert_char(c),
            _ => {}
        }
    }

    /// Submit the compose draft to the selected chat. The draft stays in
    /// the compose box until the send resolves successfully.
    fn submit_message(&mut self) {
        let Some(chat) = self.chats.selected_chat() else {
            return;
        };
        let Some(content) = self.compose.draft() else {
            return;
        };

        let receiver_id = chat
            .other_participant(self.agent_id)
            .map(|p| p.id)
            .unwrap_or(0);

        self.backend.send(BackendCommand::SendMessage {
            chat_id: chat.id,
            draft: MessageDraft {
                content,
                sender_id: self.agent_id,
                receiver_id,
            },
        });
    }

    /// Validate the form and submit the draft; an invalid price never
    /// leaves the form.
    fn submit_listing(&mut self) {
        if self.form.submitting {
            return;
        }
        let Some(draft) = self.form.draft() else {
            return;
        };
        self.form.submitting = true;
        self.backend.send(BackendCommand::CreateListing { draft });
    }

    // -----------------------------------------------------------------
    // Backend responses
    // -----------------------------------------------------------------

    /// Drain and apply all responses the backend has produced so far.
    pub fn drain_backend(&mut self) {
        while let Some(resp) = self.backend.try_recv() {
            self.apply_response(resp);
        }
    }

    /// Apply one backend response to the owning state container.
    ///
    /// Local state is mutated only on success; failures surface as a
    /// status notification and leave the containers untouched.
    pub fn apply_response(&mut self, resp: BackendResponse) {
        match resp {
            BackendResponse::Listings { ticket, result } => match result {
                Ok(listings) => {
                    self.listings.apply_loaded(ticket, listings);
                }
                Err(e) => {
                    self.listings.finish_load(ticket);
                    self.set_error(format!("Failed to load listings: {}", e));
                }
            },
            BackendResponse::SearchResults { ticket, result } => match result {
                Ok(results) => {
                    self.search.apply_results(ticket, results);
                }
                Err(e) => {
                    self.search.finish(ticket);
                    self.set_error(format!("Failed to search listings: {}", e));
                }
            },
            BackendResponse::ListingCreated(result) => match result {
                Ok(listing) => {
                    self.listings.apply_created(listing);
                    self.form.clear_and_close();
                    self.set_status("New listing created successfully.");
                }
                Err(e) => {
                    self.form.submitting = false;
                    self.set_error(format!("Failed to create listing: {}", e));
                }
            },
            BackendResponse::MessageSent { chat_id, result } => match result {
                Ok(message) => {
                    self.chats.apply_sent(chat_id, message);
                    self.compose.clear();
                    self.set_status("Message sent.");
                }
                Err(e) => {
                    // Draft stays in the compose box for resubmission.
                    self.set_error(format!("Failed to send message: {}", e));
                }
            },
            BackendResponse::ClientError(e) => self.set_error(e),
        }
    }

    // -----------------------------------------------------------------
    // Status notifications
    // -----------------------------------------------------------------

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
        self.status_set_at = Some(Instant::now());
    }

    fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.status_message = Some(message);
        self.status_is_error = true;
        self.status_set_at = Some(Instant::now());
    }

    /// Expire the transient status notification.
    pub fn tick_status(&mut self) {
        if let Some(set_at) = self.status_set_at {
            if set_at.elapsed() >= STATUS_TTL {
                self.status_message = None;
                self.status_set_at = None;
            }
        }
    }

    /// Render the UI
    pub fn render(&self, frame: &mut ratatui::Frame) {
        ui::render(frame, self);
    }
}

/// Run the TUI application with panic-safe terminal restore
pub async fn run() -> Result<()> {
    let config = Config::load()?;
    let backend = Backend::start();
    let app = App::new(backend, config.agent_id, config.agent_name);

    let mut terminal = ratatui::init();
    let result = catch_unwind(AssertUnwindSafe(|| run_app(&mut terminal, app)));
    ratatui::restore();

    match result {
        Ok(r) => r,
        Err(e) => std::panic::resume_unwind(e),
    }
}

fn run_app(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
    while !app.should_exit {
        app.drain_backend();
        app.tick_status();
        terminal.draw(|frame| app.render(frame))?;
        app.handle_events()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TransportError;
    use crate::models::{Listing, Message};
    use chrono::Utc;

    fn test_app() -> App {
        let (backend, _cmd_rx, _resp_tx) = Backend::detached();
        App::new(backend, 1, "John Doe".to_string())
    }

    fn listing(id: i64, mls: &str) -> Listing {
        let now = Utc::now();
        Listing {
            id,
            mls_number: mls.to_string(),
            address: "123 Oak St".to_string(),
            price: 450000.0,
            compensation: "2.5%".to_string(),
            document: "No document".to_string(),
            agent_name: "John Doe".to_string(),
            company_name: "Respio Realty".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn timeout() -> TransportError {
        TransportError::Timeout {
            url: "http://localhost:3001/api/listings".to_string(),
        }
    }

    #[test]
    fn test_failed_load_leaves_displayed_listings_unchanged() {
        let mut app = test_app();

        let ticket = app.listings.begin_load();
        app.apply_response(BackendResponse::Listings {
            ticket,
            result: Ok(vec![listing(1, "A"), listing(2, "B")]),
        });
        assert_eq!(app.listings.listings.len(), 2);

        // A refresh that times out reports the error and overwrites
        // nothing.
        let ticket = app.listings.begin_load();
        app.apply_response(BackendResponse::Listings {
            ticket,
            result: Err(timeout()),
        });

        assert_eq!(app.listings.listings.len(), 2);
        assert!(app.status_is_error);
        assert!(app
            .status_message
            .as_deref()
            .unwrap()
            .contains("Failed to load listings"));
    }

    #[test]
    fn test_successful_send_appends_and_clears_compose() {
        let mut app = test_app();
        for c in "Sure, it's available.".chars() {
            app.compose.insert_char(c);
        }

        let message = Message {
            id: 9,
            sender_id: 1,
            receiver_id: 2,
            content: "Sure, it's available.".to_string(),
            timestamp: Utc::now(),
        };
        app.apply_response(BackendResponse::MessageSent {
            chat_id: 1,
            result: Ok(message),
        });

        let chat = &app.chats.chats[0];
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.last_message, "Sure, it's available.");
        assert_eq!(app.compose.input, "");
        assert!(!app.status_is_error);
    }

    #[test]
    fn test_failed_send_preserves_compose_draft() {
        let mut app = test_app();
        for c in "try again later".chars() {
            app.compose.insert_char(c);
        }

        app.apply_response(BackendResponse::MessageSent {
            chat_id: 1,
            result: Err(timeout()),
        });

        assert_eq!(app.compose.input, "try again later");
        assert_eq!(app.chats.chats[0].messages.len(), 1);
        assert!(app.status_is_error);
    }

    #[test]
    fn test_created_listing_appends_and_resets_form() {
        let mut app = test_app();
        app.form.open();
        app.form.mls_number = "MLS9".to_string();
        app.form.price = "100".to_string();
        app.form.submitting = true;

        app.apply_response(BackendResponse::ListingCreated(Ok(listing(5, "MLS9"))));

        assert_eq!(app.listings.listings.len(), 1);
        assert!(!app.form.active);
        assert!(app.form.mls_number.is_empty());
    }

    #[test]
    fn test_failed_create_keeps_form_open_with_draft() {
        let mut app = test_app();
        app.form.open();
        app.form.mls_number = "MLS9".to_string();
        app.form.price = "100".to_string();
        app.form.submitting = true;

        app.apply_response(BackendResponse::ListingCreated(Err(timeout())));

        assert!(app.form.active);
        assert!(!app.form.submitting);
        assert_eq!(app.form.mls_number, "MLS9");
        assert!(app.listings.listings.is_empty());
    }

    #[test]
    fn test_search_results_dropped_after_dismissal() {
        let mut app = test_app();
        app.search.activate();
        let ticket = app.search.begin_search();
        app.search.deactivate();

        app.apply_response(BackendResponse::SearchResults {
            ticket,
            result: Ok(vec![listing(1, "LATE")]),
        });

        assert!(app.search.results.is_empty());
    }
}
