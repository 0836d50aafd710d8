//! MLS search overlay: Ctrl+K activated search against the server.
//!
//! The raw query string is forwarded to the search endpoint; no local
//! filtering happens here. Every issued search carries a ticket, and
//! dismissing the overlay (or typing a newer search) abandons in-flight
//! results: a late response is dropped, never applied to a closed view.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::Listing;

/// State for the search overlay.
#[derive(Default)]
pub struct SearchState {
    /// Whether the search overlay is active (visible).
    pub active: bool,
    /// Current MLS query string.
    pub query: String,
    /// Cursor position within the query (character offset).
    pub cursor_pos: usize,
    /// Results of the most recently applied search.
    pub results: Vec<Listing>,
    /// Index of the currently selected result.
    pub selected: usize,
    /// Whether a search is in flight.
    pub loading: bool,
    ticket: u64,
}

impl SearchState {
    /// Activate the search overlay (called on Ctrl+K).
    pub fn activate(&mut self) {
        self.active = true;
        self.query.clear();
        self.cursor_pos = 0;
        self.results.clear();
        self.selected = 0;
        self.loading = false;
    }

    /// Deactivate the overlay (Esc), abandoning any in-flight search.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.query.clear();
        self.cursor_pos = 0;
        self.results.clear();
        self.selected = 0;
        self.loading = false;
        // Outstanding responses now carry a stale ticket.
        self.ticket += 1;
    }

    /// Start a search and return the ticket the response must echo.
    pub fn begin_search(&mut self) -> u64 {
        self.ticket += 1;
        self.loading = true;
        self.ticket
    }

    /// Apply results for a finished search.
    ///
    /// Returns false (dropping the results) when the overlay was dismissed
    /// or a newer search superseded this one.
    pub fn apply_results(&mut self, ticket: u64, results: Vec<Listing>) -> bool {
        if !self.active || ticket != self.ticket {
            return false;
        }
        self.loading = false;
        self.results = results;
        self.selected = 0;
        true
    }

    /// A search finished without data (failure); existing results stay.
    pub fn finish(&mut self, ticket: u64) {
        if ticket == self.ticket {
            self.loading = false;
        }
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = self.char_to_byte(self.cursor_pos);
        self.query.insert(byte_pos, c);
        self.cursor_pos += 1;
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor_pos > 0 {
            let byte_pos = self.char_to_byte(self.cursor_pos);
            let prev_byte_pos = self.char_to_byte(self.cursor_pos - 1);
            self.query.drain(prev_byte_pos..byte_pos);
            self.cursor_pos -= 1;
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
        }
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        let char_count = self.query.chars().count();
        if self.cursor_pos < char_count {
            self.cursor_pos += 1;
        }
    }

    /// Move result selection up.
    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Move result selection down.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.results.len() {
            self.selected += 1;
        }
    }

    /// Convert a char-based cursor position to a byte offset.
    fn char_to_byte(&self, char_pos: usize) -> usize {
        self.query
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the search overlay centered near the top of the frame.
pub fn render_overlay(frame: &mut Frame, state: &SearchState) {
    let area = frame.area();

    let width = 60.min(area.width.saturating_sub(4));
    let height = 12.min(area.height.saturating_sub(2));
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + 2.min(area.height.saturating_sub(height)),
        width,
        height,
    );

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Search by MLS number ");

    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let mut lines = vec![Line::from(vec![
        Span::styled(" > ", Style::default().fg(Color::Yellow)),
        Span::styled(state.query.clone(), Style::default().fg(Color::White)),
    ])];

    if state.loading {
        lines.push(Line::from(Span::styled(
            " Searching...",
            Style::default().fg(Color::DarkGray),
        )));
    } else if state.results.is_empty() {
        lines.push(Line::from(Span::styled(
            " Enter search  Esc close",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!(" {} result(s)", state.results.len()),
            Style::default().fg(Color::Gray),
        )));
    }

    for (i, listing) in state.results.iter().enumerate() {
        if lines.len() >= inner.height as usize {
            break;
        }
        let style = if i == state.selected {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!(
                " MLS# {}  {}  ${}",
                listing.mls_number, listing.address, listing.price
            ),
            style,
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);

    // Cursor inside the query line.
    frame.set_cursor_position((inner.x + 3 + state.cursor_pos as u16, inner.y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn listing(id: i64, mls: &str) -> Listing {
        let now = Utc::now();
        Listing {
            id,
            mls_number: mls.to_string(),
            address: "123 Oak St".to_string(),
            price: 450000.0,
            compensation: String::new(),
            document: "No document".to_string(),
            agent_name: "John Doe".to_string(),
            company_name: "Respio Realty".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_results_applied_while_open() {
        let mut state = SearchState::default();
        state.activate();
        let ticket = state.begin_search();
        assert!(state.loading);

        assert!(state.apply_results(ticket, vec![listing(1, "MLS1")]));
        assert!(!state.loading);
        assert_eq!(state.results.len(), 1);
    }

    #[test]
    fn test_dismissed_overlay_drops_late_results() {
        let mut state = SearchState::default();
        state.activate();
        let ticket = state.begin_search();

        // The user closes the overlay before the response lands.
        state.deactivate();

        assert!(!state.apply_results(ticket, vec![listing(1, "LATE")]));
        assert!(state.results.is_empty());
    }

    #[test]
    fn test_newer_search_supersedes_older() {
        let mut state = SearchState::default();
        state.activate();
        let first = state.begin_search();
        let second = state.begin_search();

        assert!(!state.apply_results(first, vec![listing(1, "OLD")]));
        assert!(state.apply_results(second, vec![listing(2, "NEW")]));
        assert_eq!(state.results[0].mls_number, "NEW");
    }

    #[test]
    fn test_failed_search_keeps_existing_results() {
        let mut state = SearchState::default();
        state.activate();
        let ticket = state.begin_search();
        state.apply_results(ticket, vec![listing(1, "KEEP")]);

        let ticket = state.begin_search();
        state.finish(ticket);
        assert!(!state.loading);
        assert_eq!(state.results[0].mls_number, "KEEP");
    }

    #[test]
    fn test_query_editing() {
        let mut state = SearchState::default();
        state.activate();
        for c in "MLS12".chars() {
            state.insert_char(c);
        }
        state.backspace();
        assert_eq!(state.query, "MLS1");

        state.move_left();
        state.move_left();
        state.insert_char('X');
        assert_eq!(state.query, "MLXS1");
    }
}
