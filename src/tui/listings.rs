//! Listings pane: the active listings collection with load tracking.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::models::Listing;

/// Listings state: owns the collection and is its single mutation point.
///
/// Loads are tagged with a ticket; a response whose ticket no longer
/// matches (a newer load was issued meanwhile) is dropped, never applied.
pub struct ListingsState {
    pub listings: Vec<Listing>,
    pub selected: usize,
    /// Whether a load is still in flight.
    pub loading: bool,
    ticket: u64,
}

impl Default for ListingsState {
    fn default() -> Self {
        Self {
            listings: Vec::new(),
            selected: 0,
            loading: false,
            ticket: 0,
        }
    }
}

impl ListingsState {
    /// Start a load and return the ticket the response must echo.
    pub fn begin_load(&mut self) -> u64 {
        self.ticket += 1;
        self.loading = true;
        self.ticket
    }

    /// Replace the collection with a freshly loaded set.
    ///
    /// Returns false (and leaves the collection untouched) when the ticket
    /// is stale.
    pub fn apply_loaded(&mut self, ticket: u64, listings: Vec<Listing>) -> bool {
        if ticket != self.ticket {
            return false;
        }
        self.loading = false;
        self.listings = listings;
        self.clamp_selection();
        true
    }

    /// A load finished without data (failure). Previously displayed
    /// listings stay as they are.
    pub fn finish_load(&mut self, ticket: u64) {
        if ticket == self.ticket {
            self.loading = false;
        }
    }

    /// Append a server-created listing.
    pub fn apply_created(&mut self, listing: Listing) {
        self.listings.push(listing);
    }

    /// Move selection up by one listing.
    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Move selection down by one listing.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.listings.len() {
            self.selected += 1;
        }
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.listings.len() {
            self.selected = self.listings.len().saturating_sub(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Rows each listing card occupies.
const CARD_HEIGHT: usize = 5;

/// Render the listings pane into the given area.
pub fn render(area: Rect, buf: &mut Buffer, state: &ListingsState, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let border_type = if focused {
        BorderType::Double
    } else {
        BorderType::Plain
    };

    let title = if state.loading {
        " Active Listings (loading...) ".to_string()
    } else {
        format!(" Active Listings ({}) ", state.listings.len())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .title(title);

    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if state.listings.is_empty() {
        let hint = if state.loading {
            " Loading..."
        } else {
            " No listings. Press 'n' to create one."
        };
        let line = Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)));
        Paragraph::new(line).render(Rect::new(inner.x, inner.y, inner.width, 1), buf);
        return;
    }

    let visible = (inner.height as usize) / CARD_HEIGHT;
    let scroll_offset = if visible == 0 || state.selected < visible {
        0
    } else {
        state.selected + 1 - visible
    };

    for (row, idx) in (scroll_offset..state.listings.len())
        .take(visible.max(1))
        .enumerate()
    {
        let y = inner.y + (row * CARD_HEIGHT) as u16;
        if y + CARD_HEIGHT as u16 > inner.y + inner.height {
            break;
        }
        let card = Rect::new(inner.x, y, inner.width, CARD_HEIGHT as u16);
        render_card(card, buf, &state.listings[idx], idx == state.selected && focused);
    }
}

fn render_card(area: Rect, buf: &mut Buffer, listing: &Listing, selected: bool) {
    let base = if selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };

    let header = Line::from(vec![
        Span::styled(
            format!(" {}", listing.agent_name),
            base.add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", listing.company_name), base.fg(Color::Gray)),
    ]);

    let address = Line::from(Span::styled(format!(" {}", listing.address), base));

    let numbers = Line::from(vec![
        Span::styled(format!(" MLS# {}", listing.mls_number), base.fg(Color::Cyan)),
        Span::styled(format!("  ${}", listing.price), base.fg(Color::Green)),
        Span::styled(
            if listing.compensation.is_empty() {
                String::new()
            } else {
                format!("  Compensation: {}", listing.compensation)
            },
            base.fg(Color::Yellow),
        ),
    ]);

    let document = Line::from(Span::styled(
        format!(" Document: {}", listing.document),
        base.fg(Color::DarkGray),
    ));

    let stamps = Line::from(Span::styled(
        format!(
            " Created: {}  Updated: {}",
            listing.created_at.format("%Y-%m-%d %H:%M"),
            listing.updated_at.format("%Y-%m-%d %H:%M")
        ),
        base.fg(Color::DarkGray),
    ));

    Paragraph::new(vec![header, address, numbers, document, stamps]).render(area, buf);
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
            compensation: "2.5%".to_string(),
            document: "No document".to_string(),
            agent_name: "John Doe".to_string(),
            company_name: "Respio Realty".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_apply_loaded_with_current_ticket() {
        let mut state = ListingsState::default();
        let ticket = state.begin_load();
        assert!(state.loading);

        assert!(state.apply_loaded(ticket, vec![listing(1, "A"), listing(2, "B")]));
        assert!(!state.loading);
        assert_eq!(state.listings.len(), 2);
    }

    #[test]
    fn test_stale_load_is_dropped() {
        let mut state = ListingsState::default();
        let old = state.begin_load();
        let new = state.begin_load();

        // The older response resolves late -- it must not be applied.
        assert!(!state.apply_loaded(old, vec![listing(1, "STALE")]));
        assert!(state.listings.is_empty());
        assert!(state.loading);

        assert!(state.apply_loaded(new, vec![listing(2, "FRESH")]));
        assert_eq!(state.listings[0].mls_number, "FRESH");
    }

    #[test]
    fn test_failed_load_keeps_previous_listings() {
        let mut state = ListingsState::default();
        let ticket = state.begin_load();
        assert!(state.apply_loaded(ticket, vec![listing(1, "A")]));

        // A refresh that fails leaves the displayed set unchanged.
        let ticket = state.begin_load();
        state.finish_load(ticket);
        assert!(!state.loading);
        assert_eq!(state.listings.len(), 1);
        assert_eq!(state.listings[0].mls_number, "A");
    }

    #[test]
    fn test_apply_created_appends() {
        let mut state = ListingsState::default();
        let ticket = state.begin_load();
        state.apply_loaded(ticket, vec![listing(1, "A")]);

        state.apply_created(listing(2, "B"));
        assert_eq!(state.listings.len(), 2);
        assert_eq!(state.listings[1].mls_number, "B");
    }

    #[test]
    fn test_selection_clamped_after_reload() {
        let mut state = ListingsState::default();
        let ticket = state.begin_load();
        state.apply_loaded(ticket, vec![listing(1, "A"), listing(2, "B"), listing(3, "C")]);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 2);

        let ticket = state.begin_load();
        state.apply_loaded(ticket, vec![listing(1, "A")]);
        assert_eq!(state.selected, 0);
    }
}
