//! Compose box: the message draft input.
//!
//! The draft is the caller-held, not-yet-persisted message text. It is
//! cleared only after the send call resolves successfully; a failed send
//! leaves it in place for resubmission.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
    Frame,
};

/// State for the compose box.
#[derive(Default)]
pub struct ComposeState {
    /// Current draft text.
    pub input: String,
    /// Cursor position (character offset into `input`).
    pub cursor_pos: usize,
}

impl ComposeState {
    /// Insert a character at the current cursor position.
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = self.char_to_byte(self.cursor_pos);
        self.input.insert(byte_pos, c);
        self.cursor_pos += 1;
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor_pos > 0 {
            let byte_pos = self.char_to_byte(self.cursor_pos);
            let prev_byte_pos = self.char_to_byte(self.cursor_pos - 1);
            self.input.drain(prev_byte_pos..byte_pos);
            self.cursor_pos -= 1;
        }
    }

    /// Move cursor left by one character.
    pub fn move_left(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
        }
    }

    /// Move cursor right by one character.
    pub fn move_right(&mut self) {
        let char_count = self.input.chars().count();
        if self.cursor_pos < char_count {
            self.cursor_pos += 1;
        }
    }

    /// Clear the draft (after a successful send).
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
    }

    /// The submittable draft: trimmed text, or None when empty or
    /// whitespace-only (never sent). The draft itself stays in place.
    pub fn draft(&self) -> Option<String> {
        let text = self.input.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    /// Convert a char-based cursor position to a byte offset.
    fn char_to_byte(&self, char_pos: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Height of the compose box: 1 border + 1 input + 1 hint + 1 border.
pub const COMPOSE_HEIGHT: u16 = 4;

/// Render the compose box into the given area.
///
/// Uses `Frame` directly so we can both write to the buffer and set cursor.
pub fn render(
    area: Rect,
    frame: &mut Frame,
    state: &ComposeState,
    recipient: &str,
    focused: bool,
) {
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

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let input_area = Rect::new(inner.x, inner.y, inner.width, 1);
    let cursor = compute_cursor_position(input_area, state, focused);
    render_input(input_area, frame.buffer_mut(), state, recipient);
    if let Some((cx, cy)) = cursor {
        frame.set_cursor_position((cx, cy));
    }

    if inner.height >= 2 {
        let hint_area = Rect::new(inner.x, inner.y + 1, inner.width, 1);
        render_hint(hint_area, frame.buffer_mut(), focused);
    }
}

/// Compute the cursor position if the compose box is focused.
fn compute_cursor_position(
    input_area: Rect,
    state: &ComposeState,
    focused: bool,
) -> Option<(u16, u16)> {
    if !focused {
        return None;
    }

    if state.input.is_empty() {
        Some((input_area.x + 1, input_area.y))
    } else {
        let w = input_area.width as usize;
        let display = display_text(&state.input, state.cursor_pos, w);
        Some((input_area.x + 1 + display.cursor_offset as u16, input_area.y))
    }
}

/// Render the input line (with placeholder or text).
fn render_input(area: Rect, buf: &mut Buffer, state: &ComposeState, recipient: &str) {
    let w = area.width as usize;

    if state.input.is_empty() {
        let placeholder = format!(" Type your message to {}...", recipient);
        let truncated: String = placeholder.chars().take(w).collect();
        let line = Line::from(Span::styled(truncated, Style::default().fg(Color::DarkGray)));
        Paragraph::new(line).render(area, buf);
    } else {
        let display = display_text(&state.input, state.cursor_pos, w);
        let line = Line::from(Span::styled(
            format!(" {}", display.visible),
            Style::default().fg(Color::White),
        ));
        Paragraph::new(line).render(area, buf);
    }
}

/// Render the key-hint line under the input, right-aligned.
fn render_hint(area: Rect, buf: &mut Buffer, focused: bool) {
    let w = area.width as usize;
    let hint = "Enter send  Tab pane ";

    let style = if focused {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let hint_w = unicode_width::UnicodeWidthStr::width(hint);
    let padding = w.saturating_sub(hint_w);

    let line = Line::from(vec![
        Span::raw(" ".repeat(padding)),
        Span::styled(hint, style),
    ]);
    Paragraph::new(line).render(area, buf);
}

/// Information about what text to display and where the cursor is.
struct DisplayText {
    visible: String,
    /// Cursor offset within the visible text (in columns).
    cursor_offset: usize,
}

/// Compute the visible text and cursor offset, with horizontal scrolling
/// that keeps the cursor in view.
fn display_text(input: &str, cursor_pos: usize, width: usize) -> DisplayText {
    // One char margin on the left for the " " prefix.
    let avail = width.saturating_sub(1);
    if avail == 0 {
        return DisplayText {
            visible: String::new(),
            cursor_offset: 0,
        };
    }

    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= avail {
        return DisplayText {
            visible: input.to_string(),
            cursor_offset: cursor_pos,
        };
    }

    let scroll_start = if cursor_pos < avail {
        0
    } else {
        cursor_pos - avail + 1
    };
    let end = (scroll_start + avail).min(chars.len());

    DisplayText {
        visible: chars[scroll_start..end].iter().collect(),
        cursor_offset: cursor_pos - scroll_start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_trims_and_rejects_empty() {
        let mut state = ComposeState::default();
        assert_eq!(state.draft(), None);

        for c in "   ".chars() {
            state.insert_char(c);
        }
        assert_eq!(state.draft(), None);

        state.clear();
        for c in "  hello there ".chars() {
            state.insert_char(c);
        }
        assert_eq!(state.draft(), Some("hello there".to_string()));
    }

    #[test]
    fn test_draft_is_preserved_until_cleared() {
        let mut state = ComposeState::default();
        for c in "still here".chars() {
            state.insert_char(c);
        }

        // Submitting does not consume the draft (a failed send must be
        // able to resubmit it).
        assert_eq!(state.draft(), Some("still here".to_string()));
        assert_eq!(state.input, "still here");

        state.clear();
        assert_eq!(state.input, "");
        assert_eq!(state.cursor_pos, 0);
    }

    #[test]
    fn test_editing_moves_cursor() {
        let mut state = ComposeState::default();
        for c in "abc".chars() {
            state.insert_char(c);
        }
        assert_eq!(state.cursor_pos, 3);

        state.move_left();
        state.backspace();
        assert_eq!(state.input, "ac");
        assert_eq!(state.cursor_pos, 1);

        state.move_right();
        state.insert_char('!');
        assert_eq!(state.input, "ac!");
    }

    #[test]
    fn test_display_text_scrolls_to_cursor() {
        let input = "abcdefghij";
        let d = display_text(input, 10, 6); // avail = 5
        assert_eq!(d.visible, "ghij");
        assert_eq!(d.cursor_offset, 4);

        let d = display_text(input, 2, 6);
        assert_eq!(d.visible, "abcde");
        assert_eq!(d.cursor_offset, 2);
    }
}
