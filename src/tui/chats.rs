//! Chats pane: seeded conversations and the message history view.

use chrono::Utc;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::models::{Chat, Message, Participant};

/// Chats state: the conversation collection and its single mutation point.
///
/// Chats are seeded locally -- there is no fetch-chats operation -- and
/// only grow by appending persisted outbound messages.
pub struct ChatsState {
    pub chats: Vec<Chat>,
    pub selected: usize,
}

impl ChatsState {
    /// Seed the conversation list the way the dashboard starts out.
    pub fn seeded(agent_id: i64, agent_name: &str) -> Self {
        let now = Utc::now();

        let mk = |id: i64, other: Participant, content: &str, msg_sender: i64| Chat {
            id,
            participants: vec![
                Participant {
                    id: agent_id,
                    name: agent_name.to_string(),
                },
                other,
            ],
            last_message: content.to_string(),
            timestamp: now,
            messages: vec![Message {
                id: 1,
                sender_id: msg_sender,
                receiver_id: agent_id,
                content: content.to_string(),
                timestamp: now,
            }],
        };

        Self {
            chats: vec![
                mk(
                    1,
                    Participant {
                        id: 2,
                        name: "Jane Smith".to_string(),
                    },
                    "Hi, I'm interested in your property.",
                    2,
                ),
                mk(
                    2,
                    Participant {
                        id: 3,
                        name: "Bob Johnson".to_string(),
                    },
                    "Is the house still available?",
                    3,
                ),
            ],
            selected: 0,
        }
    }

    pub fn selected_chat(&self) -> Option<&Chat> {
        self.chats.get(self.selected)
    }

    /// Apply a persisted outbound message to exactly the matching chat,
    /// recomputing its denormalized summary. Other chats are untouched.
    ///
    /// Returns false when no chat with that id exists (nothing applied).
    pub fn apply_sent(&mut self, chat_id: i64, message: Message) -> bool {
        match self.chats.iter_mut().find(|c| c.id == chat_id) {
            Some(chat) => {
                chat.push_message(message);
                true
            }
            None => false,
        }
    }

    /// Move selection up by one chat.
    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Move selection down by one chat.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.chats.len() {
            self.selected += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the chat list sidebar into the given area.
pub fn render_list(
    area: Rect,
    buf: &mut Buffer,
    state: &ChatsState,
    agent_id: i64,
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
        .border_style(border_style)
        .title(" Messages ");

    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    // Two rows per chat: counterparty name, then last-message preview.
    for (i, chat) in state.chats.iter().enumerate() {
        let y = inner.y + (i * 2) as u16;
        if y + 1 >= inner.y + inner.height {
            break;
        }

        let selected = i == state.selected;
        let name_style = if selected {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };

        let name = chat
            .other_participant(agent_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Chat {}", chat.id));

        Paragraph::new(Line::from(Span::styled(format!(" {}", name), name_style)))
            .render(Rect::new(inner.x, y, inner.width, 1), buf);

        let preview = Line::from(Span::styled(
            format!(
                "   {}  {}",
                chat.timestamp.format("%H:%M"),
                chat.last_message
            ),
            Style::default().fg(Color::DarkGray),
        ));
        Paragraph::new(preview).render(Rect::new(inner.x, y + 1, inner.width, 1), buf);
    }
}

/// Render the selected chat's message history into the given area.
pub fn render_messages(area: Rect, buf: &mut Buffer, state: &ChatsState, agent_id: i64) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(match state.selected_chat() {
            Some(chat) => format!(
                " {} ",
                chat.other_participant(agent_id)
                    .map(|p| p.name.as_str())
                    .unwrap_or("conversation")
            ),
            None => " Select a chat to start messaging ".to_string(),
        });

    let inner = block.inner(area);
    block.render(area, buf);

    let Some(chat) = state.selected_chat() else {
        return;
    };

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    // Show the most recent messages that fit, one row each.
    let visible = inner.height as usize;
    let start = chat.messages.len().saturating_sub(visible);

    for (row, message) in chat.messages[start..].iter().enumerate() {
        let outbound = message.sender_id == agent_id;
        let (style, prefix) = if outbound {
            (Style::default().fg(Color::Cyan), "me")
        } else {
            (Style::default().fg(Color::White), "them")
        };

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", message.timestamp.format("%H:%M")),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format!("[{}] ", prefix), style.add_modifier(Modifier::BOLD)),
            Span::styled(message.content.clone(), style),
        ]);

        Paragraph::new(line).render(
            Rect::new(inner.x, inner.y + row as u16, inner.width, 1),
            buf,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn outbound(id: i64, content: &str) -> Message {
        Message {
            id,
            sender_id: 1,
            receiver_id: 2,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_apply_sent_appends_and_recomputes_summary() {
        let mut state = ChatsState::seeded(1, "John Doe");
        let before: Vec<usize> = state.chats.iter().map(|c| c.messages.len()).collect();

        let message = outbound(7, "Sure, it's available.");
        let stamp = message.timestamp;
        assert!(state.apply_sent(1, message));

        let chat = &state.chats[0];
        assert_eq!(chat.messages.len(), before[0] + 1);
        assert_eq!(chat.last_message, "Sure, it's available.");
        assert_eq!(chat.timestamp, stamp);

        // Other chats are unaffected.
        assert_eq!(state.chats[1].messages.len(), before[1]);
        assert_eq!(state.chats[1].last_message, "Is the house still available?");
    }

    #[test]
    fn test_apply_sent_unknown_chat_is_a_noop() {
        let mut state = ChatsState::seeded(1, "John Doe");
        assert!(!state.apply_sent(99, outbound(7, "lost")));
        for chat in &state.chats {
            assert_eq!(chat.messages.len(), 1);
        }
    }

    #[test]
    fn test_seeded_chats_have_counterparties() {
        let state = ChatsState::seeded(1, "John Doe");
        assert_eq!(state.chats.len(), 2);
        assert_eq!(state.chats[0].other_participant(1).unwrap().name, "Jane Smith");
        assert_eq!(state.chats[1].other_participant(1).unwrap().name, "Bob Johnson");
    }

    #[test]
    fn test_selection_moves_within_bounds() {
        let mut state = ChatsState::seeded(1, "John Doe");
        state.select_previous();
        assert_eq!(state.selected, 0);
        state.select_next();
        assert_eq!(state.selected, 1);
        state.select_next();
        assert_eq!(state.selected, 1);
    }
}
