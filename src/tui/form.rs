//! Create-listing form: field editing with explicit price validation.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use thiserror::Error;

use crate::models::{ListingDraft, NO_DOCUMENT};

/// Why user-entered price text was rejected.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price is not a number")]
    NotANumber,
    #[error("price must be non-negative")]
    Negative,
}

/// Parse user-entered price text into a numeric amount.
///
/// An explicit fallible step: invalid or negative text is rejected here,
/// before submission, instead of silently coercing to NaN and forwarding
/// it to the server.
pub fn parse_price(text: &str) -> Result<f64, PriceError> {
    let price: f64 = text.trim().parse().map_err(|_| PriceError::NotANumber)?;
    if !price.is_finite() {
        return Err(PriceError::NotANumber);
    }
    if price < 0.0 {
        return Err(PriceError::Negative);
    }
    Ok(price)
}

/// Fields of the form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    MlsNumber,
    Address,
    Price,
    Compensation,
    Document,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::MlsNumber => "MLS Number",
            FormField::Address => "Property Address",
            FormField::Price => "Price",
            FormField::Compensation => "Buyer's Agent Compensation",
            FormField::Document => "Document",
        }
    }

    fn next(self) -> Self {
        match self {
            FormField::MlsNumber => FormField::Address,
            FormField::Address => FormField::Price,
            FormField::Price => FormField::Compensation,
            FormField::Compensation => FormField::Document,
            FormField::Document => FormField::MlsNumber,
        }
    }

    fn previous(self) -> Self {
        match self {
            FormField::MlsNumber => FormField::Document,
            FormField::Address => FormField::MlsNumber,
            FormField::Price => FormField::Address,
            FormField::Compensation => FormField::Price,
            FormField::Document => FormField::Compensation,
        }
    }

    const ALL: [FormField; 5] = [
        FormField::MlsNumber,
        FormField::Address,
        FormField::Price,
        FormField::Compensation,
        FormField::Document,
    ];
}

impl Default for FormField {
    fn default() -> Self {
        FormField::MlsNumber
    }
}

/// State for the create-listing overlay.
///
/// The draft form is its own state container; its `draft()` is the only
/// path from field text to a submittable `ListingDraft`.
#[derive(Default)]
pub struct ListingFormState {
    /// Whether the overlay is visible.
    pub active: bool,
    pub mls_number: String,
    pub address: String,
    /// Raw price text as typed; parsed on submission.
    pub price: String,
    pub compensation: String,
    pub document: String,
    pub field: FormField,
    /// Validation error shown inline, if any.
    pub error: Option<String>,
    /// Whether a create call is in flight for this form.
    pub submitting: bool,
}

impl ListingFormState {
    /// Open the overlay, keeping any previously typed draft.
    pub fn open(&mut self) {
        self.active = true;
        self.field = FormField::MlsNumber;
        self.error = None;
    }

    /// Dismiss the overlay. The typed draft stays for the next open.
    pub fn close(&mut self) {
        self.active = false;
        self.submitting = false;
    }

    /// Reset all fields (after a successful create) and dismiss.
    pub fn clear_and_close(&mut self) {
        self.mls_number.clear();
        self.address.clear();
        self.price.clear();
        self.compensation.clear();
        self.document.clear();
        self.error = None;
        self.close();
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn previous_field(&mut self) {
        self.field = self.field.previous();
    }

    /// Append a character to the active field.
    pub fn insert_char(&mut self, c: char) {
        self.active_field_mut().push(c);
    }

    /// Delete the last character of the active field.
    pub fn backspace(&mut self) {
        self.active_field_mut().pop();
    }

    fn active_field_mut(&mut self) -> &mut String {
        match self.field {
            FormField::MlsNumber => &mut self.mls_number,
            FormField::Address => &mut self.address,
            FormField::Price => &mut self.price,
            FormField::Compensation => &mut self.compensation,
            FormField::Document => &mut self.document,
        }
    }

    fn field_value(&self, field: FormField) -> &str {
        match field {
            FormField::MlsNumber => &self.mls_number,
            FormField::Address => &self.address,
            FormField::Price => &self.price,
            FormField::Compensation => &self.compensation,
            FormField::Document => &self.document,
        }
    }

    /// Validate the form and build the submittable draft.
    ///
    /// On invalid price text the error is recorded for inline display and
    /// no draft is produced -- nothing reaches the wire. An empty document
    /// field becomes the placeholder reference.
    pub fn draft(&mut self) -> Option<ListingDraft> {
        let price = match parse_price(&self.price) {
            Ok(price) => price,
            Err(e) => {
                self.error = Some(e.to_string());
                return None;
            }
        };
        self.error = None;

        let document = if self.document.trim().is_empty() {
            NO_DOCUMENT.to_string()
        } else {
            self.document.trim().to_string()
        };

        Some(ListingDraft {
            mls_number: self.mls_number.trim().to_string(),
            address: self.address.trim().to_string(),
            price,
            compensation: self.compensation.trim().to_string(),
            document,
        })
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the create-listing overlay centered on the frame.
pub fn render_overlay(frame: &mut Frame, state: &ListingFormState) {
    let area = frame.area();

    let width = 52.min(area.width.saturating_sub(4));
    // One row per field plus title, error line, and hint.
    let height = (FormField::ALL.len() as u16 + 4).min(area.height.saturating_sub(2));
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Create New Post ");

    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let mut lines = Vec::new();
    for field in FormField::ALL {
        let selected = field == state.field;
        let marker = if selected { ">" } else { " " };
        let label_style = if selected {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let value = state.field_value(field);
        let shown = if value.is_empty() && field == FormField::Document {
            NO_DOCUMENT
        } else {
            value
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{} {}: ", marker, field.label()), label_style),
            Span::styled(shown.to_string(), Style::default().fg(Color::Cyan)),
        ]));
    }

    if let Some(ref error) = state.error {
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(Color::Red),
        )));
    } else if state.submitting {
        lines.push(Line::from(Span::styled(
            " Creating...",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        " Tab next field  Enter submit  Esc close",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_numeric_text() {
        assert_eq!(parse_price("450000"), Ok(450000.0));
        assert_eq!(parse_price(" 450000.50 "), Ok(450000.5));
        assert_eq!(parse_price("0"), Ok(0.0));
    }

    #[test]
    fn test_parse_price_rejects_non_numeric() {
        // Invalid text is rejected before submission -- it is never
        // forwarded to the server as NaN.
        assert_eq!(parse_price("abc"), Err(PriceError::NotANumber));
        assert_eq!(parse_price(""), Err(PriceError::NotANumber));
        assert_eq!(parse_price("NaN"), Err(PriceError::NotANumber));
        assert_eq!(parse_price("inf"), Err(PriceError::NotANumber));
    }

    #[test]
    fn test_parse_price_rejects_negative() {
        assert_eq!(parse_price("-5"), Err(PriceError::Negative));
    }

    #[test]
    fn test_draft_with_valid_fields() {
        let mut form = ListingFormState::default();
        form.mls_number = "MLS123".to_string();
        form.address = "123 Oak St".to_string();
        form.price = "450000".to_string();
        form.compensation = "2.5%".to_string();

        let draft = form.draft().expect("valid form should produce a draft");
        assert_eq!(draft.price, 450000.0);
        assert_eq!(draft.document, NO_DOCUMENT);
        assert!(form.error.is_none());
    }

    #[test]
    fn test_invalid_price_blocks_submission() {
        let mut form = ListingFormState::default();
        form.mls_number = "MLS123".to_string();
        form.price = "abc".to_string();

        assert!(form.draft().is_none());
        assert_eq!(form.error.as_deref(), Some("price is not a number"));

        // Fixing the field clears the error on the next attempt.
        form.price = "100".to_string();
        assert!(form.draft().is_some());
        assert!(form.error.is_none());
    }

    #[test]
    fn test_field_editing_and_cycling() {
        let mut form = ListingFormState::default();
        form.open();
        assert_eq!(form.field, FormField::MlsNumber);

        form.insert_char('M');
        form.insert_char('1');
        assert_eq!(form.mls_number, "M1");

        form.next_field();
        assert_eq!(form.field, FormField::Address);
        form.previous_field();
        form.backspace();
        assert_eq!(form.mls_number, "M");
    }

    #[test]
    fn test_clear_and_close_resets_fields() {
        let mut form = ListingFormState::default();
        form.open();
        form.mls_number = "M".to_string();
        form.price = "1".to_string();
        form.submitting = true;

        form.clear_and_close();
        assert!(!form.active);
        assert!(!form.submitting);
        assert!(form.mls_number.is_empty());
        assert!(form.price.is_empty());
    }
}
