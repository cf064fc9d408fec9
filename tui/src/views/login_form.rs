//! Credential entry form.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use latchkey_types::{AuthError, Credentials};

use crate::theme::{Glyphs, Palette, styles};

const EMAIL_LABEL: &str = "Email    ";
const PASSWORD_LABEL: &str = "Password ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

impl LoginField {
    fn next(self) -> Self {
        match self {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        }
    }
}

/// Result of feeding a key to the form.
#[derive(Debug)]
pub enum FormAction {
    None,
    Submit(Credentials),
}

#[derive(Debug, Default)]
pub struct LoginForm {
    email: String,
    password: String,
    focus: LoginField,
    error: Option<String>,
    submitting: bool,
}

impl LoginForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn focus(&self) -> LoginField {
        self.focus
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.focus = self.focus.next();
            }
            KeyCode::Esc => self.error = None,
            KeyCode::Enter => match self.focus {
                LoginField::Email => self.focus = LoginField::Password,
                LoginField::Password => return self.submit(),
            },
            KeyCode::Backspace if !self.submitting => {
                self.field_mut().pop();
            }
            KeyCode::Char(c)
                if !self.submitting
                    && !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.field_mut().push(c);
            }
            _ => {}
        }
        FormAction::None
    }

    /// Insert pasted text into the focused field, dropping line breaks.
    pub fn paste(&mut self, text: &str) {
        if self.submitting {
            return;
        }
        let cleaned: String = text.chars().filter(|c| !c.is_control()).collect();
        self.field_mut().push_str(&cleaned);
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn submit(&mut self) -> FormAction {
        if self.submitting {
            return FormAction::None;
        }
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            self.error = Some("Email and password are required.".to_string());
            return FormAction::None;
        }
        self.error = None;
        self.submitting = true;
        FormAction::Submit(Credentials::new(email, self.password.clone()))
    }

    /// Apply the outcome of a submitted login.
    pub fn finish(&mut self, outcome: Result<(), &AuthError>) {
        self.submitting = false;
        self.password.clear();
        match outcome {
            Ok(()) => {
                self.error = None;
                self.focus = LoginField::Email;
            }
            // The session-level notice already explains what happened.
            Err(AuthError::Superseded) => {}
            Err(err) => {
                self.error = Some(err.to_string());
                self.focus = LoginField::Password;
            }
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

pub fn draw(
    frame: &mut Frame,
    area: Rect,
    form: &LoginForm,
    banner: Option<&str>,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let field_line = |label: &'static str, value: String, field: LoginField| {
        let focused = form.focus == field;
        let marker = if focused { glyphs.selected } else { " " };
        let style = if focused {
            styles::focused_field(palette)
        } else {
            styles::key_hint(palette)
        };
        Line::from(vec![
            Span::styled(format!("{marker} "), style),
            Span::styled(label, style),
            Span::styled(value, styles::base(palette)),
        ])
    };

    let masked: String = std::iter::repeat_n(glyphs.mask, form.password.chars().count()).collect();

    let mut lines = Vec::new();
    if let Some(banner) = banner {
        lines.push(Line::from(Span::styled(
            format!("{} {banner}", glyphs.warning),
            styles::banner(palette),
        )));
        lines.push(Line::from(""));
    }
    let first_field_row = lines.len();
    lines.push(field_line(EMAIL_LABEL, form.email.clone(), LoginField::Email));
    lines.push(field_line(PASSWORD_LABEL, masked, LoginField::Password));
    lines.push(Line::from(""));

    if form.submitting {
        lines.push(Line::from(Span::styled(
            format!("Signing in{}", glyphs.pending),
            styles::key_hint(palette),
        )));
    } else if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.clone(), styles::error(palette))));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Enter", styles::key_highlight(palette)),
        Span::styled(" submit  ", styles::key_hint(palette)),
        Span::styled("Tab", styles::key_highlight(palette)),
        Span::styled(" switch field  ", styles::key_hint(palette)),
        Span::styled("F2", styles::key_highlight(palette)),
        Span::styled(" theme", styles::key_hint(palette)),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border(palette))
        .title(" Login ")
        .title_alignment(Alignment::Left)
        .padding(Padding::horizontal(1))
        .style(styles::base(palette));
    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(lines).block(block), area);

    if form.submitting {
        return;
    }
    let (row, value_width) = match form.focus {
        LoginField::Email => (first_field_row, form.email.width()),
        LoginField::Password => (first_field_row + 1, form.password.chars().count()),
    };
    let prefix = 2 + EMAIL_LABEL.len();
    let x = inner.x + (prefix + value_width) as u16;
    let y = inner.y + row as u16;
    if x < inner.right() && y < inner.bottom() {
        frame.set_cursor_position((x, y));
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use latchkey_types::AuthError;

    use super::{FormAction, LoginField, LoginForm};

    fn press(form: &mut LoginForm, code: KeyCode) -> FormAction {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(form: &mut LoginForm, text: &str) {
        for c in text.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    #[test]
    fn enter_moves_from_email_to_password_then_submits() {
        let mut form = LoginForm::new();
        type_text(&mut form, "a@example.com");
        assert!(matches!(press(&mut form, KeyCode::Enter), FormAction::None));
        assert_eq!(form.focus(), LoginField::Password);
        type_text(&mut form, "pw");

        match press(&mut form, KeyCode::Enter) {
            FormAction::Submit(creds) => {
                assert_eq!(creds.email, "a@example.com");
                assert_eq!(creds.password, "pw");
            }
            FormAction::None => panic!("expected submit"),
        }
        assert!(form.is_submitting());
    }

    #[test]
    fn empty_fields_are_rejected_locally() {
        let mut form = LoginForm::new();
        press(&mut form, KeyCode::Tab);
        assert!(matches!(press(&mut form, KeyCode::Enter), FormAction::None));
        assert_eq!(form.error(), Some("Email and password are required."));
        assert!(!form.is_submitting());
    }

    #[test]
    fn no_double_submit_while_in_flight() {
        let mut form = LoginForm::new();
        type_text(&mut form, "a@example.com");
        press(&mut form, KeyCode::Tab);
        type_text(&mut form, "pw");
        assert!(matches!(press(&mut form, KeyCode::Enter), FormAction::Submit(_)));
        assert!(matches!(press(&mut form, KeyCode::Enter), FormAction::None));
        type_text(&mut form, "ignored");
        assert_eq!(form.email(), "a@example.com");
    }

    #[test]
    fn failure_is_displayed_and_password_cleared() {
        let mut form = LoginForm::new();
        type_text(&mut form, "a@example.com");
        press(&mut form, KeyCode::Tab);
        type_text(&mut form, "bad");
        press(&mut form, KeyCode::Enter);

        form.finish(Err(&AuthError::InvalidCredentials));

        assert!(!form.is_submitting());
        assert_eq!(form.error(), Some("invalid email or password"));
        assert_eq!(form.focus(), LoginField::Password);
        assert!(matches!(press(&mut form, KeyCode::Enter), FormAction::None));
        assert_eq!(form.error(), Some("Email and password are required."));
    }

    #[test]
    fn control_chords_are_not_typed() {
        let mut form = LoginForm::new();
        form.handle_key(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL));
        assert_eq!(form.email(), "");
    }

    #[test]
    fn paste_strips_newlines() {
        let mut form = LoginForm::new();
        form.paste("a@example.com\n");
        assert_eq!(form.email(), "a@example.com");
    }
}
