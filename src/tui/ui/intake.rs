//! Multi-step health intake form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::intake::validate_step;
use crate::domain::{Field, FieldErrors, FieldKind, FormStep, HealthInput};
use crate::tui::styles::Theme;

/// Result of pressing Next/Analyze or Previous/Back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Moved forward to this step
    Advanced(FormStep),
    /// Current step has errors
    Blocked,
    /// Final step validated; the complete input
    Submit(HealthInput),
    /// Moved back to this step
    Retreated(FormStep),
    /// Back pressed on the first step
    Back,
}

/// Form state
#[derive(Debug, Clone)]
pub struct IntakeFormState {
    step: FormStep,
    input: HealthInput,
    errors: FieldErrors,
    focus: usize,
}

impl Default for IntakeFormState {
    fn default() -> Self {
        Self {
            step: FormStep::BasicInfo,
            input: HealthInput::default(),
            errors: FieldErrors::default(),
            focus: 0,
        }
    }
}

impl IntakeFormState {
    #[must_use]
    pub fn step(&self) -> FormStep {
        self.step
    }

    #[must_use]
    pub fn input(&self) -> &HealthInput {
        &self.input
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub fn focused_field(&self) -> Field {
        let fields = self.step.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.step.fields().len();
    }

    pub fn focus_prev(&mut self) {
        let len = self.step.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    /// Type into the focused numeric field.
    pub fn input_char(&mut self, c: char) {
        let field = self.focused_field();
        if !matches!(field.kind(), FieldKind::Numeric { .. }) {
            return;
        }
        if c.is_ascii_digit() || c == '.' {
            self.input.value_mut(field).push(c);
            self.errors.clear(field);
        }
    }

    /// Delete the last character, or the whole selection of a choice field.
    /// Returns `false` if the field was already empty.
    pub fn delete_char(&mut self) -> bool {
        let field = self.focused_field();
        let value = self.input.value_mut(field);
        if value.is_empty() {
            return false;
        }
        match field.kind() {
            FieldKind::Choice(_) => value.zeroize(),
            FieldKind::Numeric { .. } => {
                value.pop();
            }
        }
        self.errors.clear(field);
        true
    }

    pub fn clear_field(&mut self) {
        let field = self.focused_field();
        self.input.value_mut(field).zeroize();
        self.errors.clear(field);
    }

    /// Select the next (or previous) option of the focused choice field.
    pub fn cycle_choice(&mut self, forward: bool) {
        let field = self.focused_field();
        let FieldKind::Choice(choices) = field.kind() else {
            return;
        };
        let current = choices
            .iter()
            .position(|c| c.code == self.input.value(field));
        let len = choices.len();
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.input.set(field, choices[next].code);
        self.errors.clear(field);
    }

    /// Fill every step with the sample profile.
    pub fn load_sample(&mut self) {
        self.input = HealthInput::sample();
        self.errors = FieldErrors::default();
    }

    /// Next, or Analyze on the final step.
    pub fn next(&mut self) -> FormAction {
        let errors = validate_step(&self.input, self.step);
        if !errors.is_empty() {
            self.focus = self
                .step
                .fields()
                .iter()
                .position(|f| errors.get(*f).is_some())
                .unwrap_or(0);
            self.errors = errors;
            return FormAction::Blocked;
        }

        self.errors = FieldErrors::default();
        match self.step.next() {
            Some(step) => {
                self.step = step;
                self.focus = 0;
                FormAction::Advanced(step)
            }
            None => FormAction::Submit(self.input.clone()),
        }
    }

    /// Previous, or Back on the first step. Never validates.
    pub fn prev(&mut self) -> FormAction {
        match self.step.prev() {
            Some(step) => {
                self.step = step;
                self.focus = 0;
                self.errors = FieldErrors::default();
                FormAction::Retreated(step)
            }
            None => FormAction::Back,
        }
    }

    /// Wipe all buffers and return to the first step.
    pub fn clear_sensitive(&mut self) {
        self.input.zeroize();
        self.errors = FieldErrors::default();
        self.step = FormStep::BasicInfo;
        self.focus = 0;
    }
}

/// Render the intake form
pub fn render_intake(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header + steps
            Constraint::Min(0),    // Fields
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], state.step);
    render_fields(f, chunks[1], state);
    render_footer(f, chunks[2], state.step);
}

fn render_header(f: &mut Frame, area: Rect, step: FormStep) {
    let mut indicator = vec![Span::raw(" ")];
    for s in FormStep::ALL {
        let style = if *s == step {
            Theme::selected()
        } else if s.index() < step.index() {
            Theme::success()
        } else {
            Theme::text_muted()
        };
        indicator.push(Span::styled(format!(" {}. {} ", s.index(), s.title()), style));
        indicator.push(Span::raw(" "));
    }

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" Health Assessment", Theme::title()),
            Span::styled(
                format!(" │ Step {} of {}", step.index(), FormStep::ALL.len()),
                Theme::text_secondary(),
            ),
        ]),
        Line::from(Span::styled(format!(" {}", step.prompt()), Theme::text_muted())),
        Line::from(indicator),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Theme::border()),
    );

    f.render_widget(header, area);
}

fn render_fields(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    let fields = state.step.fields();
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(4))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(2)
        .vertical_margin(1)
        .split(area);

    let focused = state.focused_field();
    for (i, field) in fields.iter().enumerate() {
        render_field(f, chunks[i], state, *field, *field == focused);
    }
}

fn render_field(f: &mut Frame, area: Rect, state: &IntakeFormState, field: Field, is_focused: bool) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let error = state.errors.get(field);
    let border_style = match (error.is_some(), is_focused) {
        (true, _) => Theme::danger(),
        (false, true) => Theme::border_focused(),
        (false, false) => Theme::border(),
    };
    let title_style = if is_focused {
        Theme::accent()
    } else {
        Theme::text_secondary()
    };

    let value = state.input.value(field);
    let content = match field.kind() {
        FieldKind::Numeric { hint } => {
            let mut spans = vec![Span::raw(" ")];
            if value.is_empty() {
                spans.push(Span::styled(hint, Theme::text_muted()));
            } else {
                spans.push(Span::styled(value.to_string(), Theme::text()));
            }
            if is_focused {
                spans.push(Span::styled("▌", Theme::accent()));
            }
            Line::from(spans)
        }
        FieldKind::Choice(choices) => {
            let label = choices
                .iter()
                .find(|c| c.code == value)
                .map(|c| c.label);
            let arrows = if is_focused { Theme::key_hint() } else { Theme::text_muted() };
            Line::from(vec![
                Span::styled(" ◀ ", arrows),
                match label {
                    Some(label) => Span::styled(label, Theme::text()),
                    None => Span::styled("Select…", Theme::text_muted()),
                },
                Span::styled(" ▶", arrows),
            ])
        }
    };

    let block = Block::default()
        .title(Span::styled(format!(" {} ", field.label()), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);
    f.render_widget(Paragraph::new(content).block(block), rows[0]);

    if let Some(message) = error {
        let line = Paragraph::new(Line::from(vec![
            Span::styled(" ! ", Theme::danger()),
            Span::styled(message.to_string(), Theme::danger()),
        ]));
        f.render_widget(line, rows[1]);
    }
}

fn render_footer(f: &mut Frame, area: Rect, step: FormStep) {
    let next = if step.is_last() { "Analyze " } else { "Next " };
    let prev = if step.is_first() { "Back " } else { "Previous " };
    let content = Line::from(vec![
        Span::styled("[↑↓] ", Theme::key_hint()),
        Span::styled("Field ", Theme::key_desc()),
        Span::styled("[←→] ", Theme::key_hint()),
        Span::styled("Option ", Theme::key_desc()),
        Span::styled("[Enter] ", Theme::key_hint()),
        Span::styled(next, Theme::key_desc()),
        Span::styled("[Esc] ", Theme::key_hint()),
        Span::styled(prev, Theme::key_desc()),
        Span::styled("[S] ", Theme::key_hint()),
        Span::styled("Sample Data", Theme::key_desc()),
    ]);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Theme::border()),
    );
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(state: &mut IntakeFormState, text: &str) {
        for c in text.chars() {
            state.input_char(c);
        }
    }

    fn fill_basic_info(state: &mut IntakeFormState) {
        type_text(state, "45");
        state.focus_next();
        state.cycle_choice(true);
        state.focus_next();
        type_text(state, "175");
        state.focus_next();
        type_text(state, "70");
    }

    #[test]
    fn test_empty_step_is_blocked_with_field_errors() {
        let mut state = IntakeFormState::default();
        assert_eq!(state.next(), FormAction::Blocked);
        assert_eq!(state.step(), FormStep::BasicInfo);
        assert_eq!(state.errors().len(), 4);
        assert_eq!(state.errors().get(Field::Age), Some(Field::Age.error_message()));
    }

    #[test]
    fn test_only_offending_fields_are_flagged() {
        let mut state = IntakeFormState::default();
        fill_basic_info(&mut state);
        state.input.set(Field::Height, "230");

        assert_eq!(state.next(), FormAction::Blocked);
        assert_eq!(state.errors().len(), 1);
        assert!(state.errors().get(Field::Height).is_some());
        assert_eq!(state.focused_field(), Field::Height);
    }

    #[test]
    fn test_editing_clears_only_that_error() {
        let mut state = IntakeFormState::default();
        state.next();
        assert_eq!(state.focused_field(), Field::Age);
        state.input_char('4');
        assert!(state.errors().get(Field::Age).is_none());
        assert!(state.errors().get(Field::Height).is_some());
        assert!(state.errors().get(Field::Gender).is_some());
    }

    #[test]
    fn test_advances_and_keeps_data_when_going_back() {
        let mut state = IntakeFormState::default();
        fill_basic_info(&mut state);
        assert_eq!(state.next(), FormAction::Advanced(FormStep::Vitals));

        type_text(&mut state, "120");
        assert_eq!(state.prev(), FormAction::Retreated(FormStep::BasicInfo));
        assert_eq!(state.input().age, "45");
        assert_eq!(state.input().systolic_bp, "120");
        assert_eq!(state.prev(), FormAction::Back);
    }

    #[test]
    fn test_previous_never_validates() {
        let mut state = IntakeFormState::default();
        fill_basic_info(&mut state);
        state.next();
        assert_eq!(state.prev(), FormAction::Retreated(FormStep::BasicInfo));
        assert!(state.errors().is_empty());
    }

    #[test]
    fn test_final_step_submits() {
        let mut state = IntakeFormState::default();
        state.load_sample();
        assert_eq!(state.next(), FormAction::Advanced(FormStep::Vitals));
        assert_eq!(state.next(), FormAction::Advanced(FormStep::BloodWork));
        assert_eq!(state.next(), FormAction::Advanced(FormStep::Lifestyle));
        assert_eq!(state.next(), FormAction::Submit(HealthInput::sample()));
    }

    #[test]
    fn test_choice_cycling() {
        let mut state = IntakeFormState::default();
        state.focus_next();
        assert_eq!(state.focused_field(), Field::Gender);
        state.cycle_choice(false);
        let last = state.input().gender.clone();
        state.cycle_choice(true);
        assert_ne!(state.input().gender, last);
        assert!(!state.input().gender.is_empty());
    }

    #[test]
    fn test_numeric_fields_reject_letters_and_choice_fields_ignore_typing() {
        let mut state = IntakeFormState::default();
        type_text(&mut state, "4x5");
        assert_eq!(state.input().age, "45");
        state.focus_next();
        type_text(&mut state, "12");
        assert!(state.input().gender.is_empty());
    }

    #[test]
    fn test_backspace_reports_empty_field() {
        let mut state = IntakeFormState::default();
        state.input_char('9');
        assert!(state.delete_char());
        assert!(!state.delete_char());
    }

    #[test]
    fn test_backspace_clears_whole_choice() {
        let mut state = IntakeFormState::default();
        state.focus_next();
        assert_eq!(state.focused_field(), Field::Gender);
        state.cycle_choice(true);
        assert!(!state.input().gender.is_empty());

        assert!(state.delete_char());
        assert!(state.input().gender.is_empty());
        assert!(!state.delete_char());
    }

    #[test]
    fn test_clear_sensitive() {
        let mut state = IntakeFormState::default();
        state.load_sample();
        state.next();
        state.clear_sensitive();
        assert_eq!(state.input(), &HealthInput::default());
        assert_eq!(state.step(), FormStep::BasicInfo);
    }
}
