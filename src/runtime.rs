use std::io::{self, Stdout};
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{
    domain::{FieldKind, FormConfig},
    form::{FieldValue, FormController, SubmitOutcome, ValueMap},
    ui::{self, UiContext, renderable_fields},
};

const HELP_TEXT: &str =
    "Tab/Shift+Tab move • Ctrl+Tab switch section • ←/→ pick option • Ctrl+S submit • Ctrl+Q quit";
const READY_STATUS: &str = "Ready. Press Ctrl+S to validate and submit.";

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    pub validate_on_blur: bool,
    pub confirm_exit: bool,
    pub show_help: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            validate_on_blur: true,
            confirm_exit: true,
            show_help: true,
        }
    }
}

/// Caller-supplied submission callback. The engine forwards the validated
/// value map and treats any `Err` as a non-fatal, retryable failure.
pub type SubmitHandler = Box<dyn FnMut(&ValueMap) -> Result<()>>;

/// Interactive terminal renderer for a [`FormConfig`].
pub struct FormUI {
    config: FormConfig,
    title: Option<String>,
    options: UiOptions,
    handler: Option<SubmitHandler>,
}

impl FormUI {
    pub fn new(config: FormConfig) -> Self {
        Self {
            config,
            title: None,
            options: UiOptions::default(),
            handler: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn on_submit<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&ValueMap) -> Result<()> + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Run the event loop until the form is submitted or abandoned. Returns
    /// the submitted value map.
    pub fn run(self) -> Result<ValueMap> {
        let FormUI {
            config,
            title,
            options,
            handler,
        } = self;

        let mut app = App::new(FormController::new(config), handler, title, options);
        app.run()
    }
}

struct App {
    controller: FormController,
    handler: Option<SubmitHandler>,
    options: UiOptions,
    title_override: Option<String>,
    status_message: String,
    section_index: usize,
    field_index: usize,
    exit_armed: bool,
    should_quit: bool,
    result: Option<ValueMap>,
}

enum EditOp {
    Insert(char),
    Backspace,
    Clear,
    Newline,
    CycleOption(i32),
    ConfirmFile,
}

impl App {
    fn new(
        controller: FormController,
        handler: Option<SubmitHandler>,
        title_override: Option<String>,
        options: UiOptions,
    ) -> Self {
        let mut app = Self {
            controller,
            handler,
            options,
            title_override,
            status_message: READY_STATUS.to_string(),
            section_index: 0,
            field_index: 0,
            exit_armed: false,
            should_quit: false,
            result: None,
        };
        app.normalize_focus();
        app
    }

    fn run(&mut self) -> Result<ValueMap> {
        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(_, _) => {}
                Event::Mouse(_) => {}
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }

        if let Some(value) = self.result.take() {
            Ok(value)
        } else {
            Err(anyhow!("user exited without submitting"))
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let config = self.controller.config();
        let title = self
            .title_override
            .as_deref()
            .or_else(|| (!config.title.is_empty()).then_some(config.title.as_str()));
        let description = (!config.description.is_empty()).then_some(config.description.as_str());
        let help = self.options.show_help.then_some(HELP_TEXT);

        ui::draw(
            frame,
            UiContext {
                title,
                description,
                config,
                state: self.controller.state(),
                section_index: self.section_index,
                field_index: self.field_index,
                status_message: &self.status_message,
                issue_count: self.controller.state().error_count(),
                dirty: self.controller.state().is_dirty(),
                help,
            },
        );
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') | KeyCode::Char('S') => {
                    self.exit_armed = false;
                    self.on_save();
                }
                KeyCode::Char('q')
                | KeyCode::Char('Q')
                | KeyCode::Char('c')
                | KeyCode::Char('C') => {
                    self.on_exit();
                }
                KeyCode::Tab => {
                    let delta = if key.modifiers.contains(KeyModifiers::SHIFT) {
                        -1
                    } else {
                        1
                    };
                    self.exit_armed = false;
                    self.move_focus(|app| app.focus_next_section(delta));
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.exit_armed = false;
                self.move_focus(App::focus_next_field);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.exit_armed = false;
                self.move_focus(App::focus_prev_field);
            }
            KeyCode::Left => self.edit_focused(EditOp::CycleOption(-1)),
            KeyCode::Right => self.edit_focused(EditOp::CycleOption(1)),
            KeyCode::Enter => {
                if let Some(kind) = self.focused_kind() {
                    match kind {
                        FieldKind::Textarea => self.edit_focused(EditOp::Newline),
                        FieldKind::File => self.edit_focused(EditOp::ConfirmFile),
                        _ => {}
                    }
                }
            }
            KeyCode::Backspace => self.edit_focused(EditOp::Backspace),
            KeyCode::Delete => self.edit_focused(EditOp::Clear),
            KeyCode::Esc => {
                self.exit_armed = false;
                self.status_message = READY_STATUS.to_string();
            }
            KeyCode::Char(c) => self.edit_focused(EditOp::Insert(c)),
            _ => {}
        }
    }

    fn on_save(&mut self) {
        if self.controller.state().submitting {
            return;
        }
        let handler = self.handler.as_mut();
        let outcome = self.controller.submit(|values| match handler {
            Some(callback) => callback(values),
            None => Ok(()),
        });
        match outcome {
            SubmitOutcome::Submitted => {
                self.result = Some(self.controller.values().clone());
                self.status_message = "Form submitted".to_string();
                self.should_quit = true;
            }
            SubmitOutcome::Rejected { issues } => {
                self.status_message = format!("{issues} issue(s) remaining");
                self.focus_first_error();
            }
            SubmitOutcome::Failed { message } => {
                self.status_message = format!("Submission failed: {message}. Ctrl+S to retry.");
            }
        }
    }

    fn on_exit(&mut self) {
        if self.options.confirm_exit && self.controller.state().is_dirty() && !self.exit_armed {
            self.exit_armed = true;
            self.status_message =
                "Unsaved input. Press Ctrl+Q again to quit without submitting.".to_string();
            return;
        }
        self.should_quit = true;
        self.result = None;
    }

    // -- focus -------------------------------------------------------------

    fn section_plan(&self) -> Vec<Vec<String>> {
        let state = self.controller.state();
        self.controller
            .config()
            .sections
            .iter()
            .map(|section| {
                renderable_fields(section, state)
                    .into_iter()
                    .map(|field| field.name.clone())
                    .collect()
            })
            .collect()
    }

    fn focused_field_name(&self) -> Option<String> {
        self.section_plan()
            .get(self.section_index)?
            .get(self.field_index)
            .cloned()
    }

    fn focused_kind(&self) -> Option<FieldKind> {
        let name = self.focused_field_name()?;
        self.controller
            .config()
            .field(&name)
            .map(|field| field.kind.clone())
    }

    /// Wraps a focus change so the field being left gets its blur
    /// validation.
    fn move_focus(&mut self, change: impl FnOnce(&mut Self)) {
        let before = self.focused_field_name();
        change(self);
        let after = self.focused_field_name();
        if self.options.validate_on_blur
            && let Some(left) = before
            && Some(&left) != after.as_ref()
        {
            self.controller.validate_field(&left);
        }
    }

    fn focus_next_field(&mut self) {
        let plan = self.section_plan();
        let Some(fields) = plan.get(self.section_index) else {
            return;
        };
        if self.field_index + 1 < fields.len() {
            self.field_index += 1;
        } else {
            self.advance_section(&plan, 1);
        }
    }

    fn focus_prev_field(&mut self) {
        let plan = self.section_plan();
        if self.field_index > 0 {
            self.field_index -= 1;
        } else {
            self.advance_section(&plan, -1);
            if let Some(fields) = plan.get(self.section_index) {
                self.field_index = fields.len().saturating_sub(1);
            }
        }
    }

    fn focus_next_section(&mut self, delta: i32) {
        let plan = self.section_plan();
        self.advance_section(&plan, delta);
    }

    /// Move to the next/previous section that has something to focus,
    /// wrapping around; sections whose fields are all hidden are skipped.
    fn advance_section(&mut self, plan: &[Vec<String>], delta: i32) {
        let len = plan.len() as i32;
        if len == 0 || plan.iter().all(Vec::is_empty) {
            return;
        }
        let mut next = self.section_index as i32;
        loop {
            next = ((next + delta) % len + len) % len;
            if !plan[next as usize].is_empty() {
                break;
            }
        }
        self.section_index = next as usize;
        self.field_index = 0;
    }

    fn normalize_focus(&mut self) {
        let plan = self.section_plan();
        if plan.is_empty() {
            self.section_index = 0;
            self.field_index = 0;
            return;
        }
        if self.section_index >= plan.len() {
            self.section_index = 0;
        }
        if plan[self.section_index].is_empty() {
            if let Some(idx) = plan.iter().position(|fields| !fields.is_empty()) {
                self.section_index = idx;
                self.field_index = 0;
            } else {
                self.field_index = 0;
                return;
            }
        }
        let fields = plan[self.section_index].len();
        if self.field_index >= fields {
            self.field_index = fields.saturating_sub(1);
        }
    }

    fn focus_first_error(&mut self) {
        let plan = self.section_plan();
        for (section_idx, fields) in plan.iter().enumerate() {
            for (field_idx, name) in fields.iter().enumerate() {
                if self.controller.state().error(name).is_some() {
                    self.section_index = section_idx;
                    self.field_index = field_idx;
                    return;
                }
            }
        }
    }

    // -- editing -----------------------------------------------------------

    fn edit_focused(&mut self, op: EditOp) {
        let Some(name) = self.focused_field_name() else {
            return;
        };
        let Some(field) = self.controller.config().field(&name).cloned() else {
            return;
        };

        match (&field.kind, op) {
            (kind, EditOp::Insert(c)) if kind.is_text_like() || *kind == FieldKind::Textarea => {
                let mut text = self.current_text(&name);
                text.push(c);
                self.apply_edit(&field.name, &field.label, FieldValue::Text(text));
            }
            (kind, EditOp::Backspace) if kind.is_text_like() || *kind == FieldKind::Textarea => {
                let mut text = self.current_text(&name);
                text.pop();
                self.apply_edit(&field.name, &field.label, FieldValue::Text(text));
            }
            (kind, EditOp::Clear) if kind.is_text_like() || *kind == FieldKind::Textarea => {
                self.apply_edit(&field.name, &field.label, FieldValue::Text(String::new()));
            }
            (FieldKind::Textarea, EditOp::Newline) => {
                let mut text = self.current_text(&name);
                text.push('\n');
                self.apply_edit(&field.name, &field.label, FieldValue::Text(text));
            }
            (FieldKind::Select, EditOp::CycleOption(delta)) => {
                if field.options.is_empty() {
                    return;
                }
                let current = self.current_text(&name);
                let len = field.options.len() as i32;
                let next = match field.options.iter().position(|opt| *opt == current) {
                    Some(idx) => ((idx as i32 + delta) % len + len) % len,
                    None if delta > 0 => 0,
                    None => len - 1,
                };
                let chosen = field.options[next as usize].clone();
                self.apply_edit(&field.name, &field.label, FieldValue::Text(chosen));
            }
            (FieldKind::File, EditOp::Insert(c)) => {
                let mut path = self.current_path(&name);
                path.push(c);
                self.apply_edit(&field.name, &field.label, FieldValue::file(path));
            }
            (FieldKind::File, EditOp::Backspace) => {
                let mut path = self.current_path(&name);
                path.pop();
                self.apply_edit(&field.name, &field.label, FieldValue::file(path));
            }
            (FieldKind::File, EditOp::Clear) => {
                self.apply_edit(&field.name, &field.label, FieldValue::file(""));
            }
            (FieldKind::File, EditOp::ConfirmFile) => {
                let path = self.current_path(&name);
                if path.is_empty() {
                    self.status_message = format!("{}: type a file path first", field.label);
                } else if accept_matches(&field.accept, Path::new(&path)) {
                    self.status_message = format!("Attached {path}");
                } else {
                    self.status_message = format!(
                        "{path} does not match accepted types ({})",
                        field.accept.join(", ")
                    );
                    self.apply_edit(&field.name, &field.label, FieldValue::file(""));
                }
            }
            _ => {}
        }
    }

    fn apply_edit(&mut self, name: &str, label: &str, value: FieldValue) {
        self.controller.set_value(name, value);
        self.exit_armed = false;
        self.status_message = format!("Editing {label}");
        // an edit can change which fields render; keep focus inside bounds
        if self.controller.visibility_index().is_trigger(name) {
            self.normalize_focus();
        }
    }

    fn current_text(&self, name: &str) -> String {
        self.controller
            .state()
            .value(name)
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
            .to_string()
    }

    fn current_path(&self, name: &str) -> String {
        self.controller
            .state()
            .value(name)
            .and_then(FieldValue::as_file)
            .map(|handle| handle.path().to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Match a chosen file against the field's accepted MIME patterns. Empty
/// pattern lists accept anything; `type/*` matches on the major type.
fn accept_matches(patterns: &[String], path: &Path) -> bool {
    if patterns.is_empty() {
        return true;
    }
    let mime = mime_for_path(path);
    patterns.iter().any(|pattern| {
        let pattern = pattern.trim();
        if pattern == "*" || pattern == "*/*" {
            return true;
        }
        let Some(mime) = mime else {
            return false;
        };
        if let Some(major) = pattern.strip_suffix("/*") {
            mime.split('/').next() == Some(major)
        } else {
            mime == pattern
        }
    })
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "txt" => "text/plain",
        "csv" => "text/csv",
        _ => return None,
    };
    Some(mime)
}

struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

impl Deref for TerminalGuard {
    type Target = Terminal<CrosstermBackend<Stdout>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for TerminalGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_accept_list_takes_anything() {
        assert!(accept_matches(&[], Path::new("notes.xyz")));
    }

    #[test]
    fn wildcard_major_type_matches_extension_mime() {
        let patterns = vec!["image/*".to_string()];
        assert!(accept_matches(&patterns, Path::new("/tmp/photo.JPG")));
        assert!(!accept_matches(&patterns, Path::new("/tmp/scan.pdf")));
    }

    #[test]
    fn exact_mime_and_unknown_extensions() {
        let patterns = vec!["application/pdf".to_string()];
        assert!(accept_matches(&patterns, Path::new("doc.pdf")));
        assert!(!accept_matches(&patterns, Path::new("doc.unknownext")));
        assert!(accept_matches(
            &["*/*".to_string()],
            Path::new("doc.unknownext")
        ));
    }
}
