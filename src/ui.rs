use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::{
    domain::{FieldKind, FormConfig, FormField, FormSection},
    form::{FieldValue, FormState, is_visible},
};

pub struct UiContext<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub config: &'a FormConfig,
    pub state: &'a FormState,
    pub section_index: usize,
    pub field_index: usize,
    pub status_message: &'a str,
    pub issue_count: usize,
    pub dirty: bool,
    pub help: Option<&'a str>,
}

/// Fields of one section that currently render: known kinds whose
/// visibility predicate holds, in declared order.
pub fn renderable_fields<'a>(section: &'a FormSection, state: &FormState) -> Vec<&'a FormField> {
    section
        .fields
        .iter()
        .filter(|field| field.kind.is_known() && is_visible(field, &state.values))
        .collect()
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>) {
    let header_constraint = if ctx.description.is_some() {
        Constraint::Length(4)
    } else {
        Constraint::Length(3)
    };

    let footer_constraint = if ctx.help.is_some() {
        Constraint::Length(4)
    } else {
        Constraint::Length(3)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([header_constraint, Constraint::Min(5), footer_constraint])
        .split(frame.area());

    render_header(frame, chunks[0], ctx.title, ctx.description);
    render_body(frame, chunks[1], &ctx);
    render_footer(frame, chunks[2], &ctx);
}

fn render_header(
    frame: &mut Frame<'_>,
    area: Rect,
    title: Option<&str>,
    description: Option<&str>,
) {
    let mut lines = Vec::new();
    if let Some(text) = title {
        lines.push(Line::from(Span::styled(
            text.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
    }
    if let Some(desc) = description {
        lines.push(Line::from(Span::raw(desc.to_string())));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::raw("Form")));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Form").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_body(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    if ctx.config.sections.is_empty() {
        let placeholder = Paragraph::new("This form has no sections")
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    }

    if ctx.config.sections.len() > 1 {
        let body_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);
        render_tabs(frame, body_chunks[0], ctx);
        render_fields(frame, body_chunks[1], ctx);
    } else {
        render_fields(frame, area, ctx);
    }
}

fn render_tabs(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let titles: Vec<Line<'static>> = ctx
        .config
        .sections
        .iter()
        .map(|section| Line::from(section.title.clone()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(ctx.section_index)
        .block(Block::default().borders(Borders::ALL).title("Sections"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_fields(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let Some(section) = ctx.config.sections.get(ctx.section_index) else {
        let placeholder =
            Paragraph::new("No section selected").block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    };

    let fields = renderable_fields(section, ctx.state);
    if fields.is_empty() {
        let placeholder = Paragraph::new("This section currently has no fields").block(
            Block::default()
                .title(section.title.clone())
                .borders(Borders::ALL),
        );
        frame.render_widget(placeholder, area);
        return;
    }

    let content_width = area.width.saturating_sub(4).max(8);
    let selected = ctx.field_index.min(fields.len() - 1);
    let items: Vec<ListItem<'static>> = fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            ListItem::new(field_lines(field, ctx.state, idx == selected, content_width))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(selected));

    let list = List::new(items)
        .block(
            Block::default()
                .title(section.title.clone())
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn field_lines(
    field: &FormField,
    state: &FormState,
    is_selected: bool,
    max_width: u16,
) -> Vec<Line<'static>> {
    let has_error = state.error(&field.name).is_some();
    let mut lines = Vec::new();

    let mut label = field.label.clone();
    if field.required {
        label.push_str(" *");
    }
    // Error state takes over the label color, matching the inline-error
    // contract: the message renders next to the offending field.
    let label_style = if has_error {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(Span::styled(label, label_style)));

    match field.kind {
        FieldKind::Textarea => {
            let text = current_text(field, state);
            if text.is_empty() {
                lines.push(value_line("(empty)".to_string(), true));
            } else {
                for row in wrap(&text, max_width as usize) {
                    lines.push(value_line(row.into_owned(), false));
                }
            }
        }
        FieldKind::Select => {
            let text = current_text(field, state);
            if text.is_empty() {
                lines.push(value_line(
                    format!("‹ choose with ←/→ ({} options) ›", field.options.len()),
                    true,
                ));
            } else {
                lines.push(value_line(format!("◂ {text} ▸"), false));
            }
        }
        FieldKind::File => {
            let handle = state.value(&field.name).and_then(FieldValue::as_file);
            match handle {
                Some(handle) if !handle.is_empty() => {
                    lines.push(value_line(
                        format!("{} ({})", handle.name(), handle.path().display()),
                        false,
                    ));
                }
                _ => lines.push(value_line("(no file chosen)".to_string(), true)),
            }
            if !field.accept.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("accepts: {}", field.accept.join(", ")),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        _ => {
            // text / email / tel / date: single-line editors
            let text = current_text(field, state);
            let truncated = truncate_to_width(&text, max_width);
            if truncated.is_empty() {
                lines.push(value_line("(empty)".to_string(), true));
            } else {
                lines.push(value_line(truncated, false));
            }
        }
    }

    if let Some(message) = state.error(&field.name) {
        lines.push(Line::from(Span::styled(
            format!("✗ {message}"),
            Style::default().fg(Color::Red),
        )));
    }

    lines.push(Line::from(""));
    lines
}

fn value_line(text: String, placeholder: bool) -> Line<'static> {
    let style = if placeholder {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(Span::styled(text, style))
}

fn current_text(field: &FormField, state: &FormState) -> String {
    state
        .value(&field.name)
        .and_then(FieldValue::as_text)
        .unwrap_or_default()
        .to_string()
}

fn truncate_to_width(text: &str, max_width: u16) -> String {
    if text.width() <= max_width as usize {
        return text.to_string();
    }
    // keep the tail: that is where the cursor sits while typing
    let mut tail: Vec<char> = Vec::new();
    let mut width = 1usize; // leading ellipsis
    for c in text.chars().rev() {
        let char_width = c.to_string().width();
        if width + char_width > max_width as usize {
            break;
        }
        width += char_width;
        tail.push(c);
    }
    let mut out = String::from("…");
    out.extend(tail.into_iter().rev());
    out
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let mut spans = Vec::new();
    if ctx.state.submitting {
        spans.push(Span::styled(
            "Submitting… ",
            Style::default().fg(Color::Yellow),
        ));
    }
    let status_style = if ctx.issue_count > 0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    spans.push(Span::styled(ctx.status_message.to_string(), status_style));
    if ctx.issue_count > 0 {
        spans.push(Span::styled(
            format!("  [{} issue(s)]", ctx.issue_count),
            Style::default().fg(Color::Red),
        ));
    }
    if ctx.dirty {
        spans.push(Span::styled(
            "  [modified]",
            Style::default().fg(Color::Yellow),
        ));
    }

    let mut lines = vec![Line::from(spans)];
    if let Some(help) = ctx.help {
        lines.push(Line::from(Span::styled(
            help.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}
