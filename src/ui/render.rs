use crate::ui::app::App;
use crate::ui::view::{Button, Control, Node, ScreenView, Tone, Widget};
use crate::ui::window::Phase;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, app: &App) {
    // Main layout: Header + Body + Footer
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, main_chunks[0]);
    render_screens(frame, app, main_chunks[1]);
    render_footer(frame, app, main_chunks[2]);

    // Modals draw last so they sit on top of every screen
    let focus = app.focused_control();
    for view in &app.view().screens {
        for (title, message, buttons) in view.modals() {
            render_modal(frame, title, message, buttons, focus.as_ref());
        }
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let phase = match app.composer().phase() {
        Phase::Setup => "setup",
        Phase::InTest => "testing",
    };
    let header_text = vec![Line::from(vec![
        Span::styled(
            "  Speech-in-Noise Test  ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("({phase})"), Style::default().fg(Color::Gray)),
    ])];

    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(header, area);
}

/// Lines a screen occupies inside its border. Modals are overlays.
fn screen_height(view: &ScreenView) -> u16 {
    let lines = view
        .nodes
        .iter()
        .filter(|node| !matches!(node, Node::Modal { .. }))
        .count();
    u16::try_from(lines).unwrap_or(u16::MAX).saturating_add(2)
}

fn render_screens(frame: &mut Frame, app: &App, area: Rect) {
    let screens = &app.view().screens;
    let mut constraints: Vec<Constraint> = screens
        .iter()
        .map(|view| Constraint::Length(screen_height(view)))
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let focus = app.focused_control();
    for (view, chunk) in screens.iter().zip(chunks.iter()) {
        let has_focus = focus.is_some_and(|control| control.screen == view.screen);
        let border_color = if has_focus { Color::Cyan } else { Color::Gray };

        let lines: Vec<Line> = view
            .nodes
            .iter()
            .filter(|node| !matches!(node, Node::Modal { .. }))
            .map(|node| Line::from(node_spans(node, focus.as_ref())))
            .collect();

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", view.title()))
                .border_style(Style::default().fg(border_color)),
        );
        frame.render_widget(paragraph, *chunk);
    }
}

fn focused_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn button_span(button: &Button, focused: bool) -> Span<'static> {
    let text = format!("[ {} ]", button.label);
    if focused {
        return Span::styled(text, focused_style());
    }
    let mut style = match (button.enabled, button.tone) {
        (false, _) => Style::default().fg(Color::DarkGray),
        (true, Tone::Normal) => Style::default().fg(Color::White),
        (true, Tone::Positive) => Style::default().fg(Color::Green),
        (true, Tone::Negative) => Style::default().fg(Color::Red),
    };
    if button.default && button.enabled {
        style = style.add_modifier(Modifier::BOLD);
    }
    Span::styled(text, style)
}

fn node_spans(node: &Node, focus: Option<&Control<'_>>) -> Vec<Span<'static>> {
    let focused = focus.is_some_and(|control| control.is_node(node));
    let highlight = |text: String| {
        if focused {
            Span::styled(text, focused_style())
        } else {
            Span::styled(text, Style::default().fg(Color::Yellow))
        }
    };
    let caption = |label: &str| Span::styled(format!("{label}: "), Style::default().fg(Color::Gray));

    match node {
        Node::Label(text) => vec![Span::raw(text.clone())],
        Node::TextField { label, value, .. } => {
            let cursor = if focused { "_" } else { "" };
            vec![caption(label.as_str()), highlight(format!("[{value}{cursor}]"))]
        }
        Node::Toggle { label, on, .. } => {
            let mark = if *on { "[x]" } else { "[ ]" };
            vec![highlight(format!("{mark} {label}"))]
        }
        Node::Picker {
            label, selected, ..
        } => {
            let shown = if selected.is_empty() {
                "(none)"
            } else {
                selected.as_str()
            };
            vec![caption(label.as_str()), highlight(format!("◀ {shown} ▶"))]
        }
        Node::Button(button) => vec![button_span(button, focused)],
        Node::Row(children) => {
            let mut spans = Vec::new();
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(" "));
                }
                spans.extend(node_spans(child, focus));
            }
            spans
        }
        Node::Modal { .. } => Vec::new(),
    }
}

/// A rectangle of the given size centered in `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_modal(
    frame: &mut Frame,
    title: &str,
    message: &str,
    buttons: &[Button],
    focus: Option<&Control<'_>>,
) {
    let area = centered_rect(60, 8, frame.area());
    frame.render_widget(Clear, area);

    let mut button_line = Vec::new();
    for (i, button) in buttons.iter().enumerate() {
        if i > 0 {
            button_line.push(Span::raw("  "));
        }
        let focused = focus.is_some_and(|control| control.is_button(button));
        button_line.push(button_span(button, focused));
    }

    let text = vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(button_line),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {title} "))
                .border_style(Style::default().fg(Color::Magenta)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.focused_control().map(|control| control.widget) {
        Some(Widget::Node(Node::TextField { .. })) => {
            "[Type] Edit  [Backspace] Delete  [Tab/↑↓] Move  [Enter] Submit  [Ctrl+Q] Quit"
        }
        Some(Widget::Node(Node::Picker { .. })) => {
            "[←→] Choose  [Tab/↑↓] Move  [Enter] Submit  [Ctrl+Q] Quit"
        }
        Some(Widget::Node(Node::Toggle { .. })) => {
            "[Space] Toggle  [Tab/↑↓] Move  [Enter] Submit  [Ctrl+Q] Quit"
        }
        Some(_) => "[Enter/Space] Press  [Tab/↑↓] Move  [Ctrl+Q] Quit",
        None => "[Ctrl+Q] Quit",
    };

    let footer = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default());

    frame.render_widget(footer, area);
}
