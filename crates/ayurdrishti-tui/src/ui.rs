use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use ayurdrishti_core::{ChatView, FlowKind, IdentifyView, LineKind, Organ, Phase, ViewLine};

use crate::app::{App, BackendHealth, InputMode};
use crate::input;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, nav, body, footer
    let [header_area, nav_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_nav(app, frame, nav_area);

    match app.screen() {
        FlowKind::Identify => render_identify_screen(app, frame, body_area),
        FlowKind::Ayurveda => render_chat_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);

    if app.notice.is_some() {
        render_notice(app, frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" AyurDrishti ", Style::default().fg(Color::Green).bold()),
        Span::styled("Live Plant ID + Ayurveda tips", Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::Black));
    frame.render_widget(header, area);
}

fn render_nav(app: &App, frame: &mut Frame, area: Rect) {
    let [tabs_area, backend_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(backend_width(app))])
            .areas(area);

    let mut tabs: Vec<Span> = Vec::new();
    for (i, kind) in FlowKind::all().iter().enumerate() {
        let label = format!(" {} {} ", i + 1, kind.title());
        let style = if *kind == app.screen() {
            Style::default().bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        tabs.push(Span::styled(label, style));
        tabs.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(tabs)), tabs_area);

    let (marker, marker_style) = match &app.health {
        BackendHealth::Checking => ("…", Style::default().fg(Color::DarkGray)),
        BackendHealth::Online(status) if status.mock => {
            ("● mock", Style::default().fg(Color::Yellow))
        }
        BackendHealth::Online(_) => ("● online", Style::default().fg(Color::Green)),
        BackendHealth::Offline(_) => ("● offline", Style::default().fg(Color::Red)),
    };
    let backend = Line::from(vec![
        Span::styled(
            format!("Backend: {} ", app.shell.api_base()),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(marker, marker_style),
        Span::raw(" "),
    ]);
    frame.render_widget(Paragraph::new(backend).alignment(Alignment::Right), backend_area);
}

fn backend_width(app: &App) -> u16 {
    // "Backend: <base> ● offline "
    (app.shell.api_base().as_str().chars().count() + 21) as u16
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.screen() {
        FlowKind::Identify => " IDENTIFY ",
        FlowKind::Ayurveda => " AYURVEDA ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let hint = |key: &'static str, label: &'static str| {
        [
            Span::styled(format!(" {} ", key), key_style),
            Span::styled(format!(" {} ", label), label_style),
        ]
    };

    let mut hints: Vec<Span> = Vec::new();
    match (app.screen(), app.input_mode) {
        (FlowKind::Identify, InputMode::Normal) => {
            hints.extend(hint("o", "image"));
            hints.extend(hint("h/l", "organ"));
            hints.extend(hint("s", "identify"));
            hints.extend(hint("D", "save organ"));
        }
        (FlowKind::Identify, InputMode::Editing) => {
            hints.extend(hint("Enter", "load"));
            hints.extend(hint("Esc", "cancel"));
        }
        (FlowKind::Ayurveda, InputMode::Normal) => {
            hints.extend(hint("i", "type"));
            hints.extend(hint("Enter", "ask"));
        }
        (FlowKind::Ayurveda, InputMode::Editing) => {
            hints.extend(hint("Enter", "ask"));
            hints.extend(hint("Alt+Enter", "newline"));
            hints.extend(hint("Esc", "stop typing"));
        }
    }
    if app.input_mode == InputMode::Normal {
        hints.extend(hint("j/k", "scroll"));
        hints.extend(hint("Tab", "switch"));
        hints.extend(hint("r", "ping"));
        hints.extend(hint("q", "quit"));
    }

    let mut spans = vec![
        Span::styled(mode_text, mode_style),
        Span::styled(" ", label_style),
    ];
    spans.extend(hints);
    if let Some(status) = &app.status_message {
        spans.push(Span::styled(format!("  {}", status), Style::default().fg(Color::Green)));
    }

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

/// Submit button label; reads as disabled while a request is outstanding.
fn button(label: &str, busy_label: &str, busy: bool, frame_idx: u8) -> Span<'static> {
    if busy {
        let dots = ".".repeat((frame_idx as usize) + 1);
        Span::styled(
            format!("[ {}{:<3} ]", busy_label, dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(
            format!("[ {} ]", label),
            Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD),
        )
    }
}

fn render_identify_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [form_area, result_area] =
        Layout::vertical([Constraint::Length(5), Constraint::Min(0)]).areas(area);

    let editing = app.input_mode == InputMode::Editing;
    let flow = &app.shell.identify;

    let form_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing { Color::Yellow } else { Color::Green }))
        .title(" Plant Identify ");
    let inner = form_block.inner(form_area);
    frame.render_widget(form_block, form_area);

    let label = Style::default().fg(Color::Gray);
    let image_line = if editing {
        Line::from(vec![
            Span::styled("Image path: ", label),
            Span::styled(app.path_input.clone(), Style::default().fg(Color::Cyan)),
        ])
    } else {
        match flow.image() {
            Some(image) => Line::from(vec![
                Span::styled("Image: ", label),
                Span::raw(image.file_name.clone()),
                Span::styled(format!(" ({}, {})", image.mime, image.size_label()), label),
            ]),
            None => Line::from(vec![
                Span::styled("Image: ", label),
                Span::styled("none selected (press o)", Style::default().fg(Color::DarkGray)),
            ]),
        }
    };

    let mut organ_spans = vec![Span::styled("Organ: ", label)];
    for organ in Organ::all() {
        if organ == flow.organ() {
            organ_spans.push(Span::styled(
                format!("‹{}›", organ.display_name()),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ));
        } else {
            organ_spans.push(Span::styled(format!(" {} ", organ.display_name()), label));
        }
        organ_spans.push(Span::raw(" "));
    }

    let busy = flow.phase() == Phase::Submitting;
    let button_line = Line::from(button("Identify", "Identifying", busy, app.animation_frame));

    frame.render_widget(
        Paragraph::new(Text::from(vec![image_line, Line::from(organ_spans), button_line])),
        inner,
    );

    if editing {
        let (col, _) = input::cursor_position(&app.path_input, app.path_cursor);
        let x = inner.x + "Image path: ".len() as u16 + col;
        frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
    }

    let result_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Result ");

    let text = match flow.result() {
        Some(result) => styled_text(IdentifyView::from(result).lines()),
        None => Text::from(Span::styled(
            "Choose an image of a leaf, flower, fruit, bark or the whole plant.",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let paragraph = Paragraph::new(text)
        .block(result_block)
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll, 0));
    frame.render_widget(paragraph, result_area);
}

fn styled_text(lines: Vec<ViewLine>) -> Text<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let title = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD | Modifier::ITALIC);

    let lines: Vec<Line> = lines
        .into_iter()
        .map(|line| {
            let style = match line.kind {
                LineKind::Field => {
                    let label = format!("{}: ", line.label.unwrap_or_default());
                    return Line::from(vec![Span::styled(label, dim), Span::raw(line.text)]);
                }
                LineKind::Title => title,
                LineKind::Heading => Style::default().add_modifier(Modifier::BOLD),
                LineKind::Caution => Style::default().fg(Color::Red),
                LineKind::Notice => Style::default().fg(Color::Yellow),
                LineKind::Detail => dim,
                LineKind::Disclaimer => dim.add_modifier(Modifier::ITALIC),
                LineKind::Use | LineKind::Body | LineKind::Blank => Style::default(),
            };
            Line::from(Span::styled(line.text, style))
        })
        .collect();

    Text::from(lines)
}

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [input_area, button_area, answer_area] = Layout::vertical([
        Constraint::Length(6),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    let editing = app.input_mode == InputMode::Editing;
    let flow = &app.shell.chat;

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing { Color::Yellow } else { Color::Magenta }))
        .title(" Ayurveda Chat ");

    let inner = input_block.inner(input_area);
    let input_text = if flow.message().is_empty() && !editing {
        Text::from(Span::styled(
            "Symptoms or daily wellness question...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(
            input::wrap_rows(flow.message(), inner.width)
                .into_iter()
                .map(Line::from)
                .collect::<Vec<_>>(),
        )
    };

    let (col, row) = input::wrapped_cursor_position(flow.message(), app.chat_cursor, inner.width);
    let scroll = row.saturating_sub(inner.height.saturating_sub(1));
    frame.render_widget(
        Paragraph::new(input_text).block(input_block).scroll((scroll, 0)),
        input_area,
    );

    if editing {
        frame.set_cursor_position((inner.x + col, inner.y + row - scroll));
    }

    let busy = flow.phase() == Phase::Submitting;
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(" "),
            button("Ask", "Thinking", busy, app.animation_frame),
        ])),
        button_area,
    );

    let answer_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Answer ");

    let text = match flow.result() {
        Some(result) => styled_text(ChatView::from(result).lines()),
        None => Text::default(),
    };

    let paragraph = Paragraph::new(text)
        .block(answer_block)
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll, 0));
    frame.render_widget(paragraph, answer_area);
}

fn render_notice(app: &App, frame: &mut Frame, area: Rect) {
    let Some(notice) = &app.notice else {
        return;
    };

    // Calculate popup size and position (centered)
    let popup_width = 60.min(area.width.saturating_sub(4));
    let text_width = popup_width.saturating_sub(2).max(1) as usize;
    let wrapped_rows = notice
        .message
        .lines()
        .map(|l| l.chars().count().max(1).div_ceil(text_width))
        .sum::<usize>() as u16;
    let popup_height = (wrapped_rows + 4).min(area.height.saturating_sub(2));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(notice.title.clone());

    let mut lines: Vec<Line> = notice
        .message
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Enter/Esc to dismiss",
        Style::default().fg(Color::DarkGray),
    )));
    let text = Text::from(lines);

    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        popup_area,
    );
}
