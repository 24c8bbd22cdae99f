use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;

use hexsplit::core::{BlockRow, LookupState};
use hexsplit::domain::abi::ValueClass;

use crate::app::{App, Focus, InputMode, PromptKind, StatusLevel};

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header, app);
    draw_input_panel(f, areas.input, app);
    draw_signature_panel(f, areas.signature, app);
    draw_blocks_panel(f, areas.blocks, app);
    draw_error_line(f, areas.error_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let mode = if app.calldata_mode { "on" } else { "off" };
    let title = Line::from(vec![
        Span::styled(
            "hexsplit",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Calldata", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {mode} ")),
        Span::styled("Focus", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {}", app.focus_label())),
    ]);
    let left = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    let lookups = if app.session.lookups_enabled() {
        "online"
    } else {
        "offline"
    };
    let right_line = Line::from(vec![
        Span::styled("Blocks ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", app.session.blocks().len())),
        Span::styled("Lookup ", Style::default().fg(Color::DarkGray)),
        Span::raw(lookups),
    ]);
    let right = Paragraph::new(right_line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}

fn border_style(app: &App, focus: Focus) -> Style {
    if app.focus == focus {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_input_panel(f: &mut Frame, area: Rect, app: &App) {
    let mut text = app.input.clone();
    if app.focus == Focus::Input && app.input_mode == InputMode::Normal {
        text.push('▏');
    }
    let content = if app.input.is_empty() && app.focus != Focus::Input {
        Text::styled(
            "Paste hex data here (0x prefix and whitespace are ignored)",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Text::raw(text)
    };

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Input  (F5 split, Ctrl-t calldata)")
                .border_style(border_style(app, Focus::Input)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn draw_signature_panel(f: &mut Frame, area: Rect, app: &App) {
    let paragraph = Paragraph::new(Text::from(signature_lines(app)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Function")
                .border_style(border_style(app, Focus::Signatures)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn signature_lines(app: &App) -> Vec<Line<'static>> {
    let session = &app.session;
    let Some(selector) = session.selector() else {
        let hint = if app.calldata_mode {
            "No selector yet"
        } else {
            "Calldata mode off (Ctrl-t)"
        };
        return vec![Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        ))];
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Selector ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                selector.to_string(),
                Style::default()
                    .fg(Color::LightYellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Lookup ", Style::default().fg(Color::DarkGray)),
            Span::raw(selector.browse_url(&app.browse_url)),
        ]),
    ];

    let state = session.lookup_state();
    if let Some(message) = state.message() {
        let color = match state {
            LookupState::Failed(_) => Color::LightRed,
            LookupState::NotFound | LookupState::Disabled => Color::LightYellow,
            _ => Color::Gray,
        };
        lines.push(Line::from(Span::styled(message, Style::default().fg(color))));
    }

    if let LookupState::Found {
        candidates,
        selected,
    } = state
    {
        if candidates.len() > 1 {
            for (idx, candidate) in candidates.iter().enumerate() {
                let style = if idx == *selected {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let marker = if idx == *selected { "> " } else { "  " };
                lines.push(Line::from(vec![
                    Span::styled(format!("{marker}{}", candidate.text), style),
                    Span::styled(
                        format!("  #{}", candidate.id),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
            }
        }
    }

    if let Some(view) = session.signature_view() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            view.signature.to_string(),
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )));
        for row in view.rows {
            let value_style = match row.value.as_ref().map(|v| v.class) {
                Some(ValueClass::Error) => Style::default().fg(Color::LightRed),
                Some(ValueClass::Offset) | None => Style::default().fg(Color::DarkGray),
                _ => Style::default(),
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  [{}] {} ", row.index, row.ty),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(row.display_value().to_string(), value_style),
            ]));
        }
    }

    lines
}

fn draw_blocks_panel(f: &mut Frame, area: Rect, app: &App) {
    let rows = app.session.block_rows();
    let items: Vec<ListItem> = rows.iter().map(block_item).collect();
    let title = format!("Blocks ({})", rows.len());

    let highlight_style = if app.focus == Focus::Blocks {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style(app, Focus::Blocks)),
        )
        .highlight_style(highlight_style)
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.selected_block.min(rows.len() - 1)));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn block_item(row: &BlockRow) -> ListItem<'static> {
    let header_style = if row.complete {
        Style::default().fg(Color::LightCyan)
    } else {
        Style::default().fg(Color::LightYellow)
    };
    let mut header = vec![Span::styled(row.header.clone(), header_style)];
    if let Some(hint) = &row.hint {
        header.push(Span::styled(
            format!("  {hint}"),
            Style::default().fg(Color::LightMagenta),
        ));
    }

    let decode_line = match (row.choice, &row.decoded) {
        (Some(kind), Some(decoded)) => {
            let style = if decoded.class == ValueClass::Error {
                Style::default().fg(Color::LightRed)
            } else {
                Style::default().fg(Color::LightGreen)
            };
            Line::from(vec![
                Span::styled(format!("  {kind}: "), Style::default().fg(Color::DarkGray)),
                Span::styled(decoded.text.clone(), style),
            ])
        }
        _ if row.complete => Line::from(Span::styled(
            "  decode: none (←/→)",
            Style::default().fg(Color::DarkGray),
        )),
        _ => Line::from(Span::styled(
            "  partial block, not decodable",
            Style::default().fg(Color::DarkGray),
        )),
    };

    ListItem::new(vec![
        Line::from(header),
        Line::from(format!("  {}", row.content)),
        decode_line,
    ])
}

fn draw_error_line(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.error.as_deref() {
        Some(message) => Line::from(vec![
            Span::styled("error: ", Style::default().fg(Color::DarkGray)),
            Span::styled(message.to_string(), Style::default().fg(Color::LightRed)),
        ]),
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Prompt(PromptKind::Signature) => Line::from(vec![
            Span::styled("> signature ", Style::default().fg(Color::LightCyan)),
            Span::raw(app.prompt_input.clone()),
            Span::styled(
                "  (e.g. transfer(address,uint256), Enter=ok Esc=cancel)",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        InputMode::Normal => {
            if let Some((text, level)) = app.status_text() {
                let color = match level {
                    StatusLevel::Info => Color::LightGreen,
                    StatusLevel::Warn => Color::LightYellow,
                    StatusLevel::Error => Color::LightRed,
                };
                Line::from(vec![
                    Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(text.to_string(), Style::default().fg(color)),
                ])
            } else {
                action_hints(app)
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn action_hints(app: &App) -> Line<'static> {
    let hints = match app.focus {
        Focus::Input => "F5 split  Ctrl-t calldata  Ctrl-l clear  Tab focus  ? help",
        Focus::Blocks => "j/k move  h/l decode  x none  y copy  Tab focus  ? help  q quit",
        Focus::Signatures => "[/] candidate  s signature  y copy  o link  Tab focus  q quit",
    };
    Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(64, 70, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Global"),
        Line::from("  F5 / Ctrl-s  Split input"),
        Line::from("  Ctrl-t       Toggle calldata mode"),
        Line::from("  Ctrl-l       Clear all"),
        Line::from("  Tab          Cycle focus"),
        Line::from("  Ctrl-c       Quit"),
        Line::from(""),
        Line::from("Blocks"),
        Line::from("  j / k        Move selection"),
        Line::from("  h / l        Cycle decode type"),
        Line::from("  x            Clear decode type"),
        Line::from("  y            Copy block hex"),
        Line::from(""),
        Line::from("Function"),
        Line::from("  [ / ]        Prev/Next candidate"),
        Line::from("  s            Enter signature manually"),
        Line::from("  y            Copy signature"),
        Line::from("  o            Copy lookup link"),
        Line::from(""),
        Line::from("  ?            Toggle help"),
        Line::from("  q            Quit (outside input)"),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
