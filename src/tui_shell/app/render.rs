use super::*;

use crate::browser::{SurfaceState, VersionPanel};
use crate::fmt::{format_size, format_timestamp_ms};

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let suggest = if app.focus == Focus::Command {
        suggestions(&app.input.buf)
    } else {
        Vec::new()
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
            Constraint::Length(if suggest.is_empty() { 0 } else { 2 }),
            Constraint::Length(2),
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);

    if app.help_open {
        draw_help(frame, chunks[1]);
    } else {
        draw_main(frame, app, chunks[1]);
    }

    // Latest notice
    let notice = match app.controller.notices().latest() {
        Some(n) => {
            let color = match n.level {
                NoticeLevel::Info => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            Line::from(Span::styled(n.message.as_str(), Style::default().fg(color)))
        }
        None => Line::from(""),
    };
    frame.render_widget(
        Paragraph::new(notice).block(Block::default().borders(Borders::TOP)),
        chunks[2],
    );

    if !suggest.is_empty() {
        let spans: Vec<Span> = suggest
            .iter()
            .flat_map(|d| {
                [
                    Span::styled(d.usage, Style::default().fg(Color::Yellow)),
                    Span::styled(
                        format!("  {}    ", d.help),
                        Style::default().fg(Color::Gray),
                    ),
                ]
            })
            .collect();
        frame.render_widget(
            Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP)),
            chunks[3],
        );
    }

    draw_input(frame, app, chunks[4]);
}

fn draw_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let c = &app.controller;
    let mut top = vec![
        Span::styled(
            "vfbrowse",
            Style::default().fg(Color::Black).bg(Color::White),
        ),
        Span::raw("  "),
        Span::raw(c.display_url()),
    ];
    match c.identity() {
        Some(id) => {
            top.push(Span::raw("  "));
            top.push(Span::styled(id.user, Style::default().fg(Color::Green)));
        }
        None => {
            top.push(Span::raw("  "));
            top.push(Span::styled(
                "anonymous",
                Style::default().fg(Color::Gray),
            ));
        }
    }

    let mut crumbs = Vec::new();
    for crumb in c.crumbs() {
        if crumb.index > 0 {
            crumbs.push(Span::styled(" / ", Style::default().fg(Color::DarkGray)));
        }
        crumbs.push(Span::styled(
            format!("{} ", crumb.index),
            Style::default().fg(Color::DarkGray),
        ));
        let style = if crumb.is_last {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        crumbs.push(Span::styled(crumb.label, style));
    }

    frame.render_widget(
        Paragraph::new(vec![Line::from(top), Line::from(crumbs)])
            .block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

fn draw_main(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    match app.controller.view() {
        View::Loading => {
            let inner = render_view_chrome(frame, "Loading", "", area);
            frame.render_widget(Paragraph::new("Loading..."), inner);
        }
        View::Failed(msg) => {
            let inner = render_view_chrome(frame, "Error", "", area);
            frame.render_widget(
                Paragraph::new(msg.as_str())
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: false }),
                inner,
            );
        }
        View::Folder => draw_folder(frame, app, area),
        View::File(file) => draw_file(frame, file, area),
        View::Versioned(panel) => draw_versioned(frame, app, panel, area),
    }
}

fn selected_style(selected: bool) -> Style {
    if selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    }
}

fn draw_folder(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let children = app.controller.children();
    let detail = format!("{} entries", children.len());
    let inner = render_view_chrome(frame, "Folder", &detail, area);
    if children.is_empty() {
        frame.render_widget(
            Paragraph::new("(empty)").style(Style::default().fg(Color::Gray)),
            inner,
        );
        return;
    }

    let height = inner.height.max(1) as usize;
    let start = app.selected.saturating_sub(height.saturating_sub(1));
    let lines: Vec<Line> = children
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, child)| {
            let style = selected_style(i == app.selected);
            Line::from(vec![
                Span::styled(format!("{: <40}", child.name), style),
                Span::styled(
                    format!("{: >10}", format_size(child.size)),
                    style.fg(Color::Gray),
                ),
                Span::styled(
                    format!("  {}", format_timestamp_ms(child.last_modified)),
                    style.fg(Color::Gray),
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_file(frame: &mut ratatui::Frame, file: &FileView, area: Rect) {
    let info = &file.info;
    let detail = format!(
        "{}  {}  {}",
        info.mime_type.as_deref().unwrap_or("unknown type"),
        format_size(info.size),
        format_timestamp_ms(info.last_modified)
    );
    let inner = render_view_chrome(frame, &info.name, &detail, area);
    let body = match &file.body {
        FileBody::Text(surface) => Paragraph::new(surface.display_text().to_string()),
        FileBody::Image { location } => Paragraph::new(vec![
            Line::from("Image files are not rendered here."),
            Line::from(Span::styled(
                format!("Download: {}", location),
                Style::default().fg(Color::Cyan),
            )),
        ]),
        FileBody::Unsupported => Paragraph::new("No preview for this file type.")
            .style(Style::default().fg(Color::Gray)),
    };
    frame.render_widget(body.wrap(Wrap { trim: false }), inner);
}

fn draw_versioned(frame: &mut ratatui::Frame, app: &App, panel: &VersionPanel, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(48), Constraint::Min(0)])
        .split(area);

    let hidden_note = if panel.show_hidden() {
        "showing hidden"
    } else {
        ""
    };
    let inner = render_view_chrome(frame, "Versions", hidden_note, cols[0]);
    let rows = panel.rows();
    let lines: Vec<Line> = if rows.is_empty() {
        vec![Line::from(Span::styled(
            if panel.versions().is_some() {
                "(no visible versions)"
            } else {
                "Loading..."
            },
            Style::default().fg(Color::Gray),
        ))]
    } else {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let style = selected_style(i == app.selected);
                let marker = if row.is_selected { "▸" } else { " " };
                let mut tags = String::new();
                if row.is_default {
                    tags.push_str(" default");
                }
                if row.is_latest {
                    tags.push_str(" latest");
                }
                if row.entry.hidden {
                    tags.push_str(" hidden");
                }
                let mut spans = vec![
                    Span::styled(format!("{}v{: <4}", marker, row.entry.version), style),
                    Span::styled(
                        format!("{: >9} ", format_size(row.entry.size)),
                        style.fg(Color::Gray),
                    ),
                    Span::styled(
                        format_timestamp_ms(row.entry.last_modified),
                        style.fg(Color::Gray),
                    ),
                    Span::styled(tags, style.fg(Color::Yellow)),
                ];
                if !row.entry.comment.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", row.entry.comment),
                        style.fg(Color::Cyan),
                    ));
                }
                Line::from(spans)
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), inner);

    let surface = panel.surface();
    let state = if panel.is_busy() {
        "working..."
    } else if !panel.is_read_only() && panel.is_dirty() {
        "editing, modified"
    } else if !panel.is_read_only() {
        "editing"
    } else {
        "read-only"
    };
    let title = match panel.selected() {
        VersionToken::Default => "default".to_string(),
        VersionToken::Latest => "latest".to_string(),
        VersionToken::Ordinal(v) => format!("v{}", v),
    };
    let inner = render_view_chrome(frame, &title, state, cols[1]);
    let (line, col) = surface.cursor_line_col();
    let height = inner.height.max(1) as usize;
    let scroll = line.saturating_sub(height - 1);
    let style = match surface.state() {
        SurfaceState::Failed(_) => Style::default().fg(Color::Red),
        SurfaceState::Loading => Style::default().fg(Color::Gray),
        _ => Style::default(),
    };
    frame.render_widget(
        Paragraph::new(surface.display_text().to_string())
            .style(style)
            .scroll((scroll as u16, 0)),
        inner,
    );

    if app.focus == Focus::Editor {
        let x = inner.x + (col as u16).min(inner.width.saturating_sub(1));
        let y = inner.y + (line - scroll) as u16;
        frame.set_cursor_position((x, y));
    }
}

fn draw_help(frame: &mut ratatui::Frame, area: Rect) {
    let inner = render_view_chrome(frame, "Commands", "Esc to close", area);
    let defs: Vec<CommandDef> = command_defs();
    let mut lines: Vec<Line> = defs
        .iter()
        .map(|d| {
            Line::from(vec![
                Span::styled(format!("{: <26}", d.usage), Style::default().fg(Color::Yellow)),
                Span::raw(d.help),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "keys: enter open  backspace up  e edit  ctrl-s save  esc leave editor  alt-left/right history",
        Style::default().fg(Color::Gray),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_input(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let prompt = app.prompt();
    let line = match app.focus {
        Focus::Command => Line::from(vec![
            Span::styled(prompt, Style::default().fg(Color::Cyan)),
            Span::raw(app.input.buf.as_str()),
        ]),
        Focus::Editor => Line::from(vec![
            Span::styled(prompt, Style::default().fg(Color::Magenta)),
            Span::styled(
                " ctrl-s save  ctrl-z undo  esc leave",
                Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            ),
        ]),
        Focus::Browse => Line::from(vec![
            Span::styled(prompt, Style::default().fg(Color::Cyan)),
            Span::styled(
                " : command  ? help  q quit",
                Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            ),
        ]),
    };
    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::TOP)),
        area,
    );
    if app.focus == Focus::Command {
        let x = area.x + prompt.len() as u16 + app.input.cursor as u16;
        frame.set_cursor_position((x, area.y + 1));
    }
}
