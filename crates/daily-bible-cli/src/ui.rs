use daily_bible_engine::{BibleApi, ReaderSnapshot, RenderVerse, VerseSegment};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::{App, BookRow, Focus, Input};

pub fn draw<C: BibleApi + 'static>(f: &mut Frame, app: &mut App<C>) {
    let snapshot = app.reader.snapshot();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, rows[0], &snapshot);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24),
            Constraint::Length(10),
            Constraint::Min(0),
        ])
        .split(rows[1]);

    draw_books(f, columns[0], app, &snapshot);
    draw_chapters(f, columns[1], app, &snapshot);
    draw_verses(f, columns[2], app, &snapshot);
    draw_status(f, rows[2], app, &snapshot);
    draw_prompt(f, rows[3], app);
}

fn pane(title: String, focused: bool, loading: bool) -> Block<'static> {
    let title = if loading {
        format!("{title} (loading)")
    } else {
        title
    };
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

fn draw_header(f: &mut Frame, area: Rect, snapshot: &ReaderSnapshot) {
    let header = Line::from(vec![
        Span::styled("Daily Bible", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  ·  "),
        Span::styled(
            snapshot.translation.clone(),
            Style::default().fg(Color::Cyan),
        ),
    ]);
    f.render_widget(Paragraph::new(header), area);
}

fn draw_books<C: BibleApi + 'static>(
    f: &mut Frame,
    area: Rect,
    app: &mut App<C>,
    snapshot: &ReaderSnapshot,
) {
    let items: Vec<ListItem> = app
        .book_rows
        .iter()
        .map(|row| match row {
            BookRow::Section(title) => ListItem::new(Line::from(Span::styled(
                title.clone(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            ))),
            BookRow::Book { id, name } => {
                let marker = if snapshot.selected_book_id == Some(*id) {
                    "● "
                } else {
                    "  "
                };
                ListItem::new(format!("{marker}{name}"))
            }
        })
        .collect();

    let list = List::new(items)
        .block(pane(
            "Books".to_string(),
            app.focus == Focus::Books,
            snapshot.loading_books,
        ))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(list, area, &mut app.book_list);
}

fn draw_chapters<C: BibleApi + 'static>(
    f: &mut Frame,
    area: Rect,
    app: &mut App<C>,
    snapshot: &ReaderSnapshot,
) {
    let items: Vec<ListItem> = snapshot
        .chapters
        .iter()
        .map(|chapter| {
            let marker = if *chapter == snapshot.selected_chapter {
                "●"
            } else {
                " "
            };
            ListItem::new(format!("{marker} {chapter}"))
        })
        .collect();

    let list = List::new(items)
        .block(pane(
            "Ch".to_string(),
            app.focus == Focus::Chapters,
            snapshot.loading_chapters,
        ))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(list, area, &mut app.chapter_list);
}

fn draw_verses<C: BibleApi + 'static>(
    f: &mut Frame,
    area: Rect,
    app: &App<C>,
    snapshot: &ReaderSnapshot,
) {
    let block = pane(
        snapshot.verse_header_title(),
        app.focus == Focus::Verses,
        snapshot.loading_verses,
    );

    if let Some(hint) = snapshot.verse_list_status().hint() {
        let hint = Span::styled(hint, Style::default().fg(Color::DarkGray));
        f.render_widget(Paragraph::new(hint).block(block), area);
        return;
    }

    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let mut lines = Vec::new();
    let mut scroll = 0usize;
    for (index, verse) in snapshot.render_verses().iter().enumerate() {
        let verse_lines = verse_lines(verse, index == app.verse_cursor);
        if index < app.verse_cursor {
            scroll += verse_lines
                .iter()
                .map(|line| line.width().div_ceil(inner_width).max(1))
                .sum::<usize>();
        }
        lines.extend(verse_lines);
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    f.render_widget(paragraph, area);
}

fn verse_lines(verse: &RenderVerse, highlighted: bool) -> Vec<Line<'static>> {
    let number_style = if highlighted {
        Style::default().bg(Color::Yellow).fg(Color::Black)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let mut spans = vec![Span::styled(format!("{:>3} ", verse.number), number_style)];
    for segment in &verse.segments {
        match segment {
            VerseSegment::Literal { text } => spans.push(Span::raw(text.clone())),
            VerseSegment::Substitution {
                original,
                replacement,
            } => {
                spans.push(Span::styled(
                    original.clone(),
                    Style::default()
                        .fg(Color::Red)
                        .add_modifier(Modifier::CROSSED_OUT),
                ));
                spans.push(Span::styled(
                    format!(" {replacement}"),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ));
            }
        }
    }
    if verse.edited {
        let badge = Style::default().fg(Color::LightCyan);
        spans.push(Span::styled(" [Edited]", badge));
    }

    let mut lines = vec![Line::from(spans)];
    if let Some(note) = &verse.note {
        lines.push(Line::from(Span::styled(
            format!("    Note: {note}"),
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

fn draw_status<C: BibleApi + 'static>(
    f: &mut Frame,
    area: Rect,
    app: &App<C>,
    snapshot: &ReaderSnapshot,
) {
    let line = match (&snapshot.error, &app.message) {
        (Some(error), _) => Line::from(Span::styled(
            format!("{error} (Esc: dismiss, r: retry)"),
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        (None, Some(message)) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        )),
        (None, None) => Line::default(),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_prompt<C: BibleApi + 'static>(f: &mut Frame, area: Rect, app: &App<C>) {
    let line = match &app.input {
        Some(Input::Edit { buffer, .. }) => {
            Line::from(format!("Edit (original => replacement): {buffer}_"))
        }
        Some(Input::Note { buffer, .. }) => Line::from(format!("Note: {buffer}_")),
        None => Line::from(
            "q: Quit | Tab: Pane | ↑/↓: Move | Enter: Select | t: Translation | \
             e/E/u: Edit/Revise/Undo | n/x: Note/Remove | r: Retry",
        ),
    };
    f.render_widget(Paragraph::new(line), area);
}
