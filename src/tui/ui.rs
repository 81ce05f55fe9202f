use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::app::{App, Focus, HitTarget};
use crate::action::{Action, Region};
use crate::api::Backend;
use crate::modal::{FieldKind, Modal};
use crate::view::{self, Card, ListRow, MonthGrid, Rendered, ViewMode, WEEKDAYS};

const CARD_WIDTH: u16 = 32;
const CARD_HEIGHT: u16 = 6;
const EDIT_LABEL: &str = "[Edit]";
const DELETE_LABEL: &str = "[Del]";

fn rgb(hex: &str) -> Color {
    match view::hex_rgb(hex) {
        Some((r, g, b)) => Color::Rgb(r, g, b),
        None => Color::Gray,
    }
}

fn class_color(class: &str) -> Color {
    match class {
        "priority-high" => Color::Red,
        "priority-medium" => Color::Yellow,
        _ => Color::Green,
    }
}

/// Truncates or pads `s` to exactly `width` characters.
fn fit(s: &str, width: usize) -> String {
    let count = s.chars().count();
    if count > width {
        if width == 0 {
            return String::new();
        }
        let mut out: String = s.chars().take(width - 1).collect();
        out.push('…');
        out
    } else {
        format!("{}{}", s, " ".repeat(width - count))
    }
}

fn width_of(s: &str) -> u16 {
    s.chars().count() as u16
}

pub fn ui<B: Backend>(f: &mut Frame, app: &mut App<B>) {
    app.hits.clear();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Toolbar
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(0)])
        .split(chunks[1]);

    draw_toolbar(f, app, chunks[0]);
    draw_categories(f, app, body[0]);
    draw_tasks(f, app, body[1]);
    draw_help(f, app, chunks[2]);
    draw_popups(f, app);
}

fn draw_toolbar<B: Backend>(f: &mut Frame, app: &mut App<B>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Taskboard");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let filter = &app.ctl.state.filter;
    let filter_label = match filter.active_count() {
        0 => "Filter".to_string(),
        n => format!("Filter ({})", n),
    };
    let mut buttons = vec![
        ("+ Category".to_string(), Action::NewCategory, false),
        ("+ Task".to_string(), Action::NewTask, false),
        (filter_label, Action::OpenFilter, !filter.is_empty()),
    ];
    for mode in ViewMode::ALL {
        buttons.push((mode.label().to_string(), Action::SetView(mode), app.ctl.state.view == mode));
    }

    let mut spans = Vec::new();
    let mut x = inner.x;
    for (label, action, active) in buttons {
        let text = format!("[{}]", label);
        let w = width_of(&text);
        let style = if active {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let visible = w.min(inner.right().saturating_sub(x));
        app.hits.push(Rect::new(x, inner.y, visible, 1), HitTarget::Button(action));
        spans.push(Span::styled(text, style));
        spans.push(Span::raw(" "));
        x = x.saturating_add(w + 1);
    }

    let searching = app.focus == Focus::Search;
    spans.push(Span::raw(" Search: "));
    let search_style = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if searching { "_" } else { "" };
    spans.push(Span::styled(format!("{}{}", app.ctl.state.search, cursor), search_style));

    f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default().borders(Borders::ALL).title(title).border_style(border)
}

fn draw_categories<B: Backend>(f: &mut Frame, app: &mut App<B>, area: Rect) {
    let focused = app.focus == Focus::Categories;
    let block = pane_block("Categories".to_string(), focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let categories = app.ctl.store.categories();
    if categories.is_empty() {
        let hint = Paragraph::new("No categories").style(Style::default().fg(Color::DarkGray));
        f.render_widget(hint, inner);
        return;
    }

    let name_width = inner.width.saturating_sub(4) as usize;
    let mut lines = Vec::new();
    for (i, cat) in categories.iter().enumerate().take(inner.height as usize) {
        let active = app.ctl.state.active_category.as_deref() == Some(cat.id.as_str());
        let mut style = Style::default();
        if active {
            style = style.add_modifier(Modifier::BOLD).bg(Color::DarkGray);
        }
        if focused && i == app.category_index {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(vec![
            Span::styled("● ", Style::default().fg(rgb(&cat.color))),
            Span::styled(fit(&cat.name, name_width), style),
            Span::raw(" ✎"),
        ]));

        let y = inner.y + i as u16;
        let item = Region::CategoryItem(cat.id.clone());
        app.hits.push(Rect::new(inner.x, y, inner.width, 1), HitTarget::Categories(vec![item.clone()]));
        app.hits.push(
            Rect::new(inner.right().saturating_sub(1), y, 1, 1),
            HitTarget::Categories(vec![Region::CategoryEdit, item]),
        );
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_tasks<B: Backend>(f: &mut Frame, app: &mut App<B>, area: Rect) {
    let focused = app.focus != Focus::Categories;
    let mode = app.ctl.state.view;
    let mut title = format!("Tasks: {}", mode);
    if let Some(cat) = app.ctl.state.active_category.as_deref().and_then(|id| app.ctl.store.category(id)) {
        title.push_str(&format!(" [{}]", cat.name));
    }
    let block = pane_block(title, focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.rendered() {
        Rendered::List(rows) => draw_list(f, app, inner, &rows),
        Rendered::Cards(cards) => draw_cards(f, app, inner, &cards),
        Rendered::Calendar(grid) => draw_calendar(f, app, inner, &grid),
    }
}

fn scroll_offset(selected: usize, visible: usize) -> usize {
    if visible == 0 || selected < visible {
        0
    } else {
        selected + 1 - visible
    }
}

fn draw_list<B: Backend>(f: &mut Frame, app: &mut App<B>, area: Rect, rows: &[ListRow]) {
    if rows.is_empty() {
        f.render_widget(Paragraph::new("No tasks found.").style(Style::default().fg(Color::DarkGray)), area);
        return;
    }

    // Marker, then Task (flexible), Project, Priority, Date, Owner, Category, actions.
    const FIXED: [usize; 5] = [12, 8, 10, 10, 12];
    let actions_width = EDIT_LABEL.len() + 1 + DELETE_LABEL.len();
    let used = 2 + FIXED.iter().sum::<usize>() + actions_width + FIXED.len() + 1;
    let title_width = (area.width as usize).saturating_sub(used).max(8);

    let header_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "  {} {} {} {} {} {} Actions",
            fit("Task", title_width),
            fit("Project", FIXED[0]),
            fit("Priority", FIXED[1]),
            fit("Date", FIXED[2]),
            fit("Owner", FIXED[3]),
            fit("Category", FIXED[4]),
        ),
        header_style,
    ))];

    let visible = area.height.saturating_sub(1) as usize;
    let offset = scroll_offset(app.task_index, visible);
    let highlight = app.focus == Focus::Tasks;
    let actions_x = area.x + (2 + title_width + FIXED.iter().sum::<usize>() + FIXED.len() + 1) as u16;

    for (i, row) in rows.iter().enumerate().skip(offset).take(visible) {
        let selected = highlight && i == app.task_index;
        let marker = if selected { "> " } else { "  " };
        let row_style = if selected {
            Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let category = match &row.category {
            Some(badge) => Span::styled(
                fit(&badge.name, FIXED[4]),
                Style::default().bg(rgb(&badge.color)).fg(Color::Black),
            ),
            None => Span::raw(fit("", FIXED[4])),
        };
        lines.push(
            Line::from(vec![
                Span::raw(marker),
                Span::raw(fit(&row.title, title_width)),
                Span::raw(" "),
                Span::raw(fit(&row.project, FIXED[0])),
                Span::raw(" "),
                Span::styled(
                    fit(row.priority.as_str(), FIXED[1]),
                    Style::default().fg(class_color(row.priority_class)),
                ),
                Span::raw(" "),
                Span::raw(fit(&row.date, FIXED[2])),
                Span::raw(" "),
                Span::raw(fit(&row.owner, FIXED[3])),
                Span::raw(" "),
                category,
                Span::raw(" "),
                Span::styled(EDIT_LABEL, Style::default().fg(Color::Cyan)),
                Span::raw(" "),
                Span::styled(DELETE_LABEL, Style::default().fg(Color::Red)),
            ])
            .style(row_style),
        );

        let y = area.y + 1 + (i - offset) as u16;
        let id = row.task_id.clone();
        app.hits.push(Rect::new(area.x, y, area.width, 1), HitTarget::Tasks(vec![Region::TaskItem(id.clone())]));
        push_action_hits(app, actions_x, y, area.right(), &id);
    }
    f.render_widget(Paragraph::new(lines), area);
}

/// Records the edit and delete buttons of one task starting at `x`.
fn push_action_hits<B: Backend>(app: &mut App<B>, x: u16, y: u16, right: u16, id: &str) {
    let clip = |x: u16, w: u16| w.min(right.saturating_sub(x));
    let edit_w = width_of(EDIT_LABEL);
    app.hits.push(
        Rect::new(x, y, clip(x, edit_w), 1),
        HitTarget::Tasks(vec![Region::EditButton(id.to_string()), Region::TaskItem(id.to_string())]),
    );
    let del_x = x.saturating_add(edit_w + 1);
    app.hits.push(
        Rect::new(del_x, y, clip(del_x, width_of(DELETE_LABEL)), 1),
        HitTarget::Tasks(vec![Region::DeleteButton(id.to_string()), Region::TaskItem(id.to_string())]),
    );
}

fn draw_cards<B: Backend>(f: &mut Frame, app: &mut App<B>, area: Rect, cards: &[Card]) {
    if cards.is_empty() {
        f.render_widget(Paragraph::new("No tasks found.").style(Style::default().fg(Color::DarkGray)), area);
        return;
    }

    let cols = (area.width / CARD_WIDTH).max(1) as usize;
    let rows_visible = (area.height / CARD_HEIGHT).max(1) as usize;
    let offset = scroll_offset(app.task_index / cols, rows_visible);
    let highlight = app.focus == Focus::Tasks;

    for (i, card) in cards.iter().enumerate() {
        let (row, col) = (i / cols, i % cols);
        if row < offset || row - offset >= rows_visible {
            continue;
        }
        let rect = Rect::new(
            area.x + col as u16 * CARD_WIDTH,
            area.y + (row - offset) as u16 * CARD_HEIGHT,
            CARD_WIDTH.min(area.width),
            CARD_HEIGHT.min(area.height),
        );
        let selected = highlight && i == app.task_index;
        let border = if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(fit(&card.title, CARD_WIDTH.saturating_sub(4) as usize));
        let inner = block.inner(rect);
        f.render_widget(block, rect);

        let text_width = inner.width.saturating_sub(2) as usize;
        let lines = vec![
            Line::from(vec![
                Span::styled("▌ ", Style::default().fg(rgb(&card.swatch))),
                Span::raw(fit(&card.description, text_width)),
            ]),
            Line::from(Span::styled(
                fit(&card.meta, inner.width as usize),
                Style::default().fg(class_color(view::priority_class(card.priority))),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(EDIT_LABEL, Style::default().fg(Color::Cyan)),
                Span::raw(" "),
                Span::styled(DELETE_LABEL, Style::default().fg(Color::Red)),
            ]),
        ];
        f.render_widget(Paragraph::new(lines), inner);

        let id = card.task_id.clone();
        app.hits.push(rect, HitTarget::Tasks(vec![Region::TaskItem(id.clone())]));
        if inner.height >= 4 {
            push_action_hits(app, inner.x, inner.y + 3, inner.right(), &id);
        }
    }
}

fn draw_calendar<B: Backend>(f: &mut Frame, app: &mut App<B>, area: Rect, grid: &MonthGrid) {
    if area.height < 3 {
        return;
    }
    let today = app.ctl.today();
    let selected = app.selected_date();

    // Header: month title and navigation buttons.
    let title = format!("{}  ", grid.title);
    let mut spans = vec![Span::styled(title.clone(), Style::default().add_modifier(Modifier::BOLD))];
    let mut x = area.x + width_of(&title);
    for (label, region) in [("[◀]", Region::CalendarPrev), ("[Today]", Region::CalendarToday), ("[▶]", Region::CalendarNext)] {
        let w = width_of(label);
        app.hits.push(Rect::new(x, area.y, w.min(area.right().saturating_sub(x)), 1), HitTarget::Tasks(vec![region]));
        spans.push(Span::styled(label, Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(" "));
        x = x.saturating_add(w + 1);
    }
    f.render_widget(Paragraph::new(Line::from(spans)), Rect::new(area.x, area.y, area.width, 1));

    let cell_w = (area.width / 7).max(1);
    let weekday_line: Vec<Span> = WEEKDAYS
        .iter()
        .map(|d| Span::styled(fit(d, cell_w as usize), Style::default().fg(Color::Cyan)))
        .collect();
    f.render_widget(Paragraph::new(Line::from(weekday_line)), Rect::new(area.x, area.y + 1, area.width, 1));

    let weeks = grid.weeks();
    let grid_top = area.y + 2;
    let grid_h = area.height - 2;
    let cell_h = (grid_h / weeks.len().max(1) as u16).max(2);

    for (w, week) in weeks.iter().enumerate() {
        let y = grid_top + w as u16 * cell_h;
        if y + cell_h > area.bottom() {
            break;
        }
        for (d, cell) in week.iter().enumerate() {
            let Some(day) = cell else { continue };
            let rect = Rect::new(area.x + d as u16 * cell_w, y, cell_w, cell_h);
            let mut border = Style::default().fg(Color::DarkGray);
            if day.date == selected {
                border = Style::default().fg(Color::Yellow);
            }
            let mut num_style = Style::default();
            if day.date == today {
                num_style = num_style.add_modifier(Modifier::BOLD).fg(Color::Cyan);
            }
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(day.day.to_string(), num_style));
            let inner = block.inner(rect);
            f.render_widget(block, rect);
            app.hits.push(rect, HitTarget::Tasks(vec![Region::DayCell(day.date)]));

            let slots = inner.height as usize;
            let overflow = day.events.len() > slots;
            let shown = if overflow { slots.saturating_sub(1) } else { day.events.len() };
            let mut lines = Vec::new();
            for (k, ev) in day.events.iter().take(shown).enumerate() {
                lines.push(Line::from(Span::styled(
                    fit(&ev.title, inner.width as usize),
                    Style::default().bg(rgb(&ev.color)).fg(Color::Black),
                )));
                // Chips are their own click targets, not nested in the day cell.
                app.hits.push(
                    Rect::new(inner.x, inner.y + k as u16, inner.width, 1),
                    HitTarget::Tasks(vec![Region::EventChip(ev.task_id.clone())]),
                );
            }
            if overflow && slots > 0 {
                lines.push(Line::from(Span::styled(
                    format!("+{} more", day.events.len() - shown),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            f.render_widget(Paragraph::new(lines), inner);
        }
    }
}

fn draw_help<B: Backend>(f: &mut Frame, app: &App<B>, area: Rect) {
    let help_text = if app.ctl.notice.is_some() {
        "Any key: Dismiss"
    } else if app.ctl.confirm.is_some() {
        "y: Yes | n: No"
    } else if let Some(open) = &app.ctl.modal {
        match open.modal {
            Modal::Category(ref form) if form.can_delete() => {
                "Enter: Save | Esc: Cancel | Tab: Next field | Ctrl-D: Delete"
            }
            Modal::Filter(_) => "Enter: Apply | Esc: Cancel | Ctrl-L: Clear | Tab: Next field | Space: Toggle",
            _ => "Enter: Save | Esc: Cancel | Tab: Next field | Space/←→: Change choice",
        }
    } else {
        match (app.focus, app.ctl.state.view) {
            (Focus::Search, _) => "Type to search | Enter/Esc: Done",
            (Focus::Categories, _) => "q: Quit | Tab: Tasks | Enter: Select/Clear | e: Edit | A: New category | 1/2/3: View",
            (_, ViewMode::Calendar) => "q: Quit | ←→↑↓: Day | [ ]: Month | t: Today | Enter: New task on day | Space/e: Event | f: Filter | /: Search",
            _ => "q: Quit | a: Add | e: Edit | d: Del | f: Filter | /: Search | Tab: Categories | 1/2/3: List/Cards/Calendar",
        }
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

fn draw_popups<B: Backend>(f: &mut Frame, app: &App<B>) {
    if let Some(open) = &app.ctl.modal {
        let fields = open.fields();
        let area = centered_rect(60, fields.len() as u16 + 2, f.area());
        f.render_widget(Clear, area);

        let label_width = fields.iter().map(|fv| fv.label.len()).max().unwrap_or(0);
        let lines: Vec<Line> = fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let focused = i == open.focus;
                let mut value = field.value.clone();
                if focused && field.kind == FieldKind::Text {
                    value.push('_');
                }
                let style = if focused {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!("{:>w$}: ", field.label, w = label_width), Style::default().fg(Color::Cyan)),
                    Span::styled(value, style),
                ])
            })
            .collect();

        let input = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(open.title()));
        f.render_widget(input, area);
    }

    if let Some(confirm) = &app.ctl.confirm {
        draw_message(f, "Confirm", confirm.prompt(), Color::Yellow);
    }

    if let Some(notice) = &app.ctl.notice {
        draw_message(f, "Notice", notice, Color::Red);
    }
}

fn draw_message(f: &mut Frame, title: &str, text: &str, color: Color) {
    let area = centered_rect(50, 3, f.area());
    f.render_widget(Clear, area);
    let msg = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(msg, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height - height) / 2),
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
