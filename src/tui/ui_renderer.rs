use super::app_logic::TuiApp;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

fn draw_help_block(f: &mut Frame, area: Rect) {
    let help_text_lines_content = vec![
        Line::from("Type: Filter | Enter: Open/Copy | Backspace: Up (empty filter) | Esc: Quit"),
        Line::from("Arrows/Tab/Ctrl-n/Ctrl-p: Move | Ctrl-u: Clear filter | Ctrl-r: Reload"),
    ];
    let help_paragraph = Paragraph::new(help_text_lines_content)
        .block(Block::default().borders(Borders::ALL).title("pass search"));
    f.render_widget(help_paragraph, area);
}

fn draw_filter_input_block(f: &mut Frame, app: &TuiApp, area: Rect) {
    let filter_paragraph = Paragraph::new(app.query.as_str())
        .block(Block::default().borders(Borders::ALL).title("Filter"));
    f.render_widget(filter_paragraph, area);
    let cursor_x = area.x + 1 + app.query.chars().count() as u16;
    f.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
}

fn entry_label(name: &str, is_dir: bool, is_parent: bool) -> String {
    if is_parent {
        name.to_string()
    } else if is_dir {
        format!("{}/", name)
    } else {
        name.to_string()
    }
}

fn draw_main_list_block(f: &mut Frame, app: &mut TuiApp, area: Rect) {
    app.list_viewport_height = area.height.saturating_sub(2) as usize;
    app.ensure_selection_is_visible_in_viewport();

    let num_visible_items = app.visible.len();
    let end = (app.scroll_offset + app.list_viewport_height).min(num_visible_items);
    let list_items: Vec<ListItem> = app
        .visible
        .get(app.scroll_offset..end)
        .unwrap_or(&[])
        .iter()
        .map(|entry| {
            let label = entry_label(entry.name(), entry.is_dir(), entry.is_parent_marker());
            let style = if entry.is_dir() {
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(label).style(style)
        })
        .collect();

    let list_title = if app.query.is_empty() {
        format!("{} ({})", app.location_label(), num_visible_items)
    } else {
        format!(
            "{} ({} of {} match '{}')",
            app.location_label(),
            num_visible_items,
            app.navigator.list().len(),
            app.query
        )
    };

    let list_widget = List::new(list_items)
        .block(Block::default().borders(Borders::ALL).title(list_title))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("❯ ");

    let mut list_state_for_view = ratatui::widgets::ListState::default();
    if let Some(pos) = app.selected {
        if pos >= app.scroll_offset && pos < app.scroll_offset + app.list_viewport_height {
            list_state_for_view.select(Some(pos - app.scroll_offset));
        }
    }
    f.render_stateful_widget(list_widget, area, &mut list_state_for_view);
}

fn draw_status_line(f: &mut Frame, app: &TuiApp, area: Rect) {
    let text = app.status.as_ref().map(|s| s.text()).unwrap_or_default();
    let status = Paragraph::new(text).style(Style::default().fg(Color::Yellow));
    f.render_widget(status, area);
}

pub(super) fn ui_frame(frame: &mut Frame, app: &mut TuiApp) {
    let help_lines = 2;
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(help_lines + 2),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_help_block(frame, main_chunks[0]);
    draw_filter_input_block(frame, app, main_chunks[1]);
    draw_main_list_block(frame, app, main_chunks[2]);
    draw_status_line(frame, app, main_chunks[3]);
}
