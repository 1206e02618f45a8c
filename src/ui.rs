use crate::app::{App, LoginField, Notice, Screen, TAB_TITLES};
use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
    Frame, Terminal,
};
use std::io;

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            match app.screen {
                Screen::Login => match key.code {
                    KeyCode::Esc => return Ok(()),
                    KeyCode::Tab | KeyCode::Up | KeyCode::Down => app.login.toggle_focus(),
                    KeyCode::Enter => app.submit_login(),
                    KeyCode::Backspace => {
                        app.login.focused_mut().pop();
                    }
                    KeyCode::Char(c) => app.login.focused_mut().push(c),
                    _ => {}
                },
                Screen::Dashboard if app.editing.is_some() => match key.code {
                    KeyCode::Enter => app.commit_edit(),
                    KeyCode::Esc => app.cancel_edit(),
                    KeyCode::Backspace => app.edit_backspace(),
                    KeyCode::Char(c) => app.edit_push(c),
                    _ => {}
                },
                Screen::Dashboard => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('l') => app.logout(),
                    KeyCode::Char('s') => app.save_records(),
                    KeyCode::Char('a') => app.add_row(),
                    KeyCode::Char('d') => app.delete_row(),
                    KeyCode::Char(' ') => app.cycle_cell(),
                    KeyCode::Tab => app.next_tab(),
                    KeyCode::BackTab => app.prev_tab(),
                    KeyCode::Enter => app.start_edit(),
                    KeyCode::Left => app.grid_mut().move_cursor(0, -1),
                    KeyCode::Right => app.grid_mut().move_cursor(0, 1),
                    KeyCode::Up => app.grid_mut().move_cursor(-1, 0),
                    KeyCode::Down => app.grid_mut().move_cursor(1, 0),
                    _ => {}
                },
            }
        }
    }
}

fn draw(f: &mut Frame, app: &App) {
    match app.screen {
        Screen::Login => draw_login(f, app),
        Screen::Dashboard => draw_dashboard(f, app),
    }
}

fn centered_rect(area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Percentage(30),
            Constraint::Length(12),
            Constraint::Percentage(30),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(vertical[1])[1]
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        })
}

fn draw_login(f: &mut Frame, app: &App) {
    let area = centered_rect(f.area());
    let outer = Block::default()
        .title("🔐 MPSI Tracker — Authentification")
        .borders(Borders::ALL);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let username = Paragraph::new(app.login.username.as_str()).block(field_block(
        "Identifiant",
        app.login.focus == LoginField::Username,
    ));
    f.render_widget(username, chunks[0]);

    let masked = "*".repeat(app.login.password.chars().count());
    let password = Paragraph::new(masked).block(field_block(
        "Mot de passe",
        app.login.focus == LoginField::Password,
    ));
    f.render_widget(password, chunks[1]);

    f.render_widget(notice_line(app), chunks[2]);

    let hint = Paragraph::new("Entrée : se connecter / créer le compte · Échap : quitter")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[3]);
}

fn draw_dashboard(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(f.area());

    let username = app
        .session
        .as_ref()
        .map(|s| s.username.as_str())
        .unwrap_or("?");
    let mut title = format!("🚀 Tableau de bord MPSI — {username}");
    if app.dirty {
        title.push_str(" · modifications non sauvegardées");
    }
    let tabs = Tabs::new(TAB_TITLES.to_vec())
        .block(Block::default().title(title).borders(Borders::ALL))
        .select(app.tab)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);

    draw_grid(f, app, chunks[1]);
    draw_footer(f, app, chunks[2]);
}

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let grid = app.grid();
    let header = Row::new(
        grid.columns
            .iter()
            .map(|c| Cell::from(*c).style(Style::default().add_modifier(Modifier::BOLD))),
    );

    let cursor_style = Style::default()
        .bg(Color::Cyan)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);
    let rows = grid.rows.iter().enumerate().map(|(r, cells)| {
        Row::new(cells.iter().enumerate().map(|(c, text)| {
            let under_cursor = r == grid.row && c == grid.col;
            match (&app.editing, under_cursor) {
                (Some(buffer), true) => Cell::from(format!("{buffer}▏")).style(cursor_style),
                (None, true) => Cell::from(text.as_str()).style(cursor_style),
                _ => Cell::from(text.as_str()),
            }
        }))
    });

    let widths = vec![Constraint::Ratio(1, grid.columns.len() as u32); grid.columns.len()];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(table, area);
}

fn notice_line(app: &App) -> Paragraph<'_> {
    let line = match &app.notice {
        Some(Notice::Info(msg)) => {
            Line::from(Span::styled(msg.as_str(), Style::default().fg(Color::Green)))
        }
        Some(Notice::Warning(msg)) => Line::from(Span::styled(
            msg.as_str(),
            Style::default().fg(Color::Yellow),
        )),
        Some(Notice::Error(msg)) => {
            Line::from(Span::styled(msg.as_str(), Style::default().fg(Color::Red)))
        }
        None => Line::from(""),
    };
    Paragraph::new(line)
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let help = if app.editing.is_some() {
        "Entrée : valider la cellule · Échap : annuler"
    } else {
        "←↑↓→ déplacer · Tab onglet · Entrée éditer · Espace choix · a ajouter · d supprimer · s sauvegarder · l déconnexion · q quitter"
    };
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1), Constraint::Length(1)])
        .split(inner);
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        lines[0],
    );
    f.render_widget(notice_line(app), lines[1]);
}
