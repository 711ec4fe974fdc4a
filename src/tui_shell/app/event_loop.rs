use super::actions::editor_key;
use super::*;

pub(super) fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.pump();
        terminal
            .draw(|f| super::render::draw(f, app))
            .context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")?
            && let Event::Key(k) = event::read().context("read event")?
            && k.kind == KeyEventKind::Press
        {
            handle_key(app, k);
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        match key.code {
            KeyCode::Left => {
                app.controller.go_back();
                app.sync();
                return;
            }
            KeyCode::Right => {
                app.controller.go_forward();
                app.sync();
                return;
            }
            _ => {}
        }
    }

    match app.focus {
        Focus::Command => command_key(app, key),
        Focus::Editor => {
            if let Some(k) = editor_key(key) {
                app.editor(k);
            }
        }
        Focus::Browse => browse_key(app, key),
    }
}

fn command_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input.clear();
            app.focus = Focus::Browse;
        }
        KeyCode::Enter => app.run_current_input(),
        KeyCode::Tab => {
            if let Some(first) = suggestions(&app.input.buf).first() {
                app.input.set(format!("{} ", first.name));
            }
        }
        KeyCode::Backspace => {
            if app.input.buf.is_empty() {
                app.focus = Focus::Browse;
            } else {
                app.input.backspace();
            }
        }
        KeyCode::Delete => app.input.delete(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Up => app.input.history_up(),
        KeyCode::Down => app.input.history_down(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => app.input.clear(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.insert_char(c)
        }
        _ => {}
    }
}

fn browse_key(app: &mut App, key: KeyEvent) {
    if app.help_open && matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
        app.help_open = false;
        return;
    }
    match key.code {
        KeyCode::Char(':') => app.focus = Focus::Command,
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Up | KeyCode::Char('k') => {
            app.selected = app.selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.selected + 1 < app.row_count() {
                app.selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right => app.open_selected(),
        KeyCode::Backspace | KeyCode::Left => app.go_up(),
        KeyCode::Char('e') => app.enter_editor(),
        KeyCode::Char('r') => app.run_command(Command::Refresh),
        KeyCode::Char('h') => app.run_command(Command::ShowHidden),
        KeyCode::Char('l') => app.run_command(Command::Select(VersionToken::Latest)),
        KeyCode::Char('g') => app.run_command(Command::Select(VersionToken::Default)),
        KeyCode::Char('d') => {
            if let Some(v) = app.selected_version() {
                app.run_command(Command::MakeDefault(v));
            }
        }
        KeyCode::Char('x') => {
            if let Some(v) = app.selected_version() {
                app.run_command(Command::ToggleHidden(v));
            }
        }
        _ => {}
    }
}
