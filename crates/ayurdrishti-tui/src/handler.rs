use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ayurdrishti_core::FlowKind;

use crate::app::{App, InputMode};
use crate::input;
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key).await?,
        AppEvent::Paste(text) => handle_paste(app, &text).await,
        AppEvent::Resize(_, _) | AppEvent::Wake => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
    }
    app.poll_tasks();
    Ok(())
}

async fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    // A notice blocks everything until dismissed
    if app.notice.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
        return Ok(());
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key).await,
    }

    Ok(())
}

async fn handle_paste(app: &mut App, text: &str) {
    if app.notice.is_some() {
        return;
    }
    match app.screen() {
        FlowKind::Identify => app.paste_image_path(text).await,
        FlowKind::Ayurveda => app.paste_into_chat(text),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Flow selector
        KeyCode::Char('1') => app.switch_flow(FlowKind::Identify),
        KeyCode::Char('2') => app.switch_flow(FlowKind::Ayurveda),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_flow(),

        KeyCode::Char('r') => app.check_backend(),

        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('g') => app.result_scroll = 0,

        _ => match app.screen() {
            FlowKind::Identify => handle_identify_normal(app, key),
            FlowKind::Ayurveda => handle_chat_normal(app, key),
        },
    }
}

fn handle_identify_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('o') | KeyCode::Char('/') => {
            app.path_cursor = app.path_input.chars().count();
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('l') | KeyCode::Right => app.cycle_organ(true),
        KeyCode::Char('h') | KeyCode::Left => app.cycle_organ(false),
        KeyCode::Char('D') => app.save_default_organ(),
        KeyCode::Char('s') | KeyCode::Enter => app.submit_identify(),
        _ => {}
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Char('e') => {
            app.chat_cursor = app.shell.chat.message().chars().count();
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Enter | KeyCode::Char('s') => app.submit_chat(),
        _ => {}
    }
}

async fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match app.screen() {
        FlowKind::Identify => handle_path_editing(app, key).await,
        FlowKind::Ayurveda => handle_chat_editing(app, key),
    }
}

async fn handle_path_editing(app: &mut App, key: KeyEvent) {
    let (text, cursor) = (&mut app.path_input, &mut app.path_cursor);
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.load_image().await;
        }
        KeyCode::Backspace => input::backspace(text, cursor),
        KeyCode::Delete => input::delete(text, cursor),
        KeyCode::Left => input::move_left(cursor),
        KeyCode::Right => input::move_right(text, cursor),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => input::move_end(text, cursor),
        KeyCode::Char(c) => input::insert_char(text, cursor, c),
        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    let cursor = &mut app.chat_cursor;
    let text = app.shell.chat.message_mut();
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            input::insert_char(text, cursor, '\n');
        }
        KeyCode::Enter => app.submit_chat(),
        KeyCode::Backspace => input::backspace(text, cursor),
        KeyCode::Delete => input::delete(text, cursor),
        KeyCode::Left => input::move_left(cursor),
        KeyCode::Right => input::move_right(text, cursor),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => input::move_end(text, cursor),
        KeyCode::Char(c) => input::insert_char(text, cursor, c),
        _ => {}
    }
}
