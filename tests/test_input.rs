use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use platformer::config::{BulletConfig, PlayerConfig};
use platformer::entities::{Direction, Player};
use platformer::input::*;

fn make_player() -> Player {
    Player::new(100.0, 100.0, &PlayerConfig::default(), &BulletConfig::default(), 32)
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
}

fn repeat(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Repeat)
}

fn release(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
}

// ── Key mapping ───────────────────────────────────────────────────────────────

#[test]
fn key_down_mapping() {
    assert_eq!(key_down_action(KeyCode::Left), Some(Action::Move(Direction::Left)));
    assert_eq!(key_down_action(KeyCode::Right), Some(Action::Move(Direction::Right)));
    assert_eq!(key_down_action(KeyCode::Up), Some(Action::Jump));
    assert_eq!(key_down_action(KeyCode::Char(' ')), Some(Action::Shoot));
    assert_eq!(key_down_action(KeyCode::Down), None);
    assert_eq!(key_down_action(KeyCode::Char('a')), None);
}

#[test]
fn key_up_mapping() {
    assert_eq!(key_up_action(KeyCode::Left), Some(Action::Stop));
    assert_eq!(key_up_action(KeyCode::Right), Some(Action::Stop));
    assert_eq!(key_up_action(KeyCode::Up), None);
    assert_eq!(key_up_action(KeyCode::Char(' ')), None);
}

// ── Event handling ────────────────────────────────────────────────────────────

#[test]
fn press_and_release_move_then_stop() {
    let mut input = InputState::new(4);
    let mut p = make_player();

    input.handle_key(&press(KeyCode::Left), 1, &mut p);
    assert_eq!(p.move_direction, -1);

    input.handle_key(&release(KeyCode::Left), 2, &mut p);
    assert_eq!(p.move_direction, 0);
}

#[test]
fn space_shoots_and_up_jumps() {
    let mut input = InputState::new(4);
    let mut p = make_player();
    p.is_on_ground = true;

    input.handle_key(&press(KeyCode::Char(' ')), 1, &mut p);
    input.handle_key(&press(KeyCode::Up), 1, &mut p);

    assert_eq!(p.bullets.len(), 1);
    assert_eq!(p.dy, -15.0);
    assert!(!p.is_on_ground);
}

#[test]
fn quit_keys() {
    let mut input = InputState::new(4);
    let mut p = make_player();
    assert_eq!(input.handle_key(&press(KeyCode::Char('q')), 1, &mut p), Control::Quit);
    assert_eq!(input.handle_key(&press(KeyCode::Esc), 1, &mut p), Control::Quit);

    let ctrl_c = KeyEvent::new_with_kind(
        KeyCode::Char('c'),
        KeyModifiers::CONTROL,
        KeyEventKind::Press,
    );
    assert_eq!(input.handle_key(&ctrl_c, 1, &mut p), Control::Quit);
    assert_eq!(input.handle_key(&press(KeyCode::Char('c')), 1, &mut p), Control::Continue);
}

// ── Hold window ───────────────────────────────────────────────────────────────

#[test]
fn silent_key_expires_after_hold_window() {
    let mut input = InputState::new(4);
    let mut p = make_player();
    input.handle_key(&press(KeyCode::Right), 1, &mut p);

    input.expire(5, &mut p);
    assert_eq!(p.move_direction, 1);
    assert!(input.is_held(&KeyCode::Right, 5));

    input.expire(6, &mut p);
    assert_eq!(p.move_direction, 0);
    assert!(!input.is_held(&KeyCode::Right, 6));
}

#[test]
fn repeat_keeps_key_alive() {
    let mut input = InputState::new(4);
    let mut p = make_player();
    input.handle_key(&press(KeyCode::Right), 1, &mut p);
    input.handle_key(&repeat(KeyCode::Right), 5, &mut p);

    input.expire(8, &mut p);
    assert_eq!(p.move_direction, 1);
}

#[test]
fn expiry_waits_for_last_movement_key() {
    let mut input = InputState::new(4);
    let mut p = make_player();
    input.handle_key(&press(KeyCode::Left), 1, &mut p);
    input.handle_key(&press(KeyCode::Right), 4, &mut p);

    // Left goes stale but Right is still fresh
    input.expire(6, &mut p);
    assert_eq!(p.move_direction, 1);

    input.expire(9, &mut p);
    assert_eq!(p.move_direction, 0);
}
