/// Keyboard handling: maps terminal key events onto player actions.
///
/// Input model: every movement key remembers the frame of its last
/// press/repeat event.  Terminals with keyboard enhancement (kitty protocol)
/// report `Release` and we stop at once.  Classic terminals only send
/// `Press` (OS key-repeat shows up as repeated presses), so a movement key
/// that has been silent for longer than the hold window counts as released.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::entities::{Direction, Player};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Stop,
    Jump,
    Shoot,
}

/// What the frame loop should do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub fn key_down_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Left => Some(Action::Move(Direction::Left)),
        KeyCode::Right => Some(Action::Move(Direction::Right)),
        KeyCode::Up => Some(Action::Jump),
        KeyCode::Char(' ') => Some(Action::Shoot),
        _ => None,
    }
}

pub fn key_up_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Left | KeyCode::Right => Some(Action::Stop),
        _ => None,
    }
}

pub fn apply(player: &mut Player, action: Action) {
    match action {
        Action::Move(direction) => player.move_towards(direction),
        Action::Stop => player.stop(),
        Action::Jump => player.jump(),
        Action::Shoot => player.shoot(),
    }
}

fn is_quit(event: &KeyEvent) -> bool {
    match event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => event.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn is_movement(code: &KeyCode) -> bool {
    matches!(code, KeyCode::Left | KeyCode::Right)
}

pub struct InputState {
    /// Maps each held movement key → the frame it was last seen.
    key_frame: HashMap<KeyCode, u64>,
    hold_window: u64,
}

impl InputState {
    pub fn new(hold_window: u64) -> Self {
        InputState { key_frame: HashMap::new(), hold_window }
    }

    pub fn is_held(&self, code: &KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(code)
            .map(|&last| frame.saturating_sub(last) <= self.hold_window)
            .unwrap_or(false)
    }

    pub fn handle_key(&mut self, event: &KeyEvent, frame: u64, player: &mut Player) -> Control {
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if event.kind == KeyEventKind::Press && is_quit(event) {
                    return Control::Quit;
                }
                if is_movement(&event.code) {
                    self.key_frame.insert(event.code, frame);
                }
                if let Some(action) = key_down_action(event.code) {
                    apply(player, action);
                }
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&event.code);
                if let Some(action) = key_up_action(event.code) {
                    apply(player, action);
                }
            }
        }
        Control::Continue
    }

    /// Release movement keys that went quiet.  Stops the player once no
    /// movement key is left.
    pub fn expire(&mut self, frame: u64, player: &mut Player) {
        let window = self.hold_window;
        let before = self.key_frame.len();
        self.key_frame
            .retain(|_, &mut last| frame.saturating_sub(last) <= window);

        if self.key_frame.len() < before && self.key_frame.is_empty() {
            player.stop();
        }
    }
}
