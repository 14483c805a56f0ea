use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::executor::ExecutionState;

/// Commands available while navigating the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    Confirm,
    RemoveLast,
    Reset,
    EditFreeText,
    OpenFilePicker,
    Execute,
    GoBack,
    Copy,
    Quit,
}

pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Maps a key to an action. Once a command has been committed only the
/// run screen's keys apply.
pub fn action_for(key: &KeyEvent, execution: &ExecutionState) -> Option<Action> {
    if is_interrupt(key) {
        return Some(Action::Quit);
    }

    match execution {
        ExecutionState::NotStarted => {}
        ExecutionState::Running => {
            return match key.code {
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            };
        }
        ExecutionState::Finished(_) => {
            return match key.code {
                KeyCode::Char('b') => Some(Action::GoBack),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            };
        }
    }

    match key.code {
        KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Copy),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Backspace => Some(Action::RemoveLast),
        KeyCode::Char('_') => Some(Action::Reset),
        KeyCode::Char('r') => Some(Action::EditFreeText),
        KeyCode::Char(':') => Some(Action::OpenFilePicker),
        KeyCode::Char('+') => Some(Action::Execute),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}
