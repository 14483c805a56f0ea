use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};
use log::debug;

use crate::choices::ChoiceSet;
use crate::draft::CommandDraft;
use crate::executor::{ExecutionState, Executor};
use crate::file_picker::{FilePicker, PickerEvent};
use crate::keymap::{action_for, is_interrupt, Action};
use crate::text_input::TextInput;

/// Which handler receives key events. Each non-navigating mode owns its widget.
#[derive(Debug, Clone)]
pub enum InputMode {
    Navigating,
    EditingFreeText(TextInput),
    PickingFile(FilePicker),
}

/// Side effects the event loop has to carry out for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    Copy(String),
}

pub struct Session {
    binary: String,
    workdir: PathBuf,
    draft: CommandDraft,
    choices: ChoiceSet,
    mode: InputMode,
    execution: ExecutionState,
    executor: Executor,
    picker_dir: PathBuf,
    status: Option<String>,
}

impl Session {
    pub fn new(binary: &str, workdir: &Path, picker_dir: &Path) -> Self {
        let draft = CommandDraft::new(binary);
        let choices = ChoiceSet::derive(&draft, workdir);
        Self {
            binary: binary.to_string(),
            workdir: workdir.to_path_buf(),
            draft,
            choices,
            mode: InputMode::Navigating,
            execution: ExecutionState::NotStarted,
            executor: Executor::new(workdir),
            picker_dir: picker_dir.to_path_buf(),
            status: None,
        }
    }

    pub fn draft(&self) -> &CommandDraft {
        &self.draft
    }

    pub fn choices(&self) -> &ChoiceSet {
        &self.choices
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn execution(&self) -> &ExecutionState {
        &self.execution
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn is_running(&self) -> bool {
        self.execution == ExecutionState::Running
    }

    fn refresh_choices(&mut self) {
        self.choices = ChoiceSet::derive(&self.draft, &self.workdir);
        debug!(
            "Draft `{}` offers {} choice(s)",
            self.draft.display(),
            self.choices.len()
        );
    }

    fn push_token(&mut self, token: String) {
        self.draft.push(token);
        self.refresh_choices();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Effect {
        self.status = None;

        if is_interrupt(&key) {
            return Effect::Quit;
        }

        match &mut self.mode {
            InputMode::Navigating => match action_for(&key, &self.execution) {
                Some(action) => self.apply(action),
                None => Effect::None,
            },
            InputMode::EditingFreeText(input) => {
                match key.code {
                    KeyCode::Enter => {
                        let value = input.take();
                        self.mode = InputMode::Navigating;
                        if !value.is_empty() {
                            self.push_token(value);
                        }
                    }
                    KeyCode::Esc => self.mode = InputMode::Navigating,
                    _ => input.handle_key(key),
                }
                Effect::None
            }
            InputMode::PickingFile(picker) => {
                match picker.handle_key(key) {
                    PickerEvent::Browsing => {}
                    PickerEvent::Selected(path) => {
                        self.picker_dir = picker.dir().to_path_buf();
                        self.mode = InputMode::Navigating;
                        self.push_token(path.to_string_lossy().into_owned());
                    }
                    PickerEvent::Cancelled => {
                        self.picker_dir = picker.dir().to_path_buf();
                        self.mode = InputMode::Navigating;
                    }
                }
                Effect::None
            }
        }
    }

    /// Applies a navigation action. Only valid in `InputMode::Navigating`.
    pub fn apply(&mut self, action: Action) -> Effect {
        match action {
            Action::MoveUp => self.choices.move_up(),
            Action::MoveDown => self.choices.move_down(),
            Action::Confirm => {
                if let Some(choice) = self.choices.selected().map(str::to_string) {
                    self.push_token(choice);
                }
            }
            Action::RemoveLast => {
                self.draft.pop();
                self.refresh_choices();
            }
            Action::Reset => {
                self.draft.reset();
                self.refresh_choices();
            }
            Action::EditFreeText => {
                if self.draft.is_runnable() {
                    self.mode = InputMode::EditingFreeText(TextInput::default());
                } else {
                    self.set_status("Choose a subcommand before entering a custom value");
                }
            }
            Action::OpenFilePicker => {
                self.mode = InputMode::PickingFile(FilePicker::new(&self.picker_dir));
            }
            Action::Execute => self.execute(),
            Action::GoBack => {
                if matches!(self.execution, ExecutionState::Finished(_)) {
                    self.restart();
                }
            }
            Action::Copy => return Effect::Copy(self.draft.display()),
            Action::Quit => return Effect::Quit,
        }
        Effect::None
    }

    fn execute(&mut self) {
        if !self.draft.is_runnable() {
            self.set_status("Choose a subcommand before running");
            return;
        }
        if self.execution != ExecutionState::NotStarted || self.executor.is_running() {
            return;
        }
        if self.executor.spawn(&self.draft) {
            self.execution = ExecutionState::Running;
        }
    }

    /// Picks up the outcome of a finished run. Called by the event loop between events.
    pub fn tick(&mut self) {
        if let Some(outcome) = self.executor.poll() {
            self.execution = ExecutionState::Finished(outcome);
        }
    }

    fn restart(&mut self) {
        self.draft = CommandDraft::new(self.binary.as_str());
        self.mode = InputMode::Navigating;
        self.execution = ExecutionState::NotStarted;
        self.refresh_choices();
    }

    #[cfg(test)]
    fn wait_for_execution(&mut self) {
        if let Some(outcome) = self.executor.wait() {
            self.execution = ExecutionState::Finished(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SUBCOMMANDS;
    use crossterm::event::KeyModifiers;
    use std::fs;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(session: &mut Session, codes: &[KeyCode]) {
        for code in codes {
            session.handle_key(key(*code));
        }
    }

    fn type_text(session: &mut Session, text: &str) {
        for c in text.chars() {
            session.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn session_in(tmp: &TempDir) -> Session {
        Session::new("gmx", tmp.path(), tmp.path())
    }

    fn tokens(session: &Session) -> Vec<&str> {
        session.draft().tokens().iter().map(String::as_str).collect()
    }

    fn select(session: &mut Session, choice: &str) {
        let index = session
            .choices()
            .items()
            .iter()
            .position(|c| c == choice)
            .unwrap_or_else(|| panic!("{} not offered", choice));
        while session.choices().cursor() != index {
            session.apply(Action::MoveDown);
        }
        session.apply(Action::Confirm);
    }

    #[test]
    fn test_new_session_is_idle() {
        let tmp = TempDir::new().unwrap();
        let session = session_in(&tmp);
        assert_eq!(session.execution(), &ExecutionState::NotStarted);
        assert!(!session.is_running());
        assert!(matches!(session.mode(), InputMode::Navigating));
        assert_eq!(tokens(&session), vec!["gmx"]);
    }

    #[test]
    fn test_confirm_subcommand_offers_flags() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_in(&tmp);
        select(&mut session, "grompp");

        assert_eq!(tokens(&session), vec!["gmx", "grompp"]);
        assert_eq!(
            session.choices().items(),
            &["-f", "-c", "-r", "-p", "-n", "-maxwarn"]
        );
        assert_eq!(session.choices().cursor(), 0);
    }

    #[test]
    fn test_confirm_file_flag_lists_matching_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.mdp"), "").unwrap();
        fs::write(tmp.path().join("b.mdp"), "").unwrap();
        fs::write(tmp.path().join("conf.gro"), "").unwrap();

        let mut session = session_in(&tmp);
        select(&mut session, "grompp");
        select(&mut session, "-f");

        assert_eq!(tokens(&session), vec!["gmx", "grompp", "-f"]);
        let a = tmp.path().join("a.mdp").to_string_lossy().into_owned();
        let b = tmp.path().join("b.mdp").to_string_lossy().into_owned();
        assert_eq!(session.choices().items(), &[a.clone(), b]);

        select(&mut session, &a);
        assert_eq!(session.draft().last(), a);
        assert_eq!(session.choices().items()[0], "-f");
    }

    #[test]
    fn test_confirm_on_empty_menu_is_noop() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_in(&tmp);
        select(&mut session, "solvate");
        assert!(session.choices().is_empty());

        session.apply(Action::Confirm);
        assert_eq!(tokens(&session), vec!["gmx", "solvate"]);
    }

    #[test]
    fn test_remove_last() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_in(&tmp);

        session.apply(Action::RemoveLast);
        assert_eq!(tokens(&session), vec!["gmx"]);

        select(&mut session, "mdrun");
        session.apply(Action::MoveDown);
        session.apply(Action::Confirm);
        assert_eq!(tokens(&session), vec!["gmx", "mdrun", "-o"]);

        session.apply(Action::MoveDown);
        session.apply(Action::RemoveLast);
        assert_eq!(tokens(&session), vec!["gmx", "mdrun"]);
        assert_eq!(session.choices().cursor(), 0);
        assert_eq!(session.choices().items()[0], "-deffnm");
    }

    #[test]
    fn test_reset_from_any_state() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_in(&tmp);
        select(&mut session, "grompp");
        select(&mut session, "-maxwarn");
        session.apply(Action::MoveUp);

        session.apply(Action::Reset);
        assert_eq!(tokens(&session), vec!["gmx"]);
        assert_eq!(session.choices().len(), SUBCOMMANDS.len());
        assert_eq!(session.choices().cursor(), 0);
    }

    #[test]
    fn test_cursor_wraps_up_clamps_down() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_in(&tmp);
        press(&mut session, &[KeyCode::Up]);
        assert_eq!(session.choices().cursor(), SUBCOMMANDS.len() - 1);
        press(&mut session, &[KeyCode::Down, KeyCode::Char('j')]);
        assert_eq!(session.choices().cursor(), SUBCOMMANDS.len() - 1);
    }

    #[test]
    fn test_free_text_requires_subcommand() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_in(&tmp);
        press(&mut session, &[KeyCode::Char('r')]);
        assert!(matches!(session.mode(), InputMode::Navigating));
        assert!(session.status().is_some());
    }

    #[test]
    fn test_free_text_confirm_appends_value() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_in(&tmp);
        select(&mut session, "grompp");
        select(&mut session, "-maxwarn");

        press(&mut session, &[KeyCode::Char('r')]);
        assert!(matches!(session.mode(), InputMode::EditingFreeText(_)));

        // Navigation keys are plain text while editing.
        type_text(&mut session, "2j");
        press(&mut session, &[KeyCode::Backspace, KeyCode::Enter]);

        assert!(matches!(session.mode(), InputMode::Navigating));
        assert_eq!(tokens(&session), vec!["gmx", "grompp", "-maxwarn", "2"]);
        assert_eq!(session.choices().items()[0], "-f");
    }

    #[test]
    fn test_free_text_cancel_leaves_draft() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_in(&tmp);
        select(&mut session, "grompp");

        press(&mut session, &[KeyCode::Char('r')]);
        type_text(&mut session, "-nice");
        press(&mut session, &[KeyCode::Esc]);
        assert!(matches!(session.mode(), InputMode::Navigating));
        assert_eq!(tokens(&session), vec!["gmx", "grompp"]);

        // Reopening starts from an empty buffer.
        press(&mut session, &[KeyCode::Char('r'), KeyCode::Enter]);
        assert_eq!(tokens(&session), vec!["gmx", "grompp"]);
    }

    #[test]
    fn test_file_picker_selection_appends_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("index.ndx"), "").unwrap();
        let mut session = session_in(&tmp);
        select(&mut session, "grompp");
        select(&mut session, "-n");

        press(&mut session, &[KeyCode::Char(':')]);
        assert!(matches!(session.mode(), InputMode::PickingFile(_)));
        press(&mut session, &[KeyCode::Enter]);

        assert!(matches!(session.mode(), InputMode::Navigating));
        let path = tmp.path().join("index.ndx").to_string_lossy().into_owned();
        assert_eq!(session.draft().last(), path);
    }

    #[test]
    fn test_file_picker_cancel_leaves_draft() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_in(&tmp);

        // Allowed before a subcommand is chosen.
        press(&mut session, &[KeyCode::Char(':')]);
        assert!(matches!(session.mode(), InputMode::PickingFile(_)));
        press(&mut session, &[KeyCode::Backspace]);
        assert!(matches!(session.mode(), InputMode::Navigating));
        assert_eq!(tokens(&session), vec!["gmx"]);
    }

    #[test]
    fn test_execute_needs_subcommand() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_in(&tmp);
        session.apply(Action::Execute);
        assert_eq!(session.execution(), &ExecutionState::NotStarted);
        assert!(session.status().is_some());
    }

    #[test]
    fn test_ctrl_c_quits_in_every_mode() {
        let tmp = TempDir::new().unwrap();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let mut session = session_in(&tmp);
        assert_eq!(session.handle_key(ctrl_c), Effect::Quit);

        select(&mut session, "grompp");
        press(&mut session, &[KeyCode::Char('r')]);
        assert_eq!(session.handle_key(ctrl_c), Effect::Quit);
    }

    #[test]
    fn test_copy_effect() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_in(&tmp);
        select(&mut session, "mdrun");
        let ctrl_y = KeyEvent::new(KeyCode::Char('y'), KeyModifiers::CONTROL);
        assert_eq!(
            session.handle_key(ctrl_y),
            Effect::Copy("gmx mdrun".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_reports_outcome_and_go_back_resets() {
        use crate::executor::ExecutionOutcome;

        let tmp = TempDir::new().unwrap();
        let mut session = Session::new("true", tmp.path(), tmp.path());
        select(&mut session, "grompp");
        select(&mut session, "-maxwarn");

        press(&mut session, &[KeyCode::Char('+')]);
        assert!(session.is_running());
        // A second commit while running is ignored.
        press(&mut session, &[KeyCode::Char('+'), KeyCode::Char('b')]);
        assert!(session.is_running());

        session.wait_for_execution();
        assert_eq!(
            session.execution(),
            &ExecutionState::Finished(ExecutionOutcome::Succeeded { output: vec![] })
        );

        press(&mut session, &[KeyCode::Char('b')]);
        assert_eq!(session.execution(), &ExecutionState::NotStarted);
        assert_eq!(tokens(&session), vec!["true"]);
        assert_eq!(session.choices().len(), SUBCOMMANDS.len());
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_failure() {
        let tmp = TempDir::new().unwrap();
        let mut session = Session::new("false", tmp.path(), tmp.path());
        select(&mut session, "mdrun");
        session.apply(Action::Execute);
        session.wait_for_execution();
        match session.execution() {
            ExecutionState::Finished(outcome) => assert!(!outcome.success()),
            other => panic!("expected finished, got {:?}", other),
        }
    }
}
