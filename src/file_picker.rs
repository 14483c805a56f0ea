use std::fs;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};
use log::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// Still browsing.
    Browsing,
    Selected(PathBuf),
    Cancelled,
}

/// Browses one directory at a time. Directories sort before files and
/// dot-entries are hidden.
#[derive(Debug, Clone)]
pub struct FilePicker {
    dir: PathBuf,
    entries: Vec<PickerEntry>,
    cursor: usize,
    error: Option<String>,
}

impl FilePicker {
    pub fn new(start: &Path) -> Self {
        let mut picker = Self {
            dir: start.to_path_buf(),
            entries: Vec::new(),
            cursor: 0,
            error: None,
        };
        picker.change_dir(start.to_path_buf());
        picker
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[PickerEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn change_dir(&mut self, dir: PathBuf) {
        match read_entries(&dir) {
            Ok(entries) => {
                debug!("File picker opened {}", dir.display());
                self.dir = dir;
                self.entries = entries;
                self.cursor = 0;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
    }

    pub fn parent(&mut self) {
        if let Some(parent) = self.dir.parent() {
            self.change_dir(parent.to_path_buf());
        }
    }

    /// Opens the highlighted directory, or selects the highlighted file.
    pub fn open(&mut self) -> PickerEvent {
        let Some(entry) = self.entries.get(self.cursor).cloned() else {
            return PickerEvent::Browsing;
        };
        if entry.is_dir {
            self.change_dir(entry.path);
            PickerEvent::Browsing
        } else {
            PickerEvent::Selected(entry.path)
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerEvent {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => PickerEvent::Cancelled,
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_up();
                PickerEvent::Browsing
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_down();
                PickerEvent::Browsing
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.parent();
                PickerEvent::Browsing
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => self.open(),
            _ => PickerEvent::Browsing,
        }
    }
}

fn read_entries(dir: &Path) -> Result<Vec<PickerEntry>> {
    let read_dir = |source| Error::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir)? {
        let entry = entry.map_err(read_dir)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        entries.push(PickerEntry {
            name,
            is_dir: path.is_dir(),
            path,
        });
    }

    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
    Ok(entries)
}
