use std::path::Path;

use log::warn;

use crate::catalog::{options_for, SUBCOMMANDS};
use crate::discovery::find_files;
use crate::draft::{CommandDraft, Expectation};

/// Menu entries offered for the current draft, plus the cursor into them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceSet {
    items: Vec<String>,
    cursor: usize,
    /// Set when discovery failed; never selectable.
    diagnostic: Option<String>,
}

impl ChoiceSet {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            cursor: 0,
            diagnostic: None,
        }
    }

    fn failed(diagnostic: String) -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            diagnostic: Some(diagnostic),
        }
    }

    /// Derives the menu for `draft`. Value menus list files under `workdir`.
    pub fn derive(draft: &CommandDraft, workdir: &Path) -> Self {
        match draft.expecting() {
            Expectation::Subcommand => Self::new(to_strings(SUBCOMMANDS)),
            Expectation::Flag { subcommand } => Self::new(to_strings(options_for(subcommand))),
            Expectation::Value { pattern, .. } => match find_files(workdir, pattern) {
                Ok(paths) => Self::new(
                    paths
                        .into_iter()
                        .map(|p| p.to_string_lossy().into_owned())
                        .collect(),
                ),
                Err(e) => {
                    warn!("{}", e);
                    Self::failed(e.to_string())
                }
            },
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.items.get(self.cursor).map(String::as_str)
    }

    /// Moves up, wrapping from the first entry to the last.
    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        } else {
            self.cursor = self.items.len().saturating_sub(1);
        }
    }

    /// Moves down, stopping at the last entry.
    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
