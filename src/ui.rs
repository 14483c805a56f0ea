use std::path::Path;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::draft::Expectation;
use crate::executor::{ExecutionOutcome, ExecutionState};
use crate::file_picker::FilePicker;
use crate::session::{InputMode, Session};
use crate::text_input::TextInput;

const NAVIGATION_HELP: &str =
    "↑↓ select  Space add  ⌫ remove last  r custom value  : file picker  _ reset  + run  ^Y copy  q quit";
const PICKER_HELP: &str = "↑↓ select  Enter/→ open  ← parent  Esc back";

pub fn ui(f: &mut Frame, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let command = Paragraph::new(command_line(session)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" tmacs | {} ", session.workdir().display())),
    );
    f.render_widget(command, chunks[0]);

    match session.execution() {
        ExecutionState::NotStarted => {}
        ExecutionState::Running => {
            render_running(f, chunks[1], session);
            render_help(f, chunks[2], "Running… q quit");
            return;
        }
        ExecutionState::Finished(outcome) => {
            render_finished(f, chunks[1], session, outcome);
            render_help(f, chunks[2], "b go back  q quit");
            return;
        }
    }

    match session.mode() {
        InputMode::Navigating => {
            render_choices(f, chunks[1], session);
            match session.status() {
                Some(status) => {
                    let status = Paragraph::new(status)
                        .style(Style::default().fg(Color::Yellow))
                        .block(Block::default().borders(Borders::ALL).title("Help"));
                    f.render_widget(status, chunks[2]);
                }
                None => render_help(f, chunks[2], NAVIGATION_HELP),
            }
        }
        InputMode::EditingFreeText(input) => {
            render_choices(f, chunks[1], session);
            render_text_input(f, chunks[2], input);
        }
        InputMode::PickingFile(picker) => {
            render_picker(f, chunks[1], picker);
            render_help(f, chunks[2], PICKER_HELP);
        }
    }
}

/// The draft with the binary and subcommand set apart from flags and values.
fn command_line(session: &Session) -> Line<'static> {
    let spans: Vec<Span> = session
        .draft()
        .tokens()
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let style = match i {
                0 => Style::default().fg(Color::Green).bold(),
                1 => Style::default().fg(Color::Cyan).bold(),
                _ if token.starts_with('-') => Style::default().fg(Color::Yellow),
                _ => Style::default(),
            };
            Span::styled(format!("{} ", token), style)
        })
        .collect();
    Line::from(spans)
}

fn render_help(f: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, area);
}

fn menu_title(session: &Session) -> String {
    match session.draft().expecting() {
        Expectation::Subcommand => "Subcommand".to_string(),
        Expectation::Flag { subcommand } => format!("Flags for {}", subcommand),
        Expectation::Value {
            subcommand,
            flag,
            pattern,
        } => format!("Value for {} {} ({})", subcommand, flag, pattern),
    }
}

/// Shows discovered paths relative to the working directory.
fn display_choice<'a>(choice: &'a str, workdir: &Path) -> std::borrow::Cow<'a, str> {
    match Path::new(choice).strip_prefix(workdir) {
        Ok(relative) => relative.to_string_lossy().into_owned().into(),
        Err(_) => choice.into(),
    }
}

fn empty_message(session: &Session) -> Line<'static> {
    let choices = session.choices();
    if let Some(diagnostic) = choices.diagnostic() {
        return Line::from(Span::styled(
            format!("No matching files: {}", diagnostic),
            Style::default().fg(Color::Red),
        ));
    }

    let text = match session.draft().expecting() {
        Expectation::Subcommand => "No subcommands available".to_string(),
        Expectation::Flag { subcommand } => format!(
            "No known flags for `{}`. Press r for a custom option or + to run.",
            subcommand
        ),
        Expectation::Value { pattern, .. } => format!(
            "No files matching {} under the working directory. Press r or : to supply one.",
            pattern
        ),
    };
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn render_choices(f: &mut Frame, area: Rect, session: &Session) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(menu_title(session));
    let choices = session.choices();

    if choices.is_empty() {
        let message = Paragraph::new(empty_message(session))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(message, area);
        return;
    }

    let items: Vec<ListItem> = choices
        .items()
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let is_selected = i == choices.cursor();
            let marker = if is_selected { "> " } else { "  " };
            let style = if is_selected {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(
                format!("{}{}", marker, display_choice(choice, session.workdir())),
                style,
            )))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(choices.cursor()));
    f.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn render_text_input(f: &mut Frame, area: Rect, input: &TextInput) {
    let line = if input.value().is_empty() {
        Line::from(vec![
            Span::styled("█", Style::default().fg(Color::Cyan)),
            Span::styled(" type a flag or value", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        let (before, after) = input.split_at_cursor();
        Line::from(vec![
            Span::raw(before.to_string()),
            Span::styled("█", Style::default().fg(Color::Cyan)),
            Span::raw(after.to_string()),
        ])
    };
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Enter value (Enter to confirm, Esc to cancel)"),
    );
    f.render_widget(paragraph, area);
}

fn render_picker(f: &mut Frame, area: Rect, picker: &FilePicker) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Pick a file: {}", picker.dir().display()));

    if let Some(error) = picker.error() {
        let message = Paragraph::new(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        ))
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(message, area);
        return;
    }

    let items: Vec<ListItem> = picker
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_selected = i == picker.cursor();
            let marker = if is_selected { "> " } else { "  " };
            let name = if entry.is_dir {
                format!("{}/", entry.name)
            } else {
                entry.name.clone()
            };
            let style = match (is_selected, entry.is_dir) {
                (true, _) => Style::default().fg(Color::Cyan).bold(),
                (false, true) => Style::default().fg(Color::Blue),
                (false, false) => Style::default(),
            };
            ListItem::new(Line::from(Span::styled(format!("{}{}", marker, name), style)))
        })
        .collect();

    let mut state = ListState::default();
    if !picker.entries().is_empty() {
        state.select(Some(picker.cursor()));
    }
    f.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn render_running(f: &mut Frame, area: Rect, session: &Session) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Running command:",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            session.draft().display(),
            Style::default().fg(Color::Green).bold(),
        )),
    ];
    let paragraph = Paragraph::new(content)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Run"));
    f.render_widget(paragraph, area);
}

fn render_finished(f: &mut Frame, area: Rect, session: &Session, outcome: &ExecutionOutcome) {
    let status_style = if outcome.success() {
        Style::default().fg(Color::Green).bold()
    } else {
        Style::default().fg(Color::Red).bold()
    };

    let mut content = vec![
        Line::from(Span::styled(
            session.draft().display(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(outcome.summary(), status_style)),
    ];
    if !outcome.output().is_empty() {
        content.push(Line::from(""));
        content.extend(outcome.output().iter().map(|l| Line::from(l.clone())));
    }

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Finished"));
    f.render_widget(paragraph, area);
}
