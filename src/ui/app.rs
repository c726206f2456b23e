use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::models::Department;

use super::forms::FormField;
use super::helpers::{bottom_right_rect, centered_rect, department_lines, truncate};
use super::state::{Action, Modal, Roster, ScreenState, TextInput, View};
use super::worker::Worker;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the search bar above the list.
const SEARCH_HEIGHT: u16 = 3;
/// Rows jumped by PageUp/PageDown.
const PAGE_STEP: isize = 5;

/// Screen controller: owns the screen state and the store worker, turns key
/// presses into actions, and forwards the resulting requests to the worker.
pub struct App {
    state: ScreenState,
    worker: Worker,
}

impl App {
    pub fn new(worker: Worker) -> Self {
        Self {
            state: ScreenState::new(),
            worker,
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Feed an action through the reducer and submit any request it issues.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        if let Some(request) = self.state.update(action) {
            self.worker.submit(request)?;
        }
        Ok(())
    }

    /// Apply every completion the worker has finished so far.
    pub fn poll_worker(&mut self) {
        while let Some(completion) = self.worker.try_completion() {
            self.state.update(Action::Completed(completion));
        }
    }

    /// Block until the outstanding request (if any) has been applied.
    pub fn settle(&mut self) -> Result<()> {
        while self.state.loading() {
            let completion = self.worker.wait_completion()?;
            self.state.update(Action::Completed(completion));
        }
        Ok(())
    }

    /// Handle one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        if let Some(action) = self.action_for_key(code, &mut exit) {
            self.dispatch(action)?;
        }
        Ok(exit)
    }

    /// Overlays take keys first, in the order they stack on screen.
    fn action_for_key(&self, code: KeyCode, exit: &mut bool) -> Option<Action> {
        let state = &self.state;

        if state.prompt().is_some() {
            return match code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Action::DismissPrompt),
                _ => None,
            };
        }

        if state.confirm_delete().is_some() {
            return match code {
                KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                    Some(Action::ConfirmDelete)
                }
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                    Some(Action::DeclineDelete)
                }
                _ => None,
            };
        }

        if state.modal_open() {
            return match code {
                KeyCode::Esc => Some(Action::Cancel),
                KeyCode::Enter => Some(Action::Save),
                KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
                KeyCode::BackTab | KeyCode::Up => Some(Action::PreviousField),
                KeyCode::Backspace => Some(Action::FormInput(TextInput::Backspace)),
                KeyCode::Char(ch) => Some(Action::FormInput(TextInput::Char(ch))),
                _ => None,
            };
        }

        if state.roster().is_some() {
            return match code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => Some(Action::CloseRoster),
                KeyCode::Char('q') => {
                    *exit = true;
                    None
                }
                _ => None,
            };
        }

        if state.search_focused() {
            return match code {
                KeyCode::Enter => Some(Action::SubmitSearch),
                KeyCode::Esc => Some(Action::ClearSearch),
                KeyCode::Backspace => Some(Action::SearchInput(TextInput::Backspace)),
                KeyCode::Char(ch) => Some(Action::SearchInput(TextInput::Char(ch))),
                _ => None,
            };
        }

        if let View::Error(_) = state.view() {
            return match code {
                KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Retry),
                KeyCode::Char('q') => {
                    *exit = true;
                    None
                }
                _ => None,
            };
        }

        match code {
            KeyCode::Char('q') => {
                *exit = true;
                None
            }
            KeyCode::Esc if !state.query().is_empty() => Some(Action::ClearSearch),
            KeyCode::Up => Some(Action::MoveSelection(-1)),
            KeyCode::Down => Some(Action::MoveSelection(1)),
            KeyCode::PageUp => Some(Action::MoveSelection(-PAGE_STEP)),
            KeyCode::PageDown => Some(Action::MoveSelection(PAGE_STEP)),
            KeyCode::Home => Some(Action::MoveSelection(isize::MIN)),
            KeyCode::End => Some(Action::MoveSelection(isize::MAX)),
            KeyCode::Char('f') | KeyCode::Char('/') => Some(Action::FocusSearch),
            KeyCode::Char('+') | KeyCode::Char('a') => Some(Action::OpenAdd),
            KeyCode::Char('e') | KeyCode::Char('E') => Some(Action::OpenEdit),
            KeyCode::Char('-') | KeyCode::Char('d') => Some(Action::RequestDelete),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Retry),
            KeyCode::Enter => Some(Action::OpenRoster),
            _ => None,
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match self.state.view() {
            View::Loading => self.draw_loading(frame, content_area),
            View::Error(message) => self.draw_error(frame, content_area, message),
            View::Content => self.draw_content(frame, content_area),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Some(roster) = self.state.roster() {
            self.draw_roster(frame, area, roster);
        }
        if let Some(modal) = self.state.modal() {
            self.draw_form(frame, area, modal);
        }
        if let Some(department) = self.state.confirm_delete() {
            self.draw_confirm_delete(frame, area, department);
        }
        if let Some(prompt) = self.state.prompt() {
            self.draw_prompt(frame, area, prompt);
        }
    }

    fn draw_loading(&self, frame: &mut Frame, area: Rect) {
        let message = Paragraph::new("Loading departments...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Departments"));
        frame.render_widget(message, area);
    }

    fn draw_error(&self, frame: &mut Frame, area: Rect, message: &str) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press r to try again.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Departments"));
        frame.render_widget(paragraph, area);
    }

    fn draw_content(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(SEARCH_HEIGHT), Constraint::Min(0)])
            .split(area);

        self.draw_search_bar(frame, chunks[0]);
        self.draw_list(frame, chunks[1]);
        self.draw_add_button(frame, chunks[1]);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let focused = self.state.search_focused();
        let query = self.state.query();

        let mut block = Block::default().borders(Borders::ALL).title("Search");
        if focused {
            block = block.style(Style::default().fg(Color::Yellow));
        }

        let text = if query.is_empty() && !focused {
            Span::styled(
                "Press f to search by name",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::raw(query.to_string())
        };

        let paragraph = Paragraph::new(text).block(block.clone());
        frame.render_widget(paragraph, area);

        if focused {
            let inner = block.inner(area);
            let cursor_x = inner.x + query.chars().count() as u16;
            frame.set_cursor_position((cursor_x.min(inner.right()), inner.y));
        }
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let departments = self.state.departments();
        let title = format!("Departments ({})", departments.len());
        let block = Block::default().borders(Borders::ALL).title(title);

        if departments.is_empty() {
            let text = if self.state.query().trim().is_empty() {
                "No departments yet. Press '+' to add one."
            } else {
                "No departments match the current search."
            };
            let message = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = departments
            .iter()
            .map(|department| ListItem::new(department_lines(department, width)))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("> ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.state.selected_index()));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_add_button(&self, frame: &mut Frame, area: Rect) {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let button_area = bottom_right_rect(9, 3, inner);
        if button_area.width < 5 || button_area.height < 3 {
            return;
        }
        frame.render_widget(Clear, button_area);
        let button = Paragraph::new(Span::styled(
            "+ Add",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(button, button_area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = match self.state.notice() {
            Some(notice) => Line::from(Span::styled(
                notice.to_string(),
                Style::default().fg(Color::Green),
            )),
            None => Line::from(""),
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = if self.state.prompt().is_some() {
            &[("[Enter]", " Dismiss")]
        } else if self.state.confirm_delete().is_some() {
            &[("[y]", " Delete   "), ("[n]", " Keep")]
        } else if self.state.modal_open() {
            &[
                ("[Tab]", " Next Field   "),
                ("[Space]", " Toggle Active   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ]
        } else if self.state.roster().is_some() {
            &[("[Esc]", " Close")]
        } else if self.state.search_focused() {
            &[("[Enter]", " Search   "), ("[Esc]", " Clear")]
        } else if matches!(self.state.view(), View::Error(_)) {
            &[("[r]", " Retry   "), ("[q]", " Quit")]
        } else {
            &[
                ("[↑↓]", " Select   "),
                ("[Enter]", " Students   "),
                ("[f]", " Search   "),
                ("[+]", " Add   "),
                ("[e]", " Edit   "),
                ("[-]", " Delete   "),
                ("[r]", " Reload   "),
                ("[q]", " Quit"),
            ]
        };

        let spans: Vec<Span<'static>> = keys
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, modal: &Modal) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let title = if modal.editing {
            "Edit Department"
        } else {
            "Add Department"
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let form = &modal.form;
        let mut lines: Vec<Line> = FormField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter to save • Tab to switch • Esc to cancel",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        let focused = form.focused();
        if focused != FormField::Active && self.state.prompt().is_none() {
            let row = FormField::ALL
                .iter()
                .position(|field| *field == focused)
                .unwrap_or_default() as u16;
            let prefix = format!("{}: ", focused.label()).len() as u16;
            let cursor_x = inner.x + prefix + form.value_len(focused) as u16;
            frame.set_cursor_position((cursor_x.min(inner.right()), inner.y + row));
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, department: &Department) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Delete Department")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete '{department}' permanently?")),
            Line::from("Student enrolments in this department are removed too."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_prompt(&self, frame: &mut Frame, area: Rect, prompt: &str) {
        let popup_area = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Check the form")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Red));
        let lines = vec![
            Line::from(prompt.to_string()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to continue editing.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_roster(&self, frame: &mut Frame, area: Rect, roster: &Roster) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let title = format!("Students • {}", roster.department);
        let block = Block::default().title(title).borders(Borders::ALL);

        if roster.students.is_empty() {
            let message = Paragraph::new("No students are enrolled in this department.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, popup_area);
            return;
        }

        let width = popup_area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = roster
            .students
            .iter()
            .map(|student| {
                let text = match student.email.as_deref() {
                    Some(email) if !email.trim().is_empty() => {
                        format!("{} <{}>", student.name, email.trim())
                    }
                    _ => student.name.clone(),
                };
                ListItem::new(truncate(&text, width))
            })
            .collect();
        frame.render_widget(List::new(items).block(block), popup_area);
    }
}
