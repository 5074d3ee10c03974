//! Dashboard state owned by the draw loop: the view-state controller plus
//! key handling, polling and the last-updated stamp.

use crate::ui::TopBarState;
use chrono::{DateTime, Local};
use crossterm::event::KeyCode;
use ghostmarket::ViewStateController;
use std::time::{Duration, Instant};
use tracing::debug;

/// User intent decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Refresh,
    /// Select the ticker at this index in the ticker list
    Select(usize),
    NextTicker,
}

impl Command {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Refresh),
            KeyCode::Tab => Some(Command::NextTicker),
            KeyCode::Char(digit @ '1'..='9') => Some(Command::Select(digit as usize - '1' as usize)),
            _ => None,
        }
    }
}

pub struct App {
    pub controller: ViewStateController,
    pub last_updated: Option<DateTime<Local>>,
    poll_interval: Option<Duration>,
    last_poll: Instant,
}

impl App {
    pub fn new(controller: ViewStateController, poll_interval: Option<Duration>) -> Self {
        Self {
            controller,
            last_updated: None,
            poll_interval,
            last_poll: Instant::now(),
        }
    }

    /// Act on a command. Returns `false` once the dashboard should exit.
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::Refresh => {
                self.controller.refresh();
                self.last_poll = Instant::now();
            }
            Command::Select(index) => {
                let Some(ticker) = self.controller.tickers().get(index).copied() else {
                    debug!(index, "no ticker at index");
                    return true;
                };
                if ticker.key != self.controller.selected_key() {
                    self.controller.set_ticker(ticker.key);
                    self.last_poll = Instant::now();
                }
            }
            Command::NextTicker => {
                let next = self.controller.selected_ticker().next();
                self.controller.set_ticker(next.key);
                self.last_poll = Instant::now();
            }
        }
        true
    }

    /// Issue a refresh when the poll interval has elapsed.
    pub fn on_tick(&mut self) {
        if let Some(interval) = self.poll_interval {
            if self.last_poll.elapsed() >= interval {
                self.controller.refresh();
                self.last_poll = Instant::now();
            }
        }
    }

    /// Apply completed fetches. Returns whether the view model changed.
    pub fn apply_updates(&mut self) -> bool {
        let replaced = self.controller.drain_updates() > 0;
        if replaced {
            self.last_updated = Some(Local::now());
        }
        replaced
    }

    pub fn top_bar(&self) -> TopBarState {
        TopBarState {
            shown: self.controller.view().ticker,
            selected: self.controller.selected_ticker(),
            last_updated: self.last_updated,
            poll_interval: self.poll_interval,
        }
    }
}
