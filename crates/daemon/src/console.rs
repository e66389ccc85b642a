// Console adapters standing in for the device's button/display hardware.
//
// Input: one line per keypress on stdin - `a` (previous/confirm), `b`
// (play/stop), `c` (next). Display: state transitions logged via tracing.

use std::sync::mpsc;
use std::thread;

use tracing::{info, warn};

use setlist_core::application::{RemoteController, UiState};
use setlist_core::domain::{Button, ButtonEdges, PlayState};
use setlist_core::port::InputPort;

/// Stdin-backed input adapter. A background thread reads lines and feeds a
/// channel; `poll_edges` drains it without blocking the control loop.
pub struct ConsoleInput {
    rx: mpsc::Receiver<Button>,
}

impl ConsoleInput {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            let mut line = String::new();
            loop {
                line.clear();
                match stdin.read_line(&mut line) {
                    Ok(0) => break, // EOF: no more input, buttons stay silent
                    Ok(_) => {
                        let button = match line.trim() {
                            "a" => Some(Button::Previous),
                            "b" => Some(Button::Play),
                            "c" => Some(Button::Next),
                            "" => None,
                            other => {
                                warn!(key = other, "unmapped key, use a/b/c");
                                None
                            }
                        };
                        if let Some(button) = button {
                            if tx.send(button).is_err() {
                                break;
                            }
                        }
                    }
                    Err(_) => break,
                }
            }
        });
        Self { rx }
    }
}

impl InputPort for ConsoleInput {
    fn poll_edges(&mut self) -> ButtonEdges {
        let mut edges = ButtonEdges::none();
        while let Ok(button) = self.rx.try_recv() {
            match button {
                Button::Previous => edges.previous = true,
                Button::Play => edges.play = true,
                Button::Next => edges.next = true,
            }
        }
        edges
    }
}

/// Logs the screen-worthy state whenever it changes, plus the periodic
/// status-icon line the device would redraw every 30 seconds.
pub struct StatusView {
    last: Option<(UiState, PlayState, u32, usize)>,
}

impl StatusView {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn render(&mut self, controller: &RemoteController) {
        let transport = controller.transport();
        let setlist = controller.setlist();
        let snapshot = (
            controller.ui_state(),
            transport.play_state,
            setlist.active_index,
            setlist.tabs.len(),
        );
        if self.last.as_ref() == Some(&snapshot) {
            return;
        }
        self.last = Some(snapshot);

        let active_tab = setlist
            .active_tab()
            .map(|tab| tab.name.as_str())
            .unwrap_or("-");
        info!(
            ui_state = %controller.ui_state(),
            play_state = %transport.play_state,
            position = format_args!("{:.1}s", transport.position_seconds),
            active_tab,
            tabs = setlist.tabs.len(),
            "display"
        );
    }

    pub fn refresh_status_icons(&self, controller: &RemoteController) {
        info!(
            connected = controller.is_connected(),
            session_state = ?controller.session_state(),
            dropped_results = controller.dropped_results(),
            "status bar"
        );
    }
}

impl Default for StatusView {
    fn default() -> Self {
        Self::new()
    }
}
