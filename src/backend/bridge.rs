//! JSON-lines bridge between the headless backend and an external front end.
//!
//! Each stdin line is one [`BridgeCommand`]; each stdout line is one
//! [`HostNotice`]. A front end (or a script) can drive the whole host this way.

use super::headless::{HeadlessBackend, HostNotice};
use crate::app::{AppEvent, WindowEvent};
use crate::menu::MenuAction;
use crate::messages::InboundMessage;
use crate::traits::WindowId;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum BridgeCommand {
    /// A renderer message from `sender`
    Message {
        sender: WindowId,
        message: InboundMessage,
    },
    Menu {
        #[serde(default)]
        window: Option<WindowId>,
        #[serde(flatten)]
        action: MenuAction,
    },
    Focus {
        id: WindowId,
    },
    Move {
        id: WindowId,
        x: i32,
        y: i32,
    },
    Close {
        id: WindowId,
    },
    Activate,
    OpenFile {
        file: PathBuf,
    },
    DialogResponse {
        #[serde(default)]
        files: Vec<PathBuf>,
    },
    Quit,
}

/// Apply one command. Returns false once the loop should stop reading.
pub fn apply_command(
    command: BridgeCommand,
    backend: &HeadlessBackend,
    events: &mpsc::UnboundedSender<AppEvent>,
) -> bool {
    let event = match command {
        BridgeCommand::Message { sender, message } => AppEvent::Message { sender, message },
        BridgeCommand::Menu { window, action } => AppEvent::Menu { window, action },
        BridgeCommand::Focus { id } => AppEvent::Window {
            id,
            event: WindowEvent::Focused,
        },
        BridgeCommand::Move { id, x, y } => {
            backend.move_window(id, x, y);
            return true;
        }
        BridgeCommand::Close { id } => {
            backend.request_close(id);
            return true;
        }
        BridgeCommand::Activate => AppEvent::Activate,
        BridgeCommand::OpenFile { file } => AppEvent::OpenFile(file),
        BridgeCommand::DialogResponse { files } => {
            backend.answer_dialog(files);
            return true;
        }
        BridgeCommand::Quit => AppEvent::Quit,
    };
    let quit = event == AppEvent::Quit;
    events.send(event).is_ok() && !quit
}

/// Read commands from stdin until EOF or `quit`.
pub fn spawn_stdin_reader(
    backend: HeadlessBackend,
    events: mpsc::UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    log::error!("Failed to read command: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<BridgeCommand>(&line) {
                Ok(command) => {
                    if !apply_command(command, &backend, &events) {
                        return;
                    }
                }
                Err(e) => log::warn!("Ignoring malformed command {:?}: {}", line, e),
            }
        }
        log::info!("Command stream closed");
        let _ = events.send(AppEvent::Quit);
    })
}

/// Write host notices to stdout, one JSON object per line.
pub fn spawn_stdout_writer(mut notices: mpsc::UnboundedReceiver<HostNotice>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(notice) = notices.recv().await {
            let mut line = match serde_json::to_string(&notice) {
                Ok(line) => line,
                Err(e) => {
                    log::error!("Failed to encode notice: {}", e);
                    continue;
                }
            };
            line.push('\n');
            if let Err(e) = stdout.write_all(line.as_bytes()).await {
                log::error!("Failed to write notice: {}", e);
                break;
            }
            let _ = stdout.flush().await;
        }
    })
}
