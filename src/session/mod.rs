//! Scripted pointer, key and options events replayed against a tool.

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::ToolBounds;
use crate::input::{Modifiers, PointerButton, ToolKey};
use crate::rectangle::{AspectPreset, OptionsChange, RectangleTool};
use crate::viewport::Viewport;

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read session script: {path}")]
    ReadSession { path: PathBuf, source: io::Error },
    #[error("failed to parse session script")]
    ParseSession(#[from] serde_json::Error),
}

/// Canvas-space event as recorded from the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Press {
        x: f64,
        y: f64,
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Motion {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Release {
        x: f64,
        y: f64,
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Hover {
        x: f64,
        y: f64,
    },
    Key {
        key: ToolKey,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Option {
        change: OptionsChange,
    },
    Preset {
        preset: AspectPreset,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub zoom_percent: Option<u16>,
    #[serde(default)]
    pub events: Vec<SessionEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub committed: Vec<ToolBounds>,
    pub cancelled: bool,
    /// Rectangle still on the canvas after the last event.
    pub remaining: Option<ToolBounds>,
}

impl ReplayOutcome {
    /// Last committed rectangle, falling back to the one left on the canvas.
    pub fn result(&self) -> Option<ToolBounds> {
        self.committed.last().copied().or(self.remaining)
    }
}

fn parse_session(contents: &str) -> SessionResult<Session> {
    Ok(serde_json::from_str(contents)?)
}

pub(crate) fn load_session(path: &Path) -> SessionResult<Session> {
    let contents = std::fs::read_to_string(path).map_err(|source| SessionError::ReadSession {
        path: path.to_path_buf(),
        source,
    })?;
    parse_session(&contents)
}

/// Feeds every event of `session` to `tool` in order.
///
/// The tool should already be connected to its options store so option
/// events reach the rectangle.
pub fn replay<V: Viewport + 'static>(
    session: &Session,
    tool: &Rc<RefCell<RectangleTool<V>>>,
) -> ReplayOutcome {
    let committed = Rc::new(RefCell::new(Vec::new()));
    let cancelled = Rc::new(RefCell::new(false));
    {
        let committed = Rc::clone(&committed);
        let cancelled = Rc::clone(&cancelled);
        let mut tool = tool.borrow_mut();
        tool.on_commit(move |bounds| committed.borrow_mut().push(bounds));
        tool.on_cancel(move || *cancelled.borrow_mut() = true);
    }

    for (index, event) in session.events.iter().enumerate() {
        tracing::trace!(index, ?event, "replaying session event");
        match *event {
            SessionEvent::Press {
                x,
                y,
                button,
                modifiers,
            } => tool.borrow_mut().button_press(x, y, button, modifiers),
            SessionEvent::Motion { x, y, modifiers } => tool.borrow_mut().motion(x, y, modifiers),
            SessionEvent::Release {
                x,
                y,
                button,
                modifiers,
            } => tool.borrow_mut().button_release(x, y, button, modifiers),
            SessionEvent::Hover { x, y } => {
                tool.borrow_mut().hover(x, y);
            }
            SessionEvent::Key { key, modifiers } => {
                if !tool.borrow_mut().key_press(key, modifiers) {
                    tracing::debug!(?key, "key not handled by rectangle tool");
                }
            }
            SessionEvent::Option { change } => {
                let options = Rc::clone(tool.borrow().options());
                options.set(change);
            }
            SessionEvent::Preset { preset } => {
                let (options, bounds) = {
                    let tool = tool.borrow();
                    (Rc::clone(tool.options()), tool.viewport().image_bounds())
                };
                options.apply_preset(
                    preset,
                    u32::try_from(bounds.width()).unwrap_or(0),
                    u32::try_from(bounds.height()).unwrap_or(0),
                );
            }
        }
    }

    let remaining = tool.borrow().current_rectangle();
    let committed = committed.borrow().clone();
    let cancelled = *cancelled.borrow();
    tracing::debug!(
        events = session.events.len(),
        commits = committed.len(),
        cancelled,
        "session replay finished"
    );
    ReplayOutcome {
        committed,
        cancelled,
        remaining,
    }
}
