#[cfg(feature = "gtk")]
pub mod gtk_bridge;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Self = Self::new(false, false);

    pub const fn new(shift: bool, ctrl: bool) -> Self {
        Self { shift, ctrl }
    }

    pub const fn shift() -> Self {
        Self::new(true, false)
    }

    pub const fn ctrl() -> Self {
        Self::new(false, true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    /// Maps toolkit button numbers (1 = left, 2 = middle, 3 = right).
    pub const fn from_number(button: u32) -> Option<Self> {
        match button {
            1 => Some(Self::Primary),
            2 => Some(Self::Middle),
            3 => Some(Self::Secondary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
}

impl ToolKey {
    /// Unit step of an arrow key, `None` for non-directional keys.
    pub const fn arrow_direction(self) -> Option<(i32, i32)> {
        match self {
            Self::Up => Some((0, -1)),
            Self::Down => Some((0, 1)),
            Self::Left => Some((-1, 0)),
            Self::Right => Some((1, 0)),
            Self::Enter | Self::Escape => None,
        }
    }
}
