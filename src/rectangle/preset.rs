use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectPreset {
    #[default]
    Free,
    Square,
    Ratio4x3,
    Ratio16x9,
    Ratio9x16,
    Original,
}

impl AspectPreset {
    pub const ALL: [AspectPreset; 6] = [
        Self::Free,
        Self::Square,
        Self::Ratio4x3,
        Self::Ratio16x9,
        Self::Ratio9x16,
        Self::Original,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Square => "1:1",
            Self::Ratio4x3 => "4:3",
            Self::Ratio16x9 => "16:9",
            Self::Ratio9x16 => "9:16",
            Self::Original => "Original",
        }
    }

    pub const fn ratio(self) -> Option<(u32, u32)> {
        match self {
            Self::Free | Self::Original => None,
            Self::Square => Some((1, 1)),
            Self::Ratio4x3 => Some((4, 3)),
            Self::Ratio16x9 => Some((16, 9)),
            Self::Ratio9x16 => Some((9, 16)),
        }
    }

    /// Effective ratio of the preset; `Original` follows the image dimensions.
    pub fn resolve_ratio(self, image_width: u32, image_height: u32) -> Option<(u32, u32)> {
        self.ratio().or_else(|| {
            if self == Self::Original {
                Some((image_width.max(1), image_height.max(1)))
            } else {
                None
            }
        })
    }
}
