use serde::{Deserialize, Serialize};

/// Pixel size of the drawing surface handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Converts signed toolkit sizes (GTK hands out `i32`) into a viewport.
    ///
    /// Negative values collapse to zero, which `is_valid` then rejects.
    #[must_use]
    pub fn from_signed(width: i32, height: i32) -> Self {
        Self {
            width: u32::try_from(width).unwrap_or(0),
            height: u32::try_from(height).unwrap_or(0),
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}
