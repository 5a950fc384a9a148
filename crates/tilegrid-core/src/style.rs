#![forbid(unsafe_code)]

//! Live visual style applied imperatively to a cell during a gesture.

/// Transform and emphasis applied on top of a cell's laid-out position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveStyle {
    /// Horizontal translation from the laid-out position.
    pub translate_x: f64,
    /// Vertical translation from the laid-out position.
    pub translate_y: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Stacking order; `None` leaves the current order untouched.
    pub z_index: Option<i32>,
}

impl LiveStyle {
    /// No translation, full opacity, unit scale.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            opacity: 1.0,
            z_index: None,
        }
    }

    /// Emphasis shown once a press has been held long enough to drag.
    #[must_use]
    pub const fn emphasized(scale: f64, opacity: f64) -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale,
            opacity,
            z_index: None,
        }
    }

    /// Whether this style leaves the cell exactly as laid out.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.translate_x == 0.0 && self.translate_y == 0.0 && self.scale == 1.0 && self.opacity == 1.0
    }
}

impl Default for LiveStyle {
    fn default() -> Self {
        Self::neutral()
    }
}
