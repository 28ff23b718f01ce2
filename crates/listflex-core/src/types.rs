//! Geometry and identity value types.

use glam::DVec2;

/// Stable identifier of a node in the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u64);

/// A one-dimensional parent-relative length: `scale * parent + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UDim {
    /// Fraction of the parent extent
    pub scale: f64,
    /// Fixed pixel offset
    pub offset: f64,
}

impl UDim {
    pub const ZERO: UDim = UDim { scale: 0.0, offset: 0.0 };

    pub const fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    pub const fn from_offset(offset: f64) -> Self {
        Self { scale: 0.0, offset }
    }

    pub const fn from_scale(scale: f64) -> Self {
        Self { scale, offset: 0.0 }
    }

    /// Resolve to pixels against a parent extent.
    pub fn resolve(&self, parent: f64) -> f64 {
        self.scale * parent + self.offset
    }
}

/// A two-dimensional parent-relative size or position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UDim2 {
    pub x: UDim,
    pub y: UDim,
}

impl UDim2 {
    pub const ZERO: UDim2 = UDim2 { x: UDim::ZERO, y: UDim::ZERO };

    pub const fn new(x_scale: f64, x_offset: f64, y_scale: f64, y_offset: f64) -> Self {
        Self {
            x: UDim::new(x_scale, x_offset),
            y: UDim::new(y_scale, y_offset),
        }
    }

    /// Pure pixel value.
    pub const fn from_offset(x: f64, y: f64) -> Self {
        Self::new(0.0, x, 0.0, y)
    }

    /// Pure parent-relative value.
    pub const fn from_scale(x: f64, y: f64) -> Self {
        Self::new(x, 0.0, y, 0.0)
    }

    /// Pixel value from a vector.
    pub fn from_pixels(pixels: DVec2) -> Self {
        Self::from_offset(pixels.x, pixels.y)
    }

    /// Resolve to pixels against a parent size.
    pub fn resolve(&self, parent: DVec2) -> DVec2 {
        DVec2::new(self.x.resolve(parent.x), self.y.resolve(parent.y))
    }
}

/// Insets applied to a container's content area by a padding node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insets {
    pub top: UDim,
    pub bottom: UDim,
    pub left: UDim,
    pub right: UDim,
}

impl Insets {
    /// Same pixel inset on every side.
    pub const fn uniform(pixels: f64) -> Self {
        Self {
            top: UDim::from_offset(pixels),
            bottom: UDim::from_offset(pixels),
            left: UDim::from_offset(pixels),
            right: UDim::from_offset(pixels),
        }
    }

    /// Left and top insets in pixels.
    pub fn leading(&self, parent: DVec2) -> DVec2 {
        DVec2::new(self.left.resolve(parent.x), self.top.resolve(parent.y))
    }

    /// Right and bottom insets in pixels.
    pub fn trailing(&self, parent: DVec2) -> DVec2 {
        DVec2::new(self.right.resolve(parent.x), self.bottom.resolve(parent.y))
    }
}

/// What a child node represents to the layout.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// A rectangular element that takes part in layout
    Box,
    /// Content padding for its parent
    Padding(Insets),
    /// Legacy layout configuration object awaiting migration
    LegacyConfig,
    /// Anything else; ignored by the layout
    Other,
}

/// Axis whose extent is kept when an aspect ratio is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DominantAxis {
    #[default]
    Width,
    Height,
}

/// How an aspect-constrained item reacts to the box it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AspectScale {
    /// Only the non-dominant axis is recomputed
    #[default]
    Fixed,
    /// Additionally shrink uniformly to fit the allotted box
    ScaleWithParent,
}

/// Width-to-height ratio constraint attached to an item.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AspectConstraint {
    /// Width divided by height
    pub ratio: f64,
    pub dominant_axis: DominantAxis,
    pub scale_mode: AspectScale,
}

impl AspectConstraint {
    pub fn new(ratio: f64, dominant_axis: DominantAxis, scale_mode: AspectScale) -> Self {
        Self { ratio, dominant_axis, scale_mode }
    }

    /// Apply the constraint to a width/height pair.
    ///
    /// Returns `size` unchanged when the ratio is not a positive finite number.
    pub fn apply(&self, size: DVec2) -> DVec2 {
        if !(self.ratio.is_finite() && self.ratio > 0.0) {
            return size;
        }

        let constrained = match self.dominant_axis {
            DominantAxis::Width => DVec2::new(size.x, size.x / self.ratio),
            DominantAxis::Height => DVec2::new(size.y * self.ratio, size.y),
        };

        match self.scale_mode {
            AspectScale::Fixed => constrained,
            AspectScale::ScaleWithParent => {
                let fit_x = if constrained.x > 0.0 { size.x / constrained.x } else { 1.0 };
                let fit_y = if constrained.y > 0.0 { size.y / constrained.y } else { 1.0 };
                constrained * fit_x.min(fit_y).min(1.0)
            }
        }
    }
}
