//! Enumerated configuration values and text snapping.

/// An enumeration that can be read from free text.
pub trait Choice: Copy + PartialEq + Sized + 'static {
    /// Accepted spellings. The first entry for each variant is canonical.
    const NAMES: &'static [(&'static str, Self)];

    /// Canonical spelling of this value.
    fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, v)| *v == self)
            .map(|(n, _)| *n)
            .unwrap_or_default()
    }
}

/// Outcome of snapping text to a [`Choice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snapped<T> {
    /// Case-insensitive match of a name or synonym
    Exact(T),
    /// Unique case-insensitive prefix of one variant's names
    Nearest(T),
    /// Nothing matched; the supplied default
    Fallback(T),
}

impl<T: Copy> Snapped<T> {
    pub fn value(self) -> T {
        match self {
            Snapped::Exact(v) | Snapped::Nearest(v) | Snapped::Fallback(v) => v,
        }
    }
}

/// Snap free text to the closest valid value of `T`.
pub fn snap<T: Choice>(text: &str, default: T) -> Snapped<T> {
    let wanted = text.trim().to_ascii_lowercase();
    if wanted.is_empty() {
        return Snapped::Fallback(default);
    }

    if let Some((_, v)) = T::NAMES.iter().find(|(n, _)| n.eq_ignore_ascii_case(&wanted)) {
        return Snapped::Exact(*v);
    }

    let mut candidate: Option<T> = None;
    for (name, value) in T::NAMES {
        if name.to_ascii_lowercase().starts_with(&wanted) {
            match candidate {
                Some(c) if c != *value => return Snapped::Fallback(default),
                _ => candidate = Some(*value),
            }
        }
    }

    candidate.map_or(Snapped::Fallback(default), Snapped::Nearest)
}

/// Main axis orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Items stack top to bottom
    #[default]
    Vertical,
    /// Items stack left to right
    Horizontal,
}

impl Choice for Direction {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("Vertical", Direction::Vertical),
        ("Horizontal", Direction::Horizontal),
    ];
}

/// How free space along an axis is handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distribution {
    /// Static alignment decides placement
    #[default]
    None,
    /// Items (or lines) are resized to fill the axis
    Fill,
    /// Equal gaps between items, half gaps at the ends
    SpaceAround,
    /// Equal gaps between items only
    SpaceBetween,
    /// Equal gaps between items and at both ends
    SpaceEvenly,
}

impl Choice for Distribution {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("None", Distribution::None),
        ("Fill", Distribution::Fill),
        ("SpaceAround", Distribution::SpaceAround),
        ("SpaceBetween", Distribution::SpaceBetween),
        ("SpaceEvenly", Distribution::SpaceEvenly),
    ];
}

/// Static placement along an axis when no distribution is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

impl Choice for Alignment {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("Start", Alignment::Start),
        ("Center", Alignment::Center),
        ("End", Alignment::End),
        ("Top", Alignment::Start),
        ("Left", Alignment::Start),
        ("Middle", Alignment::Center),
        ("Bottom", Alignment::End),
        ("Right", Alignment::End),
    ];
}

impl Alignment {
    /// Offset that places `used` inside `available`.
    pub fn offset(self, available: f64, used: f64) -> f64 {
        match self {
            Alignment::Start => 0.0,
            Alignment::Center => (available - used) / 2.0,
            Alignment::End => available - used,
        }
    }
}

/// Placement of an item across its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineAlignment {
    /// Defer to the container
    #[default]
    Automatic,
    Start,
    Center,
    End,
    /// Resize to the line's cross extent
    Stretch,
}

impl Choice for LineAlignment {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("Automatic", LineAlignment::Automatic),
        ("Start", LineAlignment::Start),
        ("Center", LineAlignment::Center),
        ("End", LineAlignment::End),
        ("Stretch", LineAlignment::Stretch),
        ("Auto", LineAlignment::Automatic),
    ];
}

/// Ordering key for items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// The host's explicit numeric layout order
    #[default]
    ExplicitOrder,
    /// Item name, lexicographically
    Name,
}

impl Choice for SortOrder {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("ExplicitOrder", SortOrder::ExplicitOrder),
        ("Name", SortOrder::Name),
        ("LayoutOrder", SortOrder::ExplicitOrder),
    ];
}

/// Per-item flex shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexMode {
    /// Use the explicit grow and shrink ratios
    #[default]
    None,
    Grow,
    Shrink,
    Fill,
}

impl Choice for FlexMode {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("None", FlexMode::None),
        ("Grow", FlexMode::Grow),
        ("Shrink", FlexMode::Shrink),
        ("Fill", FlexMode::Fill),
    ];
}
