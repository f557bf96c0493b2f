// crates/kryon-core/src/elements.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConstraintError;

/// Opaque identity of a layout participant. The host owns the element itself.
pub type ElementId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Attribute {
    Left = 0x00,
    Right = 0x01,
    Top = 0x02,
    Bottom = 0x03,
    Leading = 0x04,
    Trailing = 0x05,
    Width = 0x06,
    Height = 0x07,
    CenterX = 0x08,
    CenterY = 0x09,
    Baseline = 0x0A,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Edges, centers and the baseline.
    Positional,
    /// Width and height.
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Attribute {
    pub const COUNT: usize = 11;

    pub const ALL: [Attribute; Attribute::COUNT] = [
        Attribute::Left,
        Attribute::Right,
        Attribute::Top,
        Attribute::Bottom,
        Attribute::Leading,
        Attribute::Trailing,
        Attribute::Width,
        Attribute::Height,
        Attribute::CenterX,
        Attribute::CenterY,
        Attribute::Baseline,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Slot index for attribute-keyed arrays.
    pub fn index(self) -> usize {
        self.as_u8() as usize
    }

    pub fn kind(self) -> AttributeKind {
        match self {
            Attribute::Width | Attribute::Height => AttributeKind::Size,
            _ => AttributeKind::Positional,
        }
    }

    pub fn is_size(self) -> bool {
        self.kind() == AttributeKind::Size
    }

    pub fn is_positional(self) -> bool {
        self.kind() == AttributeKind::Positional
    }

    pub fn axis(self) -> Axis {
        match self {
            Attribute::Left
            | Attribute::Right
            | Attribute::Leading
            | Attribute::Trailing
            | Attribute::Width
            | Attribute::CenterX => Axis::Horizontal,
            Attribute::Top
            | Attribute::Bottom
            | Attribute::Height
            | Attribute::CenterY
            | Attribute::Baseline => Axis::Vertical,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Left => "left",
            Attribute::Right => "right",
            Attribute::Top => "top",
            Attribute::Bottom => "bottom",
            Attribute::Leading => "leading",
            Attribute::Trailing => "trailing",
            Attribute::Width => "width",
            Attribute::Height => "height",
            Attribute::CenterX => "centerX",
            Attribute::CenterY => "centerY",
            Attribute::Baseline => "baseline",
        }
    }
}

impl TryFrom<u8> for Attribute {
    type Error = ConstraintError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Attribute::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| ConstraintError::UnknownAttribute(format!("0x{:02X}", value)))
    }
}

impl FromStr for Attribute {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .iter()
            .copied()
            .find(|attr| attr.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConstraintError::UnknownAttribute(s.to_string()))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One attribute of one participant. Building a reference registers nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeReference {
    pub participant: ElementId,
    pub attribute: Attribute,
}

impl AttributeReference {
    pub fn new(participant: ElementId, attribute: Attribute) -> Self {
        Self { participant, attribute }
    }

    /// Same participant and same attribute.
    pub fn is_same_as(&self, other: &AttributeReference) -> bool {
        self == other
    }
}

impl fmt::Display for AttributeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.participant, self.attribute)
    }
}

/// Getter-side sugar for a participant: `Anchor::new(a).left()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor(pub ElementId);

impl Anchor {
    pub fn new(participant: ElementId) -> Self {
        Self(participant)
    }

    pub fn attr(&self, attribute: Attribute) -> AttributeReference {
        AttributeReference::new(self.0, attribute)
    }

    pub fn left(&self) -> AttributeReference {
        self.attr(Attribute::Left)
    }

    pub fn right(&self) -> AttributeReference {
        self.attr(Attribute::Right)
    }

    pub fn top(&self) -> AttributeReference {
        self.attr(Attribute::Top)
    }

    pub fn bottom(&self) -> AttributeReference {
        self.attr(Attribute::Bottom)
    }

    pub fn leading(&self) -> AttributeReference {
        self.attr(Attribute::Leading)
    }

    pub fn trailing(&self) -> AttributeReference {
        self.attr(Attribute::Trailing)
    }

    pub fn width(&self) -> AttributeReference {
        self.attr(Attribute::Width)
    }

    pub fn height(&self) -> AttributeReference {
        self.attr(Attribute::Height)
    }

    pub fn center_x(&self) -> AttributeReference {
        self.attr(Attribute::CenterX)
    }

    pub fn center_y(&self) -> AttributeReference {
        self.attr(Attribute::CenterY)
    }

    pub fn baseline(&self) -> AttributeReference {
        self.attr(Attribute::Baseline)
    }
}
