//! Screen-space primitives shared by layout, hit-testing and drawing.

use core::ops::{Add, Mul, Sub};

use strum::Display;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle, origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inclusive of the top-left edge, exclusive of the bottom-right edge, so
    /// a point on a shared border belongs to exactly one of two tiled rects.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// The intersection of two rects, or `None` when they only touch or are
    /// apart.
    pub fn overlap(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        (x1 < x2 && y1 < y2).then(|| Rect::new(x1, y1, x2 - x1, y2 - y1))
    }

    /// Space left inside this rect once `padding` is taken off every side.
    pub fn inset(&self, padding: &Padding) -> Rect {
        Rect::new(
            self.x + padding.left,
            self.y + padding.up,
            self.width - padding.horizontal(),
            self.height - padding.vertical(),
        )
    }

    pub fn translate(&self, delta: Vec2) -> Rect {
        Rect::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Padding {
    pub up: f32,
    pub down: f32,
    pub left: f32,
    pub right: f32,
}

impl Padding {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(up: f32, down: f32, left: f32, right: f32) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }

    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.up + self.down
    }

    pub fn scaled(&self, factor: f32) -> Padding {
        Padding::new(
            self.up * factor,
            self.down * factor,
            self.left * factor,
            self.right * factor,
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HoriAlign {
    #[default]
    Left,
    Right,
    Center,
    /// Centered across the owning window rather than the cell.
    WindowCenter,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Offset of a `size` box inside `space` for the given alignment.
///
/// `WindowCenter` is resolved by the caller; here it behaves like `Center`.
pub fn align_offset(size: Vec2, space: Vec2, vert: VertAlign, hori: HoriAlign) -> Vec2 {
    let x = match hori {
        HoriAlign::Left => 0.0,
        HoriAlign::Right => space.x - size.x,
        HoriAlign::Center | HoriAlign::WindowCenter => (space.x - size.x) / 2.0,
    };
    let y = match vert {
        VertAlign::Top => 0.0,
        VertAlign::Middle => (space.y - size.y) / 2.0,
        VertAlign::Bottom => space.y - size.y,
    };
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_of_touching_rects_is_none() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(a.overlap(&b), None);
        assert!(!b.contains(Vec2::new(9.5, 5.0)));
        assert!(b.contains(Vec2::new(10.0, 5.0)));
    }

    #[test]
    fn overlap_is_the_shared_region() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 25.0, 100.0, 100.0);
        assert_eq!(a.overlap(&b), Some(Rect::new(50.0, 25.0, 50.0, 75.0)));
    }

    #[test]
    fn inset_removes_padding() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        let inner = rect.inset(&Padding::new(5.0, 5.0, 10.0, 0.0));
        assert_eq!(inner, Rect::new(20.0, 15.0, 90.0, 40.0));
    }
}
