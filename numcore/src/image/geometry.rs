//! Pixel coordinates and rectangles.

use std::ops::Add;

/// Pixel position with `usize` components, `x` along a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Vec2us {
    pub x: usize,
    pub y: usize,
}

impl Vec2us {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2us {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl From<(usize, usize)> for Vec2us {
    #[inline]
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl From<Vec2us> for (usize, usize) {
    #[inline]
    fn from(v: Vec2us) -> Self {
        (v.x, v.y)
    }
}

/// Rectangle of pixels with inclusive bounds:
/// `x_min <= x <= x_max` and `y_min <= y <= y_max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aabb {
    pub x_min: usize,
    pub x_max: usize,
    pub y_min: usize,
    pub y_max: usize,
}

impl Aabb {
    #[inline]
    pub const fn new(x_min: usize, x_max: usize, y_min: usize, y_max: usize) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Rectangle covering a whole `width x height` image, `None` if the image
    /// has no pixels.
    pub fn covering(width: usize, height: usize) -> Option<Self> {
        (width > 0 && height > 0).then(|| Self::new(0, width - 1, 0, height - 1))
    }

    /// Part of this rectangle that lies inside a `width x height` image.
    pub fn clip_to(&self, width: usize, height: usize) -> Option<Self> {
        let image = Self::covering(width, height)?;
        let clipped = Self::new(
            self.x_min.max(image.x_min),
            self.x_max.min(image.x_max),
            self.y_min.max(image.y_min),
            self.y_max.min(image.y_max),
        );
        (clipped.x_min <= clipped.x_max && clipped.y_min <= clipped.y_max).then_some(clipped)
    }

    #[inline]
    pub const fn top_left(&self) -> Vec2us {
        Vec2us::new(self.x_min, self.y_min)
    }

    /// Number of columns.
    #[inline]
    pub const fn width(&self) -> usize {
        self.x_max.saturating_sub(self.x_min) + 1
    }

    /// Number of rows.
    #[inline]
    pub const fn height(&self) -> usize {
        self.y_max.saturating_sub(self.y_min) + 1
    }

    #[inline]
    pub const fn area(&self) -> usize {
        self.width() * self.height()
    }

    #[inline]
    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}
