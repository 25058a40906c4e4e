//! Sample types and image regions consumed by the interpolation and
//! statistics engines.

mod geometry;

pub use geometry::{Aabb, Vec2us};

use common::Buffer2View;

/// Pixel sample type.
///
/// Integer samples span `[0, MAX_SAMPLE_VALUE]` and normalize to `[0, 1]`;
/// floating point samples are already normalized.
pub trait Sample: Copy + Send + Sync + 'static {
    /// Value that normalizes to 1.
    const MAX_SAMPLE_VALUE: f64;

    /// Sample value in its native range.
    fn to_f64(self) -> f64;

    /// Sample value mapped to `[0, 1]`.
    #[inline]
    fn normalized(self) -> f64 {
        self.to_f64() / Self::MAX_SAMPLE_VALUE
    }
}

macro_rules! impl_integer_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                const MAX_SAMPLE_VALUE: f64 = <$t>::MAX as f64;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_integer_sample!(u8, u16, u32);

impl Sample for f32 {
    const MAX_SAMPLE_VALUE: f64 = 1.0;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn normalized(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    const MAX_SAMPLE_VALUE: f64 = 1.0;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn normalized(self) -> f64 {
        self
    }
}

/// Rectangular selection of a sample plane.
///
/// The selection is clipped to the view on construction; a selection that
/// misses the view entirely, or a view without pixels, gives an empty region.
#[derive(Debug)]
pub struct ImageRegion<'a, T> {
    view: Buffer2View<'a, T>,
    rect: Option<Aabb>,
}

impl<T> Clone for ImageRegion<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ImageRegion<'_, T> {}

impl<'a, T> ImageRegion<'a, T> {
    /// Region covering the whole view.
    pub fn new(view: Buffer2View<'a, T>) -> Self {
        let rect = Aabb::covering(view.width(), view.height());
        Self { view, rect }
    }

    /// Region restricted to `rect` (inclusive bounds, absolute coordinates).
    pub fn with_rect(view: Buffer2View<'a, T>, rect: Aabb) -> Self {
        let rect = rect.clip_to(view.width(), view.height());
        Self { view, rect }
    }

    #[inline]
    pub fn view(&self) -> &Buffer2View<'a, T> {
        &self.view
    }

    /// Selected rectangle after clipping, `None` when empty.
    #[inline]
    pub fn rect(&self) -> Option<Aabb> {
        self.rect
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rect.is_none()
    }

    /// Number of selected pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.rect.map_or(0, |r| r.area())
    }

    /// Selected samples with their absolute positions, in row-major scan order.
    pub fn iter(&self) -> impl Iterator<Item = (Vec2us, &'a T)> + '_ {
        let view = self.view;
        self.rect.into_iter().flat_map(move |r| {
            (r.y_min..=r.y_max).flat_map(move |y| {
                view.row(y)
                    .enumerate()
                    .skip(r.x_min)
                    .take(r.width())
                    .map(move |(x, v)| (Vec2us::new(x, y), v))
            })
        })
    }
}

impl<'a, T> From<Buffer2View<'a, T>> for ImageRegion<'a, T> {
    fn from(view: Buffer2View<'a, T>) -> Self {
        Self::new(view)
    }
}
