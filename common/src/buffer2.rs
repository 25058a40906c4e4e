use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::slice;

/// Owned row-major 2D buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer2<T> {
    pixels: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Buffer2<T> {
    pub fn new(width: usize, height: usize, pixels: Vec<T>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixels length must equal width * height"
        );
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        debug_assert!(x < self.width && y < self.height);
        &self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        debug_assert!(x < self.width && y < self.height);
        &mut self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.pixels
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.pixels.iter()
    }

    /// Borrow the whole buffer as a contiguous view.
    #[inline]
    pub fn view(&self) -> Buffer2View<'_, T> {
        Buffer2View {
            samples: &self.pixels,
            width: self.width,
            height: self.height,
            row_stride: self.width,
            step: 1,
        }
    }
}

impl<T: Default + Clone> Buffer2<T> {
    pub fn new_default(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![T::default(); width * height],
            width,
            height,
        }
    }
}

impl<T: Clone> Buffer2<T> {
    pub fn new_filled(width: usize, height: usize, value: T) -> Self {
        Self {
            pixels: vec![value; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn fill(&mut self, value: T) {
        self.pixels.fill(value);
    }
}

impl<T> Index<(usize, usize)> for Buffer2<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.pixels[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Buffer2<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.pixels[y * self.width + x]
    }
}

impl<T> Deref for Buffer2<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.pixels
    }
}

impl<T> DerefMut for Buffer2<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pixels
    }
}

/// Borrowed 2D view over samples owned by the caller.
///
/// `row_stride` is the distance in elements between the starts of two
/// consecutive rows, `step` the distance between two horizontally adjacent
/// samples. A single channel of interleaved RGB data is a view with
/// `step == 3` starting at the channel offset.
#[derive(Debug)]
pub struct Buffer2View<'a, T> {
    samples: &'a [T],
    width: usize,
    height: usize,
    row_stride: usize,
    step: usize,
}

impl<T> Clone for Buffer2View<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Buffer2View<'_, T> {}

impl<'a, T> Buffer2View<'a, T> {
    /// Contiguous row-major view.
    pub fn new(samples: &'a [T], width: usize, height: usize) -> Self {
        Self::with_layout(samples, width, height, width, 1)
    }

    /// View with an explicit row stride and sample step.
    pub fn with_layout(
        samples: &'a [T],
        width: usize,
        height: usize,
        row_stride: usize,
        step: usize,
    ) -> Self {
        assert!(step > 0, "sample step must be > 0");
        assert!(
            row_stride >= width * step,
            "row stride {} too small for width {} and step {}",
            row_stride,
            width,
            step
        );
        if width > 0 && height > 0 {
            let last = (height - 1) * row_stride + (width - 1) * step;
            assert!(
                last < samples.len(),
                "view {}x{} (stride {}, step {}) exceeds {} samples",
                width,
                height,
                row_stride,
                step,
                samples.len()
            );
        }
        Self {
            samples,
            width,
            height,
            row_stride,
            step,
        }
    }

    /// View over one channel of pixel-interleaved data.
    pub fn interleaved_channel(
        samples: &'a [T],
        width: usize,
        height: usize,
        channels: usize,
        channel: usize,
    ) -> Self {
        assert!(
            channel < channels,
            "channel {} out of range for {} channels",
            channel,
            channels
        );
        let offset = if samples.is_empty() { 0 } else { channel };
        Self::with_layout(
            &samples[offset..],
            width,
            height,
            width * channels,
            channels,
        )
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &'a T {
        debug_assert!(x < self.width && y < self.height);
        &self.samples[y * self.row_stride + x * self.step]
    }

    /// Samples of row `y`, honoring the sample step.
    #[inline]
    pub fn row(&self, y: usize) -> impl Iterator<Item = &'a T> + 'a {
        debug_assert!(y < self.height);
        let start = y * self.row_stride;
        let samples: &'a [T] = self.samples;
        samples[start..]
            .iter()
            .step_by(self.step)
            .take(self.width)
    }
}

impl<T> Index<(usize, usize)> for Buffer2View<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.samples[y * self.row_stride + x * self.step]
    }
}

impl<'a, T> From<&'a Buffer2<T>> for Buffer2View<'a, T> {
    #[inline]
    fn from(buffer: &'a Buffer2<T>) -> Self {
        buffer.view()
    }
}
