//! Generic complex numbers.
//!
//! [`Complex<T>`] is a plain `(re, im)` pair with the memory layout of `[T; 2]`,
//! so spectra stored as `&[Complex<T>]` can be handed to FFT code that expects
//! interleaved real/imaginary buffers (see [`as_components`]).
//!
//! Magnitude, division and square root avoid intermediate overflow: components
//! of `1e150` and `1e-150` can be mixed freely.

pub mod spectrum;


use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};
use num_traits::{Float, FloatConst, One, Zero};

use crate::cast;

/// Complex number with real part first.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Complex<T> {
    re: T,
    im: T,
}

pub type F32Complex = Complex<f32>;
pub type F64Complex = Complex<f64>;

const _: () = assert!(std::mem::size_of::<Complex<f32>>() == 2 * std::mem::size_of::<f32>());
const _: () = assert!(std::mem::size_of::<Complex<f64>>() == 2 * std::mem::size_of::<f64>());

// SAFETY: `#[repr(C)]` struct of two `T: Pod` fields of the same type has no
// padding and every bit pattern is valid.
unsafe impl<T: Pod> Zeroable for Complex<T> {}
unsafe impl<T: Pod> Pod for Complex<T> {}

impl<T: Float> Complex<T> {
    #[inline]
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }

    #[inline]
    pub fn from_real(re: T) -> Self {
        Self { re, im: T::zero() }
    }

    /// Complex number from modulus and argument.
    #[inline]
    pub fn polar(r: T, theta: T) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::polar_sin_cos(r, sin, cos)
    }

    /// Complex number from modulus and precomputed sine and cosine of the argument.
    #[inline]
    pub fn polar_sin_cos(r: T, sin: T, cos: T) -> Self {
        Self::new(r * cos, r * sin)
    }

    #[inline]
    pub fn real(&self) -> T {
        self.re
    }

    #[inline]
    pub fn imag(&self) -> T {
        self.im
    }

    #[inline]
    pub fn real_mut(&mut self) -> &mut T {
        &mut self.re
    }

    #[inline]
    pub fn imag_mut(&mut self) -> &mut T {
        &mut self.im
    }

    #[inline]
    pub fn is_real(&self) -> bool {
        self.im == T::zero()
    }

    #[inline]
    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    #[inline]
    pub fn set_conj(&mut self) {
        self.im = -self.im;
    }

    /// Modulus `|z|`, computed without overflow or underflow of `re² + im²`.
    pub fn mag(&self) -> T {
        let r = self.re.abs();
        let i = self.im.abs();
        if r == T::zero() {
            return i;
        }
        if i == T::zero() {
            return r;
        }
        let (big, small) = if r >= i { (r, i) } else { (i, r) };
        let t = small / big;
        big * (T::one() + t * t).sqrt()
    }

    /// Squared modulus.
    #[inline]
    pub fn norm(&self) -> T {
        self.re * self.re + self.im * self.im
    }

    /// Argument in `(-pi, pi]`. Zero for the origin.
    #[inline]
    pub fn arg(&self) -> T {
        if self.re == T::zero() && self.im == T::zero() {
            T::zero()
        } else {
            self.im.atan2(self.re)
        }
    }

    /// Principal square root.
    pub fn sqrt(self) -> Self {
        if self.re == T::zero() && self.im == T::zero() {
            return Self::zero();
        }

        let half: T = cast(0.5);
        let r = self.re.abs();
        let i = self.im.abs();
        let m = if r >= i {
            let t = i / r;
            r.sqrt() * (half * (T::one() + (T::one() + t * t).sqrt())).sqrt()
        } else {
            let t = r / i;
            i.sqrt() * (half * (t + (T::one() + t * t).sqrt())).sqrt()
        };

        let two: T = cast(2.0);
        if self.re >= T::zero() {
            Self::new(m, self.im / (two * m))
        } else {
            let m = if self.im >= T::zero() { m } else { -m };
            Self::new(self.im / (two * m), m)
        }
    }

    pub fn exp(self) -> Self {
        Self::polar(self.re.exp(), self.im)
    }

    /// Principal natural logarithm.
    pub fn ln(self) -> Self {
        Self::new(self.mag().ln(), self.arg())
    }

    /// Complex power with a real exponent.
    ///
    /// Non-negative real bases use the real power; negative real bases take
    /// the principal branch.
    pub fn powf(self, x: T) -> Self {
        if self.is_real() && self.re >= T::zero() {
            Self::from_real(self.re.powf(x))
        } else {
            (self.ln() * x).exp()
        }
    }

    /// Complex power with a complex exponent.
    pub fn powc(self, c: Self) -> Self {
        if c.is_real() {
            self.powf(c.re)
        } else if self.is_real() {
            Self::real_powc(self.re, c)
        } else {
            (c * self.ln()).exp()
        }
    }

    /// Real base raised to a complex exponent.
    pub fn real_powc(x: T, c: Self) -> Self {
        if x < T::zero() {
            (c * Self::from_real(x).ln()).exp()
        } else if c.is_real() {
            Self::from_real(x.powf(c.re))
        } else {
            (c * x.ln()).exp()
        }
    }

    pub fn sin(self) -> Self {
        Self::new(
            self.re.sin() * self.im.cosh(),
            self.re.cos() * self.im.sinh(),
        )
    }

    pub fn cos(self) -> Self {
        Self::new(
            self.re.cos() * self.im.cosh(),
            -self.re.sin() * self.im.sinh(),
        )
    }

    pub fn tan(self) -> Self {
        self.sin() / self.cos()
    }

    pub fn sinh(self) -> Self {
        Self::new(
            self.re.sinh() * self.im.cos(),
            self.re.cosh() * self.im.sin(),
        )
    }

    pub fn cosh(self) -> Self {
        Self::new(
            self.re.cosh() * self.im.cos(),
            self.re.sinh() * self.im.sin(),
        )
    }

    pub fn tanh(self) -> Self {
        self.sinh() / self.cosh()
    }

    /// Rounds both components to the nearest integer, halves away from zero.
    #[inline]
    pub fn round(self) -> Self {
        Self::new(self.re.round(), self.im.round())
    }

    /// Rounds both components to `decimals` decimal places.
    pub fn round_to(self, decimals: i32) -> Self {
        let p = cast::<T, _>(10.0).powi(decimals);
        Self::new((self.re * p).round() / p, (self.im * p).round() / p)
    }

    /// Orders two complex numbers by magnitude.
    #[inline]
    pub fn mag_cmp(&self, other: &Self) -> Ordering {
        self.mag()
            .partial_cmp(&other.mag())
            .unwrap_or(Ordering::Equal)
    }
}

impl<T: Float + FloatConst> Complex<T> {
    /// Principal base-10 logarithm.
    pub fn log10(self) -> Self {
        self.ln() * T::LOG10_E()
    }
}

impl Complex<f64> {
    /// Narrowing conversion, rounding each component to `f32`.
    #[inline]
    pub fn to_f32(self) -> Complex<f32> {
        Complex::new(self.re as f32, self.im as f32)
    }
}

impl From<Complex<f32>> for Complex<f64> {
    #[inline]
    fn from(c: Complex<f32>) -> Self {
        Self::new(c.re as f64, c.im as f64)
    }
}

impl<T: Float> From<T> for Complex<T> {
    #[inline]
    fn from(re: T) -> Self {
        Self::from_real(re)
    }
}

impl<T: Float> Zero for Complex<T> {
    #[inline]
    fn zero() -> Self {
        Self::new(T::zero(), T::zero())
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }
}

impl<T: Float> One for Complex<T> {
    #[inline]
    fn one() -> Self {
        Self::from_real(T::one())
    }
}

impl<T: fmt::Display> fmt::Display for Complex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        fmt::Display::fmt(&self.re, f)?;
        write!(f, ", ")?;
        fmt::Display::fmt(&self.im, f)?;
        write!(f, ")")
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

impl<T: Float> Neg for Complex<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

impl<T: Float> Add for Complex<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl<T: Float> Sub for Complex<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl<T: Float> Mul for Complex<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl<T: Float> Div for Complex<T> {
    type Output = Self;

    /// Smith's algorithm: scale by the larger divisor component.
    #[inline]
    fn div(self, rhs: Self) -> Self {
        if rhs.re.abs() >= rhs.im.abs() {
            debug_assert!(rhs.re != T::zero(), "complex division by zero");
            let r = rhs.im / rhs.re;
            let d = rhs.re + r * rhs.im;
            Self::new((self.re + r * self.im) / d, (self.im - r * self.re) / d)
        } else {
            let r = rhs.re / rhs.im;
            let d = rhs.im + r * rhs.re;
            Self::new((self.re * r + self.im) / d, (self.im * r - self.re) / d)
        }
    }
}

impl<T: Float> Add<T> for Complex<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: T) -> Self {
        Self::new(self.re + rhs, self.im)
    }
}

impl<T: Float> Sub<T> for Complex<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: T) -> Self {
        Self::new(self.re - rhs, self.im)
    }
}

impl<T: Float> Mul<T> for Complex<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        Self::new(self.re * rhs, self.im * rhs)
    }
}

impl<T: Float> Div<T> for Complex<T> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: T) -> Self {
        Self::new(self.re / rhs, self.im / rhs)
    }
}

macro_rules! impl_assign_ops {
    ($($trait:ident $method:ident $op:tt),*) => {
        $(
            impl<T: Float> $trait for Complex<T> {
                #[inline]
                fn $method(&mut self, rhs: Self) {
                    *self = *self $op rhs;
                }
            }

            impl<T: Float> $trait<T> for Complex<T> {
                #[inline]
                fn $method(&mut self, rhs: T) {
                    *self = *self $op rhs;
                }
            }
        )*
    };
}

impl_assign_ops!(
    AddAssign add_assign +,
    SubAssign sub_assign -,
    MulAssign mul_assign *,
    DivAssign div_assign /
);

/// `scalar op complex` for the concrete float types; coherence rules forbid a
/// generic `impl<T> Add<Complex<T>> for T`.
macro_rules! impl_scalar_lhs_ops {
    ($($t:ty),*) => {
        $(
            impl Add<Complex<$t>> for $t {
                type Output = Complex<$t>;

                #[inline]
                fn add(self, rhs: Complex<$t>) -> Complex<$t> {
                    Complex::new(self + rhs.re, rhs.im)
                }
            }

            impl Sub<Complex<$t>> for $t {
                type Output = Complex<$t>;

                #[inline]
                fn sub(self, rhs: Complex<$t>) -> Complex<$t> {
                    Complex::new(self - rhs.re, -rhs.im)
                }
            }

            impl Mul<Complex<$t>> for $t {
                type Output = Complex<$t>;

                #[inline]
                fn mul(self, rhs: Complex<$t>) -> Complex<$t> {
                    Complex::new(self * rhs.re, self * rhs.im)
                }
            }

            impl Div<Complex<$t>> for $t {
                type Output = Complex<$t>;

                #[inline]
                fn div(self, rhs: Complex<$t>) -> Complex<$t> {
                    Complex::from_real(self) / rhs
                }
            }
        )*
    };
}

impl_scalar_lhs_ops!(f32, f64);

// ============================================================================
// Interleaved views
// ============================================================================

/// Views a complex slice as interleaved `[re0, im0, re1, im1, ...]` components.
#[inline]
pub fn as_components<T: Pod>(values: &[Complex<T>]) -> &[T] {
    bytemuck::cast_slice(values)
}

/// Mutable variant of [`as_components`].
#[inline]
pub fn as_components_mut<T: Pod>(values: &mut [Complex<T>]) -> &mut [T] {
    bytemuck::cast_slice_mut(values)
}

/// Views interleaved components as complex numbers.
///
/// # Panics
///
/// If `components` has odd length.
#[inline]
pub fn from_components<T: Pod>(components: &[T]) -> &[Complex<T>] {
    assert!(
        components.len() % 2 == 0,
        "interleaved complex buffer must have even length, got {}",
        components.len()
    );
    bytemuck::cast_slice(components)
}

/// Mutable variant of [`from_components`].
///
/// # Panics
///
/// If `components` has odd length.
#[inline]
pub fn from_components_mut<T: Pod>(components: &mut [T]) -> &mut [Complex<T>] {
    assert!(
        components.len() % 2 == 0,
        "interleaved complex buffer must have even length, got {}",
        components.len()
    );
    bytemuck::cast_slice_mut(components)
}
