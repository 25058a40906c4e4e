//! Chebyshev approximation of vector-valued functions of one variable.
//!
//! A [`ChebyshevFit`] samples `f: R -> R^N` at the `n` Chebyshev nodes of an
//! interval and stores, for each of the N components, the series
//!
//! ```text
//! f_i(x) ~ c[i][0]/2 + sum_{j=1}^{n-1} c[i][j] * T_j(y),   y = 2 (x - x0) / dx
//! ```
//!
//! Evaluation uses the Clenshaw recurrence over a per-component active length,
//! which [`ChebyshevFit::truncate`] shrinks to the shortest prefix meeting an
//! error bound. Coefficients are never modified after construction.

mod error;


pub use error::Error;

use num_traits::{Float, FloatConst};

use crate::cast;

/// Chebyshev expansion of an N-component function over a closed interval.
#[derive(Debug, Clone)]
pub struct ChebyshevFit<T> {
    /// Interval width.
    dx: T,
    /// Interval center.
    x0: T,
    /// Full-length series, one per component.
    coefficients: Vec<Vec<T>>,
    /// Active series length per component, in `[2, n]`.
    truncated: Vec<usize>,
}

pub type F32ChebyshevFit = ChebyshevFit<f32>;
pub type F64ChebyshevFit = ChebyshevFit<f64>;

impl<T: Float + FloatConst> ChebyshevFit<T> {
    /// Fit `f` over the interval with ends `x1` and `x2` (either order) using
    /// `n` coefficients per component.
    ///
    /// `n` is raised to at least 2 and `n_components` to at least 1. `f` is
    /// called once per Chebyshev node and must return exactly `n_components`
    /// values.
    pub fn new<F, V>(
        mut f: F,
        x1: T,
        x2: T,
        n_components: usize,
        n: usize,
    ) -> Result<Self, Error>
    where
        F: FnMut(T) -> V,
        V: AsRef<[T]>,
    {
        let n = n.max(2);
        let n_components = n_components.max(1);
        let (dx, x0) = interval(x1, x2)?;

        let nf: T = cast(n);
        let half: T = cast(0.5);

        // Function values at the nodes, component-major.
        let mut values = vec![vec![T::zero(); n]; n_components];
        for k in 0..n {
            let theta = T::PI() * (cast::<T, _>(k) + half) / nf;
            let x = x0 + theta.cos() * dx * half;
            let y = f(x);
            let y = y.as_ref();
            if y.len() != n_components {
                return Err(Error::ComponentCountMismatch {
                    node: k,
                    expected: n_components,
                    actual: y.len(),
                });
            }
            for (component, &v) in values.iter_mut().zip(y) {
                component[k] = v;
            }
        }

        // cos(pi * j * (k + 1/2) / n), shared by all components.
        let basis: Vec<T> = (0..n)
            .flat_map(|j| {
                (0..n).map(move |k| {
                    (T::PI() * cast::<T, _>(j) * (cast::<T, _>(k) + half) / nf).cos()
                })
            })
            .collect();

        let scale = cast::<T, _>(2.0) / nf;
        let coefficients: Vec<Vec<T>> = values
            .iter()
            .map(|y| {
                basis
                    .chunks_exact(n)
                    .map(|row| {
                        let sum = row
                            .iter()
                            .zip(y)
                            .fold(T::zero(), |acc, (&b, &v)| acc + v * b);
                        scale * sum
                    })
                    .collect()
            })
            .collect();

        tracing::debug!(
            "Chebyshev fit: {} component(s), {} coefficients over [{}, {}]",
            n_components,
            n,
            to_f64(x0 - dx * half),
            to_f64(x0 + dx * half)
        );

        Ok(Self {
            dx,
            x0,
            truncated: vec![n; n_components],
            coefficients,
        })
    }

    /// Build a fit from precomputed coefficient series over `[x1, x2]`.
    ///
    /// Every series must have the same length, at least 2.
    pub fn from_coefficients(series: Vec<Vec<T>>, x1: T, x2: T) -> Result<Self, Error> {
        let (dx, x0) = interval(x1, x2)?;
        let Some(first) = series.first() else {
            return Err(Error::EmptySeries);
        };
        let n = first.len();
        for (component, s) in series.iter().enumerate() {
            if s.len() < 2 || s.len() != n {
                return Err(Error::InvalidSeriesLength {
                    component,
                    length: s.len(),
                });
            }
        }

        Ok(Self {
            dx,
            x0,
            truncated: vec![n; series.len()],
            coefficients: series,
        })
    }

    #[inline]
    pub fn lower_bound(&self) -> T {
        self.x0 - self.dx * cast(0.5)
    }

    #[inline]
    pub fn upper_bound(&self) -> T {
        self.x0 + self.dx * cast(0.5)
    }

    #[inline]
    pub fn num_components(&self) -> usize {
        self.coefficients.len()
    }

    /// Full series length n.
    #[inline]
    pub fn len(&self) -> usize {
        self.coefficients[0].len()
    }

    /// Active series length of component `i`, or the largest over all
    /// components for `None`.
    pub fn truncated_length(&self, i: Option<usize>) -> usize {
        match i {
            Some(i) => self.truncated[i],
            None => self.truncated.iter().copied().max().unwrap_or(0),
        }
    }

    /// Whether component `i` (or every component, for `None`) is evaluated
    /// over fewer than n coefficients.
    pub fn is_truncated(&self, i: Option<usize>) -> bool {
        self.truncated_length(i) < self.len()
    }

    /// Upper bound of the error introduced by truncation: the sum of the
    /// magnitudes of the dropped coefficients, or `|c[n-1]|` for an
    /// untruncated component. `None` gives the largest over all components.
    pub fn truncation_error(&self, i: Option<usize>) -> T {
        match i {
            Some(i) => self.component_truncation_error(i),
            None => (0..self.num_components())
                .map(|i| self.component_truncation_error(i))
                .fold(T::zero(), |a, b| a.max(b)),
        }
    }

    fn component_truncation_error(&self, i: usize) -> T {
        let c = &self.coefficients[i];
        let m = self.truncated[i];
        if m < c.len() {
            c[m..].iter().fold(T::zero(), |acc, &v| acc + v.abs())
        } else {
            c[c.len() - 1].abs()
        }
    }

    /// Full coefficient series of component `i`.
    #[inline]
    pub fn coefficients(&self, i: usize) -> &[T] {
        &self.coefficients[i]
    }

    /// Active coefficient prefix of component `i`.
    #[inline]
    pub fn truncated_coefficients(&self, i: usize) -> &[T] {
        &self.coefficients[i][..self.truncated[i]]
    }

    /// Shrink each component to the shortest series whose dropped tail sums
    /// to less than `|max_error|`, keeping at least 2 coefficients.
    ///
    /// Always starts from the full series, so a larger bound never yields a
    /// longer series. Components that cannot be truncated stay at full length.
    /// Returns `true` iff every component was truncated.
    pub fn truncate(&mut self, max_error: T) -> bool {
        let e = max_error.abs();
        let mut count = 0;

        for (c, m_out) in self.coefficients.iter().zip(self.truncated.iter_mut()) {
            let mut s = T::zero();
            let mut m = c.len();
            while m > 2 {
                s = s + c[m - 1].abs();
                if s >= e {
                    break;
                }
                m -= 1;
            }
            *m_out = m;
            if m < c.len() {
                count += 1;
            }
        }

        let all = count == self.num_components();
        if !all {
            tracing::debug!(
                "Chebyshev truncation to {} left {} of {} component(s) at full length",
                to_f64(e),
                self.num_components() - count,
                self.num_components()
            );
        }
        all
    }

    /// Value of component `i` at `x`.
    pub fn evaluate_component(&self, x: T, i: usize) -> T {
        self.debug_assert_in_range(x);

        let c = self.truncated_coefficients(i);
        let y0 = cast::<T, _>(2.0) * (x - self.x0) / self.dx;
        let y2 = y0 + y0;
        let mut d0 = T::zero();
        let mut d1 = T::zero();
        for &cj in c[1..].iter().rev() {
            let d = d1;
            d1 = y2 * d1 - d0 + cj;
            d0 = d;
        }
        y0 * d1 - d0 + c[0] * cast(0.5)
    }

    /// Value of every component at `x`.
    pub fn evaluate(&self, x: T) -> Vec<T> {
        (0..self.num_components())
            .map(|i| self.evaluate_component(x, i))
            .collect()
    }

    /// Writes the value of every component at `x` into `out`.
    ///
    /// # Panics
    ///
    /// If `out.len() != self.num_components()`.
    pub fn evaluate_into(&self, x: T, out: &mut [T]) {
        assert_eq!(
            out.len(),
            self.num_components(),
            "output length must equal the number of components"
        );
        for (i, o) in out.iter_mut().enumerate() {
            *o = self.evaluate_component(x, i);
        }
    }

    /// Chebyshev expansion of the derivative, over the full series.
    ///
    /// The result has the same length n; its top coefficient is zero.
    pub fn derivative(&self) -> Self {
        let scale = cast::<T, _>(2.0) / self.dx;
        let coefficients: Vec<Vec<T>> = self
            .coefficients
            .iter()
            .map(|c| {
                let n = c.len();
                let mut d = vec![T::zero(); n];
                d[n - 2] = cast::<T, _>(2 * (n - 1)) * c[n - 1];
                for j in (0..n - 2).rev() {
                    d[j] = d[j + 2] + cast::<T, _>(2 * (j + 1)) * c[j + 1];
                }
                d.iter_mut().for_each(|v| *v = *v * scale);
                d
            })
            .collect();

        self.with_coefficients(coefficients)
    }

    /// Chebyshev expansion of the integral, over the full series.
    ///
    /// The integration constant makes the result vanish at
    /// [`Self::lower_bound`].
    pub fn integral(&self) -> Self {
        let k = self.dx * cast(0.25);
        let coefficients: Vec<Vec<T>> = self
            .coefficients
            .iter()
            .map(|c| {
                let n = c.len();
                let mut ci = vec![T::zero(); n];
                let mut s = T::zero();
                let mut f = T::one();
                for j in 1..n - 1 {
                    ci[j] = k * (c[j - 1] - c[j + 1]) / cast::<T, _>(j);
                    s = s + f * ci[j];
                    f = -f;
                }
                ci[n - 1] = k * c[n - 2] / cast::<T, _>(n - 1);
                s = s + f * ci[n - 1];
                ci[0] = s + s;
                ci
            })
            .collect();

        self.with_coefficients(coefficients)
    }

    fn with_coefficients(&self, coefficients: Vec<Vec<T>>) -> Self {
        Self {
            dx: self.dx,
            x0: self.x0,
            truncated: coefficients.iter().map(Vec::len).collect(),
            coefficients,
        }
    }

    #[inline]
    fn debug_assert_in_range(&self, x: T) {
        if cfg!(debug_assertions) {
            let tolerance = self.dx * cast(1.0e-9);
            debug_assert!(
                x >= self.lower_bound() - tolerance && x <= self.upper_bound() + tolerance,
                "x = {} outside fitted interval [{}, {}]",
                to_f64(x),
                to_f64(self.lower_bound()),
                to_f64(self.upper_bound())
            );
        }
    }
}

/// Width and center of the interval, rejecting widths that vanish next to 1.
fn interval<T: Float>(x1: T, x2: T) -> Result<(T, T), Error> {
    let dx = (x2 - x1).abs();
    if T::one() + dx == T::one() {
        return Err(Error::InsignificantInterval);
    }
    Ok((dx, (x1 + x2) * cast(0.5)))
}

#[inline]
fn to_f64<T: Float>(v: T) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}
