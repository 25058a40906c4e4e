//! Rousseeuw-Croux Sn and Qn scale estimators.
//!
//! ```text
//! Sn = cn * lomed_i himed_j |x_i - x_j|
//! Qn = dn * { |x_i - x_j| : i < j }_(k),   k = C(n/2 + 1, 2)
//! ```
//!
//! Both run in O(n log n) time with O(n) scratch space. `cn` and `dn` are the
//! finite-sample correction factors; the asymptotic consistency constants
//! (1.1926 for Sn, 2.2219 for Qn) are not applied.
//!
//! Reference: P.J. Rousseeuw and C. Croux (1993), Alternatives to the Median
//! Absolute Deviation, JASA 88, pp. 1273-1283.

/// Finite-sample correction for Sn.
fn sn_correction(n: usize) -> f64 {
    match n {
        2 => 0.743,
        3 => 1.851,
        4 => 0.954,
        5 => 1.351,
        6 => 0.993,
        7 => 1.198,
        8 => 1.005,
        9 => 1.131,
        _ if n & 1 == 1 => n as f64 / (n as f64 - 0.9),
        _ => 1.0,
    }
}

/// Finite-sample correction for Qn.
fn qn_correction(n: usize) -> f64 {
    match n {
        2 => 0.399,
        3 => 0.994,
        4 => 0.512,
        5 => 0.844,
        6 => 0.611,
        7 => 0.857,
        8 => 0.669,
        9 => 0.872,
        _ if n & 1 == 1 => n as f64 / (n as f64 + 1.4),
        _ => n as f64 / (n as f64 + 3.8),
    }
}

#[inline]
fn select_mut(values: &mut [f64], index: usize) -> f64 {
    *values.select_nth_unstable_by(index, f64::total_cmp).1
}

/// Sn estimator of `values`, 0 for fewer than two samples.
pub fn sn(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    sn_sorted(&sorted)
}

/// Sn of ascending `x`.
///
/// For every `i` finds the high median of `|x_i - x_j|` by a binary search over
/// the two sorted runs of distances to the left and right of `x_i`, then takes
/// the low median of those.
fn sn_sorted(x: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 {
        return 0.0;
    }

    // Rank arithmetic below is 1-based.
    let at = |k: usize| x[k - 1];
    let nh = (n + 1) / 2;
    let mut a2 = vec![0.0; n];

    a2[0] = at(n / 2 + 1) - at(1);

    // Lower half: the shorter run (A) lies to the left of x_i.
    for i in 2..=nh {
        let na = i - 1;
        let nb = n - i;
        let diff = nb - na;
        let a_min = diff / 2 + 1;
        let a_max = diff / 2 + na;
        let med_a = |a: usize| at(i) - at(i + a_min - 1 - a);
        let med_b = |b: usize| at(i + b) - at(i);

        let (left_a, left_b) = binary_merge_search(nb, a_min, a_max, med_a, med_b);
        a2[i - 1] = if left_a > a_max {
            med_b(left_b)
        } else {
            med_a(left_a).min(med_b(left_b))
        };
    }

    // Upper half: the shorter run (A) lies to the right of x_i.
    for i in nh + 1..n {
        let na = n - i;
        let nb = i - 1;
        let diff = nb - na;
        let a_min = diff / 2 + 1;
        let a_max = diff / 2 + na;
        let med_a = |a: usize| at(i + a + 1 - a_min) - at(i);
        let med_b = |b: usize| at(i) - at(i - b);

        let (left_a, left_b) = binary_merge_search(nb, a_min, a_max, med_a, med_b);
        a2[i - 1] = if left_a > a_max {
            med_b(left_b)
        } else {
            med_a(left_a).min(med_b(left_b))
        };
    }

    a2[n - 1] = at(n) - at(nh);

    sn_correction(n) * select_mut(&mut a2, nh - 1)
}

/// Halving search for the median of two ascending runs, the shorter one (A)
/// padded into `[a_min, a_max]` of a run as long as B (`len`).
///
/// Returns the final `(left_a, left_b)` cursors.
fn binary_merge_search(
    len: usize,
    a_min: usize,
    a_max: usize,
    med_a: impl Fn(usize) -> f64,
    med_b: impl Fn(usize) -> f64,
) -> (usize, usize) {
    let mut left_a = 1;
    let mut left_b = 1;
    let mut right_a = len;

    while left_a < right_a {
        let length = right_a - left_a + 1;
        let even = 1 - (length & 1);
        let half = (length - 1) / 2;
        let try_a = left_a + half;
        let try_b = left_b + half;

        if try_a < a_min {
            left_a = try_a + even;
        } else if try_a > a_max || med_a(try_a) >= med_b(try_b) {
            right_a = try_a;
            left_b = try_b + even;
        } else {
            left_a = try_a + even;
        }
    }

    (left_a, left_b)
}

/// Qn estimator of `values`, 0 for fewer than two samples.
pub fn qn(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let mut y = values.to_vec();
    y.sort_unstable_by(f64::total_cmp);
    qn_correction(n) * qn_raw(&y)
}

/// k-th smallest pairwise distance of ascending `y`, k = C(n/2 + 1, 2).
///
/// Works on the implicit n x n matrix whose row `i` holds `y_i - y_(n+1-j)`,
/// ascending in `j`. `left[i]..=right[i]` bounds the surviving candidates of
/// row `i`; each round discards whole row segments on one side of a weighted
/// high median of the row midpoints.
fn qn_raw(y: &[f64]) -> f64 {
    let n = y.len();
    // Row, column and rank arithmetic below is 1-based.
    let at = |k: usize| y[k - 1];
    let cell = |i: usize, j: usize| at(i) - at(n + 1 - j);

    let h = n / 2 + 1;
    let k = h * (h - 1) / 2;

    let mut left: Vec<usize> = (1..=n).map(|i| n + 2 - i).collect();
    let mut right = vec![n; n];
    let mut p = vec![0usize; n];
    let mut q = vec![0usize; n];
    let mut work = Vec::with_capacity(n);
    let mut weight = Vec::with_capacity(n);

    let mut n_left = n * (n + 1) / 2;
    let mut n_right = n * n;
    let k_new = k + n_left;

    while n_right - n_left > n {
        work.clear();
        weight.clear();
        for i in 2..=n {
            let (l, r) = (left[i - 1], right[i - 1]);
            if l <= r {
                let w = r - l + 1;
                weight.push(w);
                work.push(cell(i, l + w / 2));
            }
        }
        let trial = weighted_high_median(&mut work, &mut weight);

        // p[i]: entries of row i below trial.
        let mut j = 0;
        for i in (1..=n).rev() {
            while j < n && at(i) - at(n - j) < trial {
                j += 1;
            }
            p[i - 1] = j;
        }

        // q[i] - 1: entries of row i not above trial.
        let mut j = n + 1;
        for i in 1..=n {
            while at(i) - at(n + 2 - j) > trial {
                j -= 1;
            }
            q[i - 1] = j;
        }

        let sum_p: usize = p.iter().sum();
        let sum_q: usize = q.iter().map(|&v| v - 1).sum();

        if k_new <= sum_p {
            right.copy_from_slice(&p);
            n_right = sum_p;
        } else if k_new > sum_q {
            left.copy_from_slice(&q);
            n_left = sum_q;
        } else {
            return trial;
        }
    }

    work.clear();
    for i in 2..=n {
        for j in left[i - 1]..=right[i - 1] {
            work.push(cell(i, j));
        }
    }
    select_mut(&mut work, k_new - n_left - 1)
}

/// Smallest `a[j]` such that the weights of all `a[i] <= a[j]` sum to more
/// than half the total weight. Reorders both slices.
fn weighted_high_median(a: &mut [f64], weights: &mut [usize]) -> f64 {
    debug_assert_eq!(a.len(), weights.len());
    debug_assert!(!a.is_empty());

    let w_total: usize = weights.iter().sum();
    let mut len = a.len();
    // Weight of candidates already discarded below and above the search range.
    let mut w_below = 0;
    let mut w_above = 0;
    let mut candidates: Vec<(f64, usize)> = Vec::with_capacity(len);

    loop {
        let mut scratch = a[..len].to_vec();
        let trial = select_mut(&mut scratch, len / 2);

        let mut w_left = 0;
        let mut w_mid = 0;
        let mut w_right = 0;
        for (&v, &w) in a[..len].iter().zip(&weights[..len]) {
            if v < trial {
                w_left += w;
            } else if v > trial {
                w_right += w;
            } else {
                w_mid += w;
            }
        }
        debug_assert_eq!(w_below + w_left + w_mid + w_right + w_above, w_total);

        candidates.clear();
        if 2 * (w_below + w_left) > w_total {
            candidates.extend(
                a[..len]
                    .iter()
                    .zip(&weights[..len])
                    .filter(|(&v, _)| v < trial)
                    .map(|(&v, &w)| (v, w)),
            );
            w_above += w_mid + w_right;
        } else {
            if 2 * (w_below + w_left + w_mid) > w_total {
                return trial;
            }
            candidates.extend(
                a[..len]
                    .iter()
                    .zip(&weights[..len])
                    .filter(|(&v, _)| v > trial)
                    .map(|(&v, &w)| (v, w)),
            );
            w_below += w_left + w_mid;
        }

        len = candidates.len();
        for (k, &(v, w)) in candidates.iter().enumerate() {
            a[k] = v;
            weights[k] = w;
        }
    }
}
