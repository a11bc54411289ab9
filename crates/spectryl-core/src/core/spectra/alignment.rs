//! Alignment of two spectra sharing a physical axis, typically a calculated
//! spectrum against an experimental one.
//!
//! All functions are pure and operate on raw abscissa/value slices, so they
//! apply equally to synthesized, averaged, and externally supplied spectra.

/// Shift, in data points, that best aligns `b` to `a`.
///
/// The returned lag maximizes the cross-correlation of the two signals: a
/// positive lag means `b`'s features sit at lower indices than `a`'s and `b`
/// should move toward higher indices. Ties resolve to the smallest lag.
pub fn idx_offset(a: &[f64], b: &[f64]) -> isize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut best_lag = -(b.len() as isize - 1);
    let mut best = f64::NEG_INFINITY;
    for lag in -(b.len() as isize - 1)..=(a.len() as isize - 1) {
        let mut correlation = 0.0;
        for (j, &value) in b.iter().enumerate() {
            let i = lag + j as isize;
            if i >= 0 && (i as usize) < a.len() {
                correlation += a[i as usize] * value;
            }
        }
        if correlation > best {
            best = correlation;
            best_lag = lag;
        }
    }
    best_lag
}

/// Resamples two spectra onto a shared abscissa.
///
/// The spectrum with the denser sampling keeps its abscissa; the other is
/// linearly interpolated onto it, clamped at its own edges. Returns the
/// `(abscissa, values)` pairs for `a` and `b` in order.
#[allow(clippy::type_complexity)]
pub fn unify_abscissa(
    ax: &[f64],
    ay: &[f64],
    bx: &[f64],
    by: &[f64],
) -> ((Vec<f64>, Vec<f64>), (Vec<f64>, Vec<f64>)) {
    if ax.is_empty() || bx.is_empty() {
        return ((ax.to_vec(), ay.to_vec()), (bx.to_vec(), by.to_vec()));
    }
    if mean_step(ax) <= mean_step(bx) {
        let by_resampled = interpolate(bx, by, ax);
        ((ax.to_vec(), ay.to_vec()), (ax.to_vec(), by_resampled))
    } else {
        let ay_resampled = interpolate(ax, ay, bx);
        ((bx.to_vec(), ay_resampled), (bx.to_vec(), by.to_vec()))
    }
}

/// Offset, in abscissa units, to add to `b`'s abscissa so its features align
/// with `a`'s.
///
/// The spectra are first unified onto a shared abscissa, then the best
/// point-shift is converted back to abscissa units using the shared step.
pub fn find_offset(ax: &[f64], ay: &[f64], bx: &[f64], by: &[f64]) -> f64 {
    let ((unified_x, unified_ay), (_, unified_by)) = unify_abscissa(ax, ay, bx, by);
    let lag = idx_offset(&unified_ay, &unified_by);
    lag as f64 * mean_step_or_zero(&unified_x)
}

/// Factor by which `b`'s values should be multiplied to best match the
/// magnitude of `a`, from the ratio of absolute peak intensities.
///
/// Returns 1.0 when `b` carries no signal to scale.
pub fn find_scaling(a: &[f64], b: &[f64]) -> f64 {
    let peak = |values: &[f64]| values.iter().fold(0.0_f64, |max, &v| max.max(v.abs()));
    let peak_b = peak(b);
    if peak_b == 0.0 {
        return 1.0;
    }
    peak(a) / peak_b
}

/// Linear interpolation of `(x, y)` samples at every point of `onto`,
/// clamped to the edge values outside the sampled range. `x` must ascend.
fn interpolate(x: &[f64], y: &[f64], onto: &[f64]) -> Vec<f64> {
    onto.iter()
        .map(|&target| {
            if target <= x[0] {
                return y[0];
            }
            let last = x.len() - 1;
            if target >= x[last] {
                return y[last];
            }
            let upper = x.partition_point(|&sample| sample < target);
            let (x0, x1) = (x[upper - 1], x[upper]);
            let (y0, y1) = (y[upper - 1], y[upper]);
            y0 + (y1 - y0) * (target - x0) / (x1 - x0)
        })
        .collect()
}

/// Mean sampling step of an ascending abscissa; infinite for fewer than two
/// points so the other spectrum's abscissa wins in [`unify_abscissa`].
fn mean_step(x: &[f64]) -> f64 {
    if x.len() < 2 {
        return f64::INFINITY;
    }
    (x[x.len() - 1] - x[0]) / (x.len() - 1) as f64
}

fn mean_step_or_zero(x: &[f64]) -> f64 {
    if x.len() < 2 {
        return 0.0;
    }
    (x[x.len() - 1] - x[0]) / (x.len() - 1) as f64
}
