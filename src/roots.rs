//! Sign-change bracketing and bisection on scalar functions of time.
//!
//! The contact solver walks a metric function across the search window at a
//! fixed step, collects every sub-interval whose endpoint values straddle
//! zero, and refines each one by bisection. Non-finite samples never take
//! part in a bracket; a bracket whose refinement hits a non-finite midpoint
//! is dropped rather than reported.

/// Maximum bisection iterations when the caller does not override it.
pub(crate) const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// A sub-interval `[a, b]` with `f(a)·f(b) <= 0`, containing at least one
/// root of the sampled function.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bracket {
    pub a: f64,
    pub b: f64,
    pub fa: f64,
    pub fb: f64,
}

/// A refined root location.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RootResult {
    /// Root abscissa, in the same units as the bracket endpoints.
    pub t_hours: f64,
    /// Whether the tolerance was reached (or an endpoint/midpoint was an
    /// exact zero) before the iteration cap.
    pub converged: bool,
    /// Number of bisection steps taken.
    #[allow(dead_code)]
    pub iterations: u32,
}

/// Scans `f` over `[a, b]` at step `h` and returns every bracketing
/// sub-interval, in ascending order.
///
/// Samples are taken at `a, a+h, a+2h, …` until the last sample reaches `b`
/// (up to a small numerical slack). A strict sign change between two finite
/// consecutive samples yields a bracket bounded by those samples. A sample
/// that is exactly zero yields a degenerate bracket of width `h` centered on
/// it, with `f` evaluated at the micro-interval endpoints. Pairs containing a
/// non-finite sample are skipped silently.
pub(crate) fn bracket_roots<F: FnMut(f64) -> f64>(mut f: F, a: f64, b: f64, h: f64) -> Vec<Bracket> {
    let mut brackets = Vec::new();
    if !(h > 0.0) || !a.is_finite() || !b.is_finite() || b < a {
        return brackets;
    }
    let slack = h * 1e-6;

    let mut previous_t = a;
    let mut previous_f = f(a);
    if previous_f == 0.0 {
        brackets.push(degenerate_bracket(&mut f, a, h));
    }

    let mut step = 1u64;
    loop {
        let t = a + step as f64 * h;
        let ft = f(t);
        if previous_f.is_finite() && ft.is_finite() {
            if ft == 0.0 {
                brackets.push(degenerate_bracket(&mut f, t, h));
            } else if previous_f != 0.0 && (previous_f > 0.0) != (ft > 0.0) {
                brackets.push(Bracket {
                    a: previous_t,
                    b: t,
                    fa: previous_f,
                    fb: ft,
                });
            }
        }
        previous_t = t;
        previous_f = ft;
        if t >= b - slack {
            break;
        }
        step += 1;
    }
    brackets
}

/// Width-`h` micro-interval around a sample where `f` is exactly zero.
fn degenerate_bracket<F: FnMut(f64) -> f64>(f: &mut F, t: f64, h: f64) -> Bracket {
    let a = t - 0.5 * h;
    let b = t + 0.5 * h;
    Bracket { a, b, fa: f(a), fb: f(b) }
}

/// Refines a bracket by bisection down to an absolute tolerance `tol`.
///
/// Returns `None` when the endpoints do not straddle zero, when an endpoint
/// value is non-finite, or when a midpoint evaluation turns non-finite. An
/// endpoint that is exactly zero is returned immediately with zero
/// iterations. If the tolerance is not reached within `max_iterations`, the
/// midpoint of the final interval is returned with `converged = false`.
pub(crate) fn bisect<F: FnMut(f64) -> f64>(
    mut f: F,
    bracket: Bracket,
    tol: f64,
    max_iterations: u32,
) -> Option<RootResult> {
    let Bracket { mut a, mut b, fa, fb } = bracket;
    if !fa.is_finite() || !fb.is_finite() {
        return None;
    }
    if fa == 0.0 {
        return Some(RootResult { t_hours: a, converged: true, iterations: 0 });
    }
    if fb == 0.0 {
        return Some(RootResult { t_hours: b, converged: true, iterations: 0 });
    }
    if (fa > 0.0) == (fb > 0.0) {
        return None;
    }

    let mut fa = fa;
    for iteration in 1..=max_iterations {
        let midpoint = 0.5 * (a + b);
        let fm = f(midpoint);
        if !fm.is_finite() {
            return None;
        }
        if fm == 0.0 {
            return Some(RootResult { t_hours: midpoint, converged: true, iterations: iteration });
        }
        if (fm > 0.0) == (fa > 0.0) {
            a = midpoint;
            fa = fm;
        } else {
            b = midpoint;
        }
        if b - a <= tol {
            return Some(RootResult {
                t_hours: 0.5 * (a + b),
                converged: true,
                iterations: iteration,
            });
        }
    }
    Some(RootResult {
        t_hours: 0.5 * (a + b),
        converged: false,
        iterations: max_iterations,
    })
}
