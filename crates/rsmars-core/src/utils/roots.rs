//! Closed-form polynomial root finding.

use crate::errors::{AerosolError, AerosolResult};
use std::f64::consts::PI;

/// Value substituted for negative roots of a cubic with three real roots.
///
/// Large enough that it never wins a "smallest root" comparison against a
/// physically meaningful root.
pub const NEGATIVE_ROOT_SENTINEL: f64 = 1.0e9;

/// Divisors smaller than this are treated as zero by [`solve_cubic`].
const DIVISOR_FLOOR: f64 = 1.0e-30;

/// Roots below this fraction of `|a2|` are recomputed by [`solve_cubic`]
const SMALL_ROOT_RATIO: f64 = 1.0e-6;

/// Real roots of a quadratic, as returned by [`solve_quadratic`].
///
/// Roots may be infinite or NaN when the leading coefficient vanishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticRoots {
    pub roots: [f64; 2],
}

impl QuadraticRoots {
    /// Smallest finite root that is `>= 0`, if any.
    pub fn smallest_non_negative(&self) -> Option<f64> {
        self.roots
            .iter()
            .copied()
            .filter(|r| r.is_finite() && *r >= 0.0)
            .reduce(f64::min)
    }
}

/// Solve `a x^2 + b x + c = 0`.
///
/// Uses the cancellation-free form
///
/// $$q = -\tfrac{1}{2}\left(b + \operatorname{sgn}(b)\sqrt{b^2 - 4ac}\right), \quad x_1 = q/a, \quad x_2 = c/q$$
///
/// Returns `None` when the discriminant is negative (complex roots).
///
/// # Example
/// ```
/// use rsmars_core::utils::roots::solve_quadratic;
///
/// // (x - 1)(x - 4) = x^2 - 5x + 4
/// let roots = solve_quadratic(1.0, -5.0, 4.0).unwrap();
/// assert_eq!(roots.smallest_non_negative(), Some(1.0));
/// ```
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<QuadraticRoots> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sign = if b < 0.0 { -1.0 } else { 1.0 };
    let q = -0.5 * (b + sign * discriminant.sqrt());

    Some(QuadraticRoots {
        roots: [q / a, c / q],
    })
}

/// Real roots of a monic cubic, as returned by [`solve_cubic`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicRoots {
    /// Number of real roots: 1 or 3.
    pub count: usize,
    /// Roots. With three real roots, negative roots are replaced by
    /// [`NEGATIVE_ROOT_SENTINEL`] and the array is sorted ascending. With one
    /// real root only `roots[0]` is meaningful and the rest are zero.
    /// A recovered near-zero root always sits in slot 0.
    pub roots: [f64; 3],
}

impl CubicRoots {
    /// The root in the first slot.
    ///
    /// For three real roots this is the smallest non-negative root (or the
    /// sentinel if all three are negative).
    pub fn smallest(&self) -> f64 {
        self.roots[0]
    }
}

/// Solve `x^3 + a2 x^2 + a1 x + a0 = 0`.
///
/// With
///
/// $$Q = \frac{a_2^2 - 3a_1}{9}, \qquad R = \frac{2a_2^3 - 9a_2a_1 + 27a_0}{54}$$
///
/// three real roots exist when $Q^3 - R^2 \ge 0$ and are found with the
/// trigonometric method. Otherwise the single real root is found with
/// Cardano's radical form.
///
/// Roots much smaller than $|a_2|$ suffer cancellation in $Q^3 - R^2$ and in
/// the final shift by $a_2/3$. The smallest non-negative root is therefore
/// taken from $a_2x^2 + a_1x + a_0 = 0$ whenever that root is below
/// $10^{-6}|a_2|$, then polished with one Newton step on the cubic. A zero
/// constant term gives an exact zero root this way.
///
/// # Errors
///
/// Returns [`AerosolError::DegenerateCubic`] if the divisor of either branch
/// underflows, which happens when $Q$ and $R$ both vanish.
///
/// # Example
/// ```
/// use rsmars_core::utils::roots::solve_cubic;
///
/// // (x - 1)(x - 2)(x - 3)
/// let roots = solve_cubic(-6.0, 11.0, -6.0).unwrap();
/// assert_eq!(roots.count, 3);
/// assert!((roots.smallest() - 1.0).abs() < 1e-10);
/// ```
pub fn solve_cubic(a2: f64, a1: f64, a0: f64) -> AerosolResult<CubicRoots> {
    let q = (a2 * a2 - 3.0 * a1) / 9.0;
    let r = (a2 * (2.0 * a2 * a2 - 9.0 * a1) + 27.0 * a0) / 54.0;
    let q_cubed = q * q * q;
    let r_squared = r * r;
    let shift = a2 / 3.0;

    if q_cubed - r_squared >= 0.0 {
        let sqrt_q = q.sqrt();
        let divisor = sqrt_q * q;
        if divisor < DIVISOR_FLOOR {
            return Err(AerosolError::DegenerateCubic { q, r });
        }

        // Rounding can push the ratio a hair outside [-1, 1]
        let theta = (r / divisor).clamp(-1.0, 1.0).acos();
        let mut roots = [0.0, 2.0 * PI, 4.0 * PI]
            .map(|offset| -2.0 * sqrt_q * ((theta + offset) / 3.0).cos() - shift);

        for root in roots.iter_mut() {
            if *root < 0.0 {
                *root = NEGATIVE_ROOT_SENTINEL;
            }
        }
        roots.sort_by(|a, b| a.total_cmp(b));

        Ok(repair_small_roots(CubicRoots { count: 3, roots }, a2, a1, a0))
    } else {
        let s = (r.abs() + (r_squared - q_cubed).sqrt()).cbrt();
        if s < DIVISOR_FLOOR {
            return Err(AerosolError::DegenerateCubic { q, r });
        }
        let sign = if r < 0.0 { -1.0 } else { 1.0 };
        let root = -sign * (s + q / s) - shift;

        Ok(repair_small_roots(
            CubicRoots {
                count: 1,
                roots: [root, 0.0, 0.0],
            },
            a2,
            a1,
            a0,
        ))
    }
}

/// Replace a near-zero root with the small-root quadratic solution.
///
/// For $|x| \ll |a_2|$ the cubic reduces to $a_2x^2 + a_1x + a_0 = 0$, which
/// has no cancellation problem there. The closed form can lose such a root
/// entirely or return rounding noise in its place.
fn repair_small_roots(found: CubicRoots, a2: f64, a1: f64, a0: f64) -> CubicRoots {
    let limit = SMALL_ROOT_RATIO * a2.abs();
    let Some(small) = solve_quadratic(a2, a1, a0)
        .and_then(|roots| roots.smallest_non_negative())
        .filter(|root| *root <= limit)
    else {
        return found;
    };
    let small = newton_step(small, a2, a1, a0);
    let [first, second, _] = found.roots;

    if found.count == 3 {
        let roots = if first <= limit {
            [small, second, found.roots[2]]
        } else {
            // The lost root was replaced by the sentinel in the last slot
            [small, first, second]
        };
        return CubicRoots { count: 3, roots };
    }

    if first.abs() <= limit {
        return CubicRoots {
            count: 1,
            roots: [small, 0.0, 0.0],
        };
    }
    let mut roots = [
        small,
        if first >= 0.0 {
            first
        } else {
            NEGATIVE_ROOT_SENTINEL
        },
        NEGATIVE_ROOT_SENTINEL,
    ];
    roots.sort_by(|a, b| a.total_cmp(b));
    CubicRoots { count: 3, roots }
}

/// One Newton step on the monic cubic, kept only if it stays non-negative
fn newton_step(x: f64, a2: f64, a1: f64, a0: f64) -> f64 {
    let value = ((x + a2) * x + a1) * x + a0;
    let slope = (3.0 * x + 2.0 * a2) * x + a1;
    if slope == 0.0 {
        return x;
    }
    let polished = x - value / slope;
    if polished.is_finite() && polished >= 0.0 {
        polished
    } else {
        x
    }
}
