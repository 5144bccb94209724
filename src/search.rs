use tracing::{debug, trace};

use crate::equation::Equation;
use crate::errors::SearchDomainError;

/// Lower bound of the default search domain.
pub const DEFAULT_MIN: f64 = -100.0;
/// Upper bound of the default search domain.
pub const DEFAULT_MAX: f64 = 100.0;
/// Distance between neighbouring samples of the default search domain.
pub const DEFAULT_STEP: f64 = 0.1;
/// Largest difference from the target still counted as an exact match.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Values probed when visualizing a search.
pub const PROBE_POINTS: [f64; 7] = [-10.0, -5.0, 0.0, 5.0, 10.0, 15.0, 20.0];
/// Largest distance from the target at which a probe counts as exact.
pub const PROBE_TOLERANCE: f64 = 1e-4;

/// Most samples a search domain may hold, keeping every scan bounded.
pub const MAX_SAMPLES: usize = 10_000_000;

// Slack when counting how many steps fit between the bounds, so that
// 200 / 0.1 counts as 2000 steps rather than 1999.999...
const GRID_SLACK: f64 = 1e-9;

/// Rounds `value` to `places` decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64
{
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Whole steps that fit between `min` and `max`.
fn step_count(min: f64, max: f64, step: f64) -> f64
{
    ((max - min) / step + GRID_SLACK).floor()
}

/// The bounded, evenly-spaced set of samples a search walks through, along
/// with the tolerance for an exact match.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchDomain
{
    min: f64,
    max: f64,
    step: f64,
    tolerance: f64,
}

impl Default for SearchDomain
{
    /// `[-100, 100]` in steps of `0.1`, matching within `1e-6`.
    fn default() -> Self
    {
        SearchDomain
        {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            step: DEFAULT_STEP,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SearchDomain
{
    /// Builds a search domain, rejecting bounds or steps that would not
    /// describe a finite, ascending scan of at most `MAX_SAMPLES` samples.
    ///
    /// # Example
    /// ```
    /// use searchcalc::search::SearchDomain;
    ///
    /// let domain = SearchDomain::new(0.0, 1.0, 0.25, 1e-9).unwrap();
    /// assert_eq!(domain.samples().collect::<Vec<f64>>(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    ///
    /// assert!(SearchDomain::new(1.0, 0.0, 0.25, 1e-9).is_err());
    /// ```
    pub fn new(min: f64, max: f64, step: f64, tolerance: f64) -> Result<SearchDomain, SearchDomainError>
    {
        if !min.is_finite() || !max.is_finite()
        {
            return Err(SearchDomainError::NonFiniteBounds);
        }
        if min > max
        {
            return Err(SearchDomainError::InvertedBounds { min, max });
        }
        if !(step > 0.0 && step.is_finite())
        {
            return Err(SearchDomainError::NonPositiveStep(step));
        }
        if !(tolerance >= 0.0)
        {
            return Err(SearchDomainError::NegativeTolerance(tolerance));
        }

        // max - min overflows to infinity for bounds near f64::MAX
        let steps = step_count(min, max, step);
        if !steps.is_finite() || steps >= MAX_SAMPLES as f64
        {
            return Err(SearchDomainError::TooManySamples { max_samples: MAX_SAMPLES });
        }

        Ok(SearchDomain { min, max, step, tolerance })
    }

    pub fn min(&self) -> f64
    {
        self.min
    }

    pub fn max(&self) -> f64
    {
        self.max
    }

    pub fn step(&self) -> f64
    {
        self.step
    }

    pub fn tolerance(&self) -> f64
    {
        self.tolerance
    }

    /// The number of samples in the domain, both bounds included.
    pub fn sample_count(&self) -> usize
    {
        step_count(self.min, self.max, self.step) as usize + 1
    }

    /// Yields every sample in ascending order. Each sample is computed from
    /// its index rather than by repeated addition, then rounded to 10 decimal
    /// places so that e.g. `-100 + 1050 * 0.1` lands exactly on `5.0`.
    pub fn samples(&self) -> impl Iterator<Item = f64>
    {
        let SearchDomain { min, step, .. } = *self;
        (0..self.sample_count()).map(move |i| round_to(min + i as f64 * step, 10))
    }
}

/// Walks every sample of `domain` in ascending order looking for an `x`
/// where `f(x)` equals `target`.
///
/// Returns the first sample whose result is within the domain's tolerance
/// of `target`. Failing that, returns the sample whose result came closest,
/// the smallest such sample winning ties. Samples where `f` fails or returns
/// a non-finite value are skipped, so `None` means no sample was usable.
/// The returned value is rounded to 6 decimal places.
///
/// # Example
/// ```
/// use searchcalc::search::{linear_search, SearchDomain};
///
/// fn square(x: f64) -> Result<f64, std::convert::Infallible>
/// {
///     Ok(x * x)
/// }
///
/// let x = linear_search(square, 2.25, &SearchDomain::default()).unwrap();
///
/// assert_eq!(x, -1.5); // first exact match in ascending order
/// ```
pub fn linear_search<E>(f: impl Fn(f64) -> Result<f64, E>, target: f64, domain: &SearchDomain) -> Option<f64>
where E: std::fmt::Display
{
    let mut best: Option<(f64, f64)> = None; // (sample, difference)

    for x in domain.samples()
    {
        let result = match f(x)
        {
            Ok(y) if y.is_finite() => y,
            Ok(y) => {
                trace!(x, y, "skipping sample with non-finite result");
                continue;
            },
            Err(e) => {
                trace!(x, error = %e, "skipping undefined sample");
                continue;
            },
        };

        let difference = (result - target).abs();
        if difference < domain.tolerance
        {
            debug!(x, result, "found exact match");
            return Some(round_to(x, 6));
        }

        // Strictly smaller, so the earliest sample keeps a tie
        let improves = match best
        {
            Some((_, best_difference)) => difference < best_difference,
            None => difference.is_finite(),
        };
        if improves
        {
            best = Some((x, difference));
        }
    }

    match best
    {
        Some((x, difference)) => {
            debug!(x, difference, "no exact match, returning closest sample");
            Some(round_to(x, 6))
        },
        None => {
            debug!("every sample was skipped");
            None
        },
    }
}

/// Searches `domain` for the value of the unknown in `equation`.
///
/// # Example
/// ```
/// use searchcalc::equation::{Equation, Side};
/// use searchcalc::operator::Operator;
/// use searchcalc::search::{solve_within, SearchDomain};
///
/// // 20 / x = 4, searching only the positive integers up to 10
/// let eqn = Equation::new(4.0, Operator::Div, 20.0, Side::Right);
/// let domain = SearchDomain::new(1.0, 10.0, 1.0, 1e-6).unwrap();
///
/// assert_eq!(solve_within(&eqn, &domain), Some(5.0));
/// ```
pub fn solve_within(equation: &Equation, domain: &SearchDomain) -> Option<f64>
{
    debug!(%equation, "searching for unknown");
    linear_search(|x| equation.evaluate_at(x), equation.target, domain)
}

/// The outcome of trying a single value of the unknown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probe
{
    pub x: f64,
    /// `None` when the equation is undefined at `x`.
    pub result: Option<f64>,
    /// Absolute distance between `result` and the target.
    pub distance: Option<f64>,
}

impl Probe
{
    pub fn is_exact(&self) -> bool
    {
        matches!(self.distance, Some(d) if d < PROBE_TOLERANCE)
    }
}

/// Tries each of `PROBE_POINTS` in `equation`, for showing how a search
/// homes in on the answer.
pub fn probe(equation: &Equation) -> Vec<Probe>
{
    PROBE_POINTS
        .iter()
        .map(|&x| {
            let result = equation.evaluate_at(x).ok();
            Probe
            {
                x,
                result,
                distance: result.map(|y| (y - equation.target).abs()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::equation::Side;
    use crate::operator::Operator;

    #[test]
    fn default_domain_has_2001_samples()
    {
        let domain = SearchDomain::default();
        let samples: Vec<f64> = domain.samples().collect();

        assert_eq!(domain.sample_count(), 2001);
        assert_eq!(samples.len(), 2001);
        assert_eq!(samples[0], -100.0);
        assert_eq!(samples[1000], 0.0);
        assert_eq!(samples[1050], 5.0);
        assert_eq!(samples[2000], 100.0);
        assert!(samples.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn samples_are_rounded_to_grid_points()
    {
        let samples: Vec<f64> = SearchDomain::default().samples().collect();

        assert_eq!(samples[999], -0.1);
        assert_eq!(samples[1001], 0.1);
        assert_eq!(samples[1003], 0.3);
    }

    #[test]
    fn single_point_domain()
    {
        let domain = SearchDomain::new(2.0, 2.0, 0.5, 0.0).unwrap();
        assert_eq!(domain.samples().collect::<Vec<f64>>(), vec![2.0]);
    }

    #[test]
    fn rejects_bad_domains()
    {
        assert_eq!(SearchDomain::new(f64::NEG_INFINITY, 0.0, 1.0, 0.0), Err(SearchDomainError::NonFiniteBounds));
        assert_eq!(SearchDomain::new(0.0, f64::NAN, 1.0, 0.0), Err(SearchDomainError::NonFiniteBounds));
        assert_eq!(SearchDomain::new(1.0, 0.0, 1.0, 0.0), Err(SearchDomainError::InvertedBounds { min: 1.0, max: 0.0 }));
        assert_eq!(SearchDomain::new(0.0, 1.0, 0.0, 0.0), Err(SearchDomainError::NonPositiveStep(0.0)));
        assert_eq!(SearchDomain::new(0.0, 1.0, -0.1, 0.0), Err(SearchDomainError::NonPositiveStep(-0.1)));
        assert_eq!(SearchDomain::new(0.0, 1.0, 0.1, -1e-6), Err(SearchDomainError::NegativeTolerance(-1e-6)));

        let too_many = Err(SearchDomainError::TooManySamples { max_samples: MAX_SAMPLES });
        assert_eq!(SearchDomain::new(-100.0, 100.0, 1e-300, 1e-6), too_many);
        assert_eq!(SearchDomain::new(-f64::MAX, f64::MAX, 1.0, 1e-6), too_many);
        assert_eq!(SearchDomain::new(-100.0, 100.0, 1e-9, 1e-6), too_many);
    }

    #[test]
    fn largest_allowed_domain()
    {
        let domain = SearchDomain::new(0.0, (MAX_SAMPLES - 1) as f64, 1.0, 0.0).unwrap();
        assert_eq!(domain.sample_count(), MAX_SAMPLES);

        let too_many = SearchDomain::new(0.0, MAX_SAMPLES as f64, 1.0, 0.0);
        assert_eq!(too_many, Err(SearchDomainError::TooManySamples { max_samples: MAX_SAMPLES }));
    }

    #[test]
    fn skips_the_zero_divisor()
    {
        // 1 / x = 1e9 has its closest grid sample next to the singularity
        let eqn = Equation::new(1e9, Operator::Div, 1.0, Side::Right);
        assert_eq!(eqn.solve(), Some(0.1));

        let eqn = Equation::new(-1e9, Operator::Div, 1.0, Side::Right);
        assert_eq!(eqn.solve(), Some(-0.1));
    }

    #[test]
    fn returns_none_when_every_sample_is_undefined()
    {
        let eqn = Equation::new(1.0, Operator::Div, 0.0, Side::Left);
        assert_eq!(eqn.solve(), None);
    }

    #[test]
    fn skips_non_finite_results()
    {
        // Negative bases with a fractional power are NaN; only x >= 0 is usable
        let eqn = Equation::new(-4.0, Operator::Exp, 0.5, Side::Left);
        assert_eq!(eqn.solve(), Some(0.0));
    }

    #[test]
    fn ties_go_to_the_smaller_sample()
    {
        // Every sample of x ^ 2 over {-1, 0, 1} is 0.5 away from 0.5
        let domain = SearchDomain::new(-1.0, 1.0, 1.0, 1e-6).unwrap();
        let eqn = Equation::new(0.5, Operator::Exp, 2.0, Side::Left);
        assert_eq!(solve_within(&eqn, &domain), Some(-1.0));

        // -0.1 and 0.1 are equally close to the root of x ^ 2 = 0.015
        let eqn = Equation::new(0.015, Operator::Exp, 2.0, Side::Left);
        assert_eq!(eqn.solve(), Some(-0.1));
    }

    #[test]
    fn first_exact_match_wins()
    {
        let eqn = Equation::new(49.0, Operator::Exp, 2.0, Side::Left);
        assert_eq!(eqn.solve(), Some(-7.0));
    }

    #[test]
    fn unreachable_targets_clamp_to_the_boundary()
    {
        let eqn = Equation::new(1.0, Operator::Plus, 1000.0, Side::Left);
        assert_eq!(eqn.solve(), Some(-100.0));

        let eqn = Equation::new(1000.0, Operator::Plus, 1.0, Side::Left);
        assert_eq!(eqn.solve(), Some(100.0));
    }

    #[test]
    fn non_finite_target_has_no_candidate()
    {
        let eqn = Equation::new(f64::NAN, Operator::Plus, 1.0, Side::Left);
        assert_eq!(eqn.solve(), None);
    }

    #[test]
    fn probes_the_fixed_points()
    {
        let eqn = Equation::new(12.0, Operator::Plus, 5.0, Side::Left);
        let probes = probe(&eqn);

        assert_eq!(probes.len(), PROBE_POINTS.len());
        assert_eq!(probes[0], Probe { x: -10.0, result: Some(-5.0), distance: Some(17.0) });
        assert!(probes.iter().all(|p| !p.is_exact()));

        let eqn = Equation::new(4.0, Operator::Div, 20.0, Side::Right);
        let probes = probe(&eqn);

        assert_eq!(probes[2], Probe { x: 0.0, result: None, distance: None });
        assert!(probes[3].is_exact());
        assert_eq!(probes.iter().filter(|p| p.is_exact()).count(), 1);
    }
}
