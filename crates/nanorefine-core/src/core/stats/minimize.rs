use super::StatsError;

/// Settings for [`minimize_scalar`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizeSettings {
    /// Length of each bracketing step.
    pub step: f64,
    /// Upper limit on bracketing steps before giving up.
    pub max_steps: usize,
    /// Bracket width at which golden-section refinement stops.
    pub tolerance: f64,
}

impl MinimizeSettings {
    pub fn with_step(step: f64) -> Self {
        Self {
            step,
            max_steps: 20_000,
            tolerance: 1e-10,
        }
    }
}

/// Result of a local minimisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    pub x: f64,
    pub value: f64,
    /// Bracketing steps plus refinement iterations.
    pub iterations: usize,
    /// The search stopped on the upper bound.
    pub hit_bound: bool,
    /// False when the step budget ran out before a bracket was found.
    pub converged: bool,
}

const INV_PHI: f64 = 0.618_033_988_749_894_8;
const MAX_REFINEMENTS: usize = 200;

/// Finds the local minimum of `f` reached by walking downhill from `x0`.
///
/// The walk direction is taken from the sign of `df(x0)`. Fixed steps are taken while `f`
/// decreases; the bracket around the last improving point is then narrowed by golden-section
/// search. With an `upper` bound the walk never moves above it, and a minimum seeded on the bound
/// with a downhill direction pointing upwards returns the seed itself.
///
/// The result depends only on the inputs, so repeated runs from the same seed agree.
pub fn minimize_scalar<F, D>(
    f: F,
    df: D,
    x0: f64,
    upper: Option<f64>,
    settings: &MinimizeSettings,
) -> Result<Minimum, StatsError>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    if !(settings.step.is_finite() && settings.step > 0.0) {
        return Err(StatsError::InvalidStep(settings.step));
    }

    let f0 = f(x0);
    let slope = df(x0);
    let at_seed = |hit_bound| Minimum {
        x: x0,
        value: f0,
        iterations: 0,
        hit_bound,
        converged: true,
    };

    if slope == 0.0 || !slope.is_finite() {
        return Ok(at_seed(false));
    }
    let direction = -slope.signum();
    if direction > 0.0 && upper.is_some_and(|u| x0 >= u) {
        return Ok(at_seed(true));
    }

    let mut previous = x0;
    let mut current = x0;
    let mut f_current = f0;
    let mut steps = 0;

    let beyond = loop {
        if steps == settings.max_steps {
            return Ok(Minimum {
                x: current,
                value: f_current,
                iterations: steps,
                hit_bound: false,
                converged: false,
            });
        }
        steps += 1;

        let mut next = current + direction * settings.step;
        if let Some(u) = upper {
            if next >= u {
                next = u;
            }
        }
        let f_next = f(next);
        if f_next < f_current {
            if upper.is_some_and(|u| next >= u) {
                return Ok(Minimum {
                    x: next,
                    value: f_next,
                    iterations: steps,
                    hit_bound: true,
                    converged: true,
                });
            }
            previous = current;
            current = next;
            f_current = f_next;
        } else {
            break next;
        }
    };

    let (mut a, mut b) = if previous < beyond {
        (previous, beyond)
    } else {
        (beyond, previous)
    };
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut fc = f(c);
    let mut fd = f(d);
    let mut refinements = 0;
    while (b - a).abs() > settings.tolerance && refinements < MAX_REFINEMENTS {
        refinements += 1;
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INV_PHI * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INV_PHI * (b - a);
            fd = f(d);
        }
    }

    let (x, value) = if fc < fd { (c, fc) } else { (d, fd) };
    let (x, value) = if value <= f_current {
        (x, value)
    } else {
        (current, f_current)
    };

    Ok(Minimum {
        x,
        value,
        iterations: steps + refinements,
        hit_bound: false,
        converged: true,
    })
}
