use super::StatsError;
use super::summary::sample_std_dev;
use std::f64::consts::PI;

/// Relative spread below which a sample is treated as having no variance at all.
const ZERO_SPREAD_TOLERANCE: f64 = 1e-12;

/// Gaussian kernel density estimate over one-dimensional samples.
///
/// Every sample contributes a normal kernel of standard deviation `kernel_width`. The width is
/// either derived from a bandwidth factor relative to the sample spread, as in Scott-style
/// estimators, or fixed to an absolute value.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKde {
    samples: Vec<f64>,
    factor: f64,
    kernel_width: f64,
}

impl GaussianKde {
    /// Builds an estimate whose kernel width is `factor` times the sample standard deviation.
    ///
    /// # Errors
    ///
    /// Fails for fewer than two samples, non-finite samples, a non-positive factor, or samples
    /// without spread.
    pub fn with_factor(samples: &[f64], factor: f64) -> Result<Self, StatsError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(StatsError::InvalidBandwidth(factor));
        }
        let std_dev = Self::spread(samples)?;
        Ok(Self {
            samples: samples.to_vec(),
            factor,
            kernel_width: factor * std_dev,
        })
    }

    /// Builds an estimate with an absolute kernel width of `bandwidth`.
    ///
    /// The bandwidth is normalised into a factor by the sample standard deviation, so samples
    /// without spread are rejected here too.
    pub fn with_absolute_bandwidth(samples: &[f64], bandwidth: f64) -> Result<Self, StatsError> {
        if !(bandwidth.is_finite() && bandwidth > 0.0) {
            return Err(StatsError::InvalidBandwidth(bandwidth));
        }
        let std_dev = Self::spread(samples)?;
        Self::with_factor(samples, bandwidth / std_dev)
    }

    fn spread(samples: &[f64]) -> Result<f64, StatsError> {
        if let Some(index) = samples.iter().position(|x| !x.is_finite()) {
            return Err(StatsError::NonFinite { index });
        }
        let std_dev = sample_std_dev(samples).ok_or(StatsError::TooFewSamples {
            required: 2,
            found: samples.len(),
        })?;
        let scale = samples.iter().fold(1.0_f64, |acc, x| acc.max(x.abs()));
        if std_dev <= ZERO_SPREAD_TOLERANCE * scale {
            return Err(StatsError::ZeroVariance { std_dev });
        }
        Ok(std_dev)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Bandwidth factor relative to the sample standard deviation.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Standard deviation of each kernel.
    pub fn kernel_width(&self) -> f64 {
        self.kernel_width
    }

    fn norm(&self) -> f64 {
        1.0 / (self.samples.len() as f64 * self.kernel_width * (2.0 * PI).sqrt())
    }

    /// Estimated probability density at `x`.
    pub fn density(&self, x: f64) -> f64 {
        let h = self.kernel_width;
        let sum: f64 = self
            .samples
            .iter()
            .map(|&s| (-0.5 * ((x - s) / h).powi(2)).exp())
            .sum();
        self.norm() * sum
    }

    /// First derivative of the density at `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        let h = self.kernel_width;
        let sum: f64 = self
            .samples
            .iter()
            .map(|&s| {
                let z = (x - s) / h;
                -z / h * (-0.5 * z * z).exp()
            })
            .sum();
        self.norm() * sum
    }
}
