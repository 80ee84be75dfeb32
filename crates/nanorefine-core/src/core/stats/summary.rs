/// Arithmetic mean, or `None` for an empty sample.
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Sample standard deviation with `N - 1` normalisation, or `None` for fewer than two samples.
pub fn sample_std_dev(samples: &[f64]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let mean = mean(samples)?;
    let sum_sq: f64 = samples.iter().map(|&x| (x - mean).powi(2)).sum();
    Some((sum_sq / (samples.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_sample_is_undefined() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn mean_averages_samples() {
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
    }

    #[test]
    fn sample_std_dev_uses_bessel_correction() {
        let std = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((std - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn sample_std_dev_needs_two_samples() {
        assert_eq!(sample_std_dev(&[1.0]), None);
        assert_eq!(sample_std_dev(&[1.0, 1.0]), Some(0.0));
    }
}
