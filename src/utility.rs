/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator) around a pre-computed mean.
/// Returns `None` for fewer than two values.
pub fn sample_stddev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Position of the first maximum, skipping `None` and NaN entries.
pub fn first_argmax<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.into_iter().enumerate() {
        let Some(v) = v.filter(|v| !v.is_nan()) else {
            continue;
        };
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn test_sample_stddev() {
        assert_eq!(sample_stddev(&[5.0], 5.0), None);
        let sd = sample_stddev(&[2.0, 4.0], 3.0).unwrap();
        assert!((sd - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_first_argmax_prefers_first_tie() {
        assert_eq!(first_argmax([Some(1.0), Some(3.0), Some(3.0)]), Some(1));
    }

    #[test]
    fn test_first_argmax_skips_missing() {
        assert_eq!(first_argmax([None, Some(0.5), None]), Some(1));
        assert_eq!(first_argmax([None, None]), None);
        assert_eq!(first_argmax(Vec::<Option<f64>>::new()), None);
    }

    #[test]
    fn test_first_argmax_ignores_nan() {
        assert_eq!(first_argmax([Some(2.0), Some(f64::NAN), Some(1.0)]), Some(0));
        assert_eq!(first_argmax([Some(f64::NAN), Some(1.0)]), Some(1));
        assert_eq!(first_argmax([Some(f64::NAN)]), None);
    }
}
