use ndarray::ArrayView1;
use num_traits::{Float, FromPrimitive};

/// Compute the mean and sample standard deviation of `values`
///
/// The standard deviation uses Bessel's correction (one delta degree of freedom), so it is
/// undefined for fewer than two observations and `None` is returned.
///
/// # Examples
///
/// ```
/// use beam_lifetime::math::mean_and_std;
///
/// let (mean, std) = mean_and_std::<f64>(&[2., 4., 4., 4., 5., 5., 7., 9.]).unwrap();
/// assert_eq!(mean, 5.);
/// assert!((std - 2.138_089_935).abs() < 1e-9);
/// ```
pub fn mean_and_std<E: Float + FromPrimitive>(values: &[E]) -> Option<(E, E)> {
    if values.len() < 2 {
        return None;
    }
    let view = ArrayView1::from(values);
    let mean = view.mean()?;
    let std = view.std(E::one());
    Some((mean, std))
}

/// Centered moving average with partial windows at the boundaries
///
/// For output index `i` the window spans `[i - w / 2, i + (w - 1) / 2]`, clipped to the series.
/// Even windows therefore lean one sample into the past. The clipped edge windows are averaged
/// over however many samples they contain, so the output always has the input length.
///
/// Each window is summed on its own, so the rounding error is bounded by the window length and
/// not by the position in the series.
///
/// # Panics
///
/// Panics if `window` is zero, or if a window length cannot be represented in `E`.
///
/// # Examples
///
/// ```
/// use beam_lifetime::math::centered_moving_average;
///
/// let smoothed = centered_moving_average(&[1., 2., 3., 4., 5.], 3);
/// assert_eq!(smoothed, vec![1.5, 2., 3., 4., 4.5]);
/// ```
pub fn centered_moving_average<E: Float + FromPrimitive>(values: &[E], window: usize) -> Vec<E> {
    assert!(window > 0, "moving average window must be non-empty");
    let n = values.len();
    let after = (window - 1) / 2;
    let before = window - 1 - after;

    (0..n)
        .map(|ii| {
            let lo = ii.saturating_sub(before);
            let hi = (ii + after).min(n - 1) + 1;
            let samples = &values[lo..hi];
            let count = E::from_usize(samples.len()).expect("usize must fit in `E`");
            samples.iter().fold(E::zero(), |acc, &x| acc + x) / count
        })
        .collect()
}

/// Median of the finite entries of `values`, `None` when there are none
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    let mut finite = values
        .iter()
        .copied()
        .filter(|x| x.is_finite())
        .collect::<Vec<_>>();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);
    let mid = finite.len() / 2;
    if finite.len() % 2 == 0 {
        Some((finite[mid - 1] + finite[mid]) / 2.)
    } else {
        Some(finite[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::{centered_moving_average, mean_and_std, median};

    use ndarray::Array;
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::{rand::Rng, RandomExt};
    use rand_isaac::isaac64::Isaac64Rng;

    #[test]
    fn moving_average_matches_direct_window_means() {
        let seed = 40;
        let mut rng = Isaac64Rng::seed_from_u64(seed);
        let n = rng.gen_range(20..200);
        let values = Array::random_using(n, Uniform::new(0., 10.), &mut rng).to_vec();

        for window in [1, 2, 5, 8, 31] {
            let smoothed = centered_moving_average(&values, window);
            let after = (window - 1) / 2;
            let before = window - 1 - after;
            for (ii, actual) in smoothed.iter().enumerate() {
                let lo = ii.saturating_sub(before);
                let hi = (ii + after).min(n - 1);
                let slice = &values[lo..=hi];
                #[allow(clippy::cast_precision_loss)]
                let expected = slice.iter().sum::<f64>() / slice.len() as f64;
                approx::assert_relative_eq!(*actual, expected, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn window_of_one_is_the_identity() {
        let values = vec![3., 1., 4., 1., 5., 9., 2., 6.];
        assert_eq!(centered_moving_average(&values, 1), values);
    }

    #[test]
    fn long_series_smooths_without_accumulated_error() {
        // Decaying beam current sampled every millisecond over half an hour
        let values = (0..2_000_000)
            .map(|ii| 0.2 * (-f64::from(ii) * 1e-3 / 36_000.).exp())
            .collect::<Vec<_>>();

        assert_eq!(centered_moving_average(&values, 1), values);

        let smoothed = centered_moving_average(&values, 5);
        for ii in (2..values.len() - 2).step_by(9973) {
            let expected = values[ii - 2..=ii + 2].iter().sum::<f64>() / 5.;
            approx::assert_relative_eq!(smoothed[ii], expected, max_relative = 1e-15);
        }

        // Lifetime from the last pair survives an identity smoothing
        let n = values.len();
        let identity = centered_moving_average(&values, 1);
        let tau = |a: f64, b: f64| -1e-3 / (b / a).ln() / 3600.;
        approx::assert_relative_eq!(
            tau(identity[n - 2], identity[n - 1]),
            tau(values[n - 2], values[n - 1])
        );
    }

    #[test]
    fn even_window_leans_into_the_past() {
        // For w = 4 index 2 averages indices 0..=3
        let smoothed = centered_moving_average(&[0., 0., 0., 4., 100.], 4);
        approx::assert_relative_eq!(smoothed[2], 1.);
    }

    #[test]
    fn standard_deviation_is_undefined_for_a_single_value() {
        assert!(mean_and_std(&[1.0]).is_none());
        assert!(mean_and_std::<f64>(&[]).is_none());
    }

    #[test]
    fn median_ignores_non_finite_entries() {
        assert_eq!(median(&[f64::NAN, 3., 1., 2.]), Some(2.));
        assert_eq!(median(&[4., 1., f64::INFINITY, 2., 3.]), Some(2.5));
        assert_eq!(median(&[f64::NAN]), None);
    }
}
