//! Combination of independent loss mechanisms
//!
//! Loss rates of statistically independent mechanisms add (Matthiessen's rule), so
//!
//! $$
//!     \frac{1}{\tau_{total}} = \sum_i \frac{1}{\tau_i}
//! $$

use itertools::Itertools;

use crate::series::LifetimeEstimate;
use crate::{Error, Result};

/// Combine the lifetimes (hours) of independent mechanisms into the total lifetime
///
/// An infinite lifetime contributes no loss rate. The result is independent of ordering and
/// grouping, and a single lifetime is returned unchanged.
///
/// # Errors
/// Returns [`Error::Domain`] if `lifetimes` is empty or any lifetime is zero, negative or NaN.
///
/// # Examples
///
/// ```
/// use beam_lifetime::combine::combine;
///
/// assert_eq!(combine(&[10., 10.]).unwrap(), 5.);
/// ```
pub fn combine(lifetimes: &[f64]) -> Result<f64> {
    if lifetimes.is_empty() {
        return Err(Error::domain("no lifetimes to combine"));
    }
    if let [single] = lifetimes {
        return positive_lifetime(*single);
    }

    let total_rate = lifetimes
        .iter()
        .map(|&tau| positive_lifetime(tau).map(|tau| 1. / tau))
        .sum::<Result<f64>>()?;
    Ok(1. / total_rate)
}

/// Combine scalar predictions, tagging the total with the joined method names
///
/// # Errors
/// Returns [`Error::Domain`] if the list is empty, contains an observed series, or any predicted
/// lifetime is not positive.
pub fn combine_estimates(estimates: &[LifetimeEstimate]) -> Result<LifetimeEstimate> {
    let hours = estimates
        .iter()
        .map(|estimate| match estimate {
            LifetimeEstimate::Predicted { hours, .. } => Ok(*hours),
            LifetimeEstimate::Observed(series) => Err(Error::domain(format!(
                "observed series {} cannot be combined as a loss mechanism",
                series.method()
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LifetimeEstimate::Predicted {
        method: estimates.iter().map(LifetimeEstimate::method).join("+"),
        hours: combine(&hours)?,
    })
}

fn positive_lifetime(tau: f64) -> Result<f64> {
    if tau > 0. {
        Ok(tau)
    } else {
        Err(Error::domain(format!(
            "lifetimes must be positive to combine, got {tau}"
        )))
    }
}
