//! Rolling extrema over a trailing window.
//!
//! Minimum periods equal the window: the first `window - 1` outputs are
//! `None`, as is every output when `window` is zero or exceeds the input.

pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, f64::min)
}

pub fn rolling_max(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, f64::max)
}

/// Midpoint of the trailing `window` range: (min(low) + max(high)) / 2.
pub fn rolling_midpoint(lows: &[f64], highs: &[f64], window: usize) -> Vec<Option<f64>> {
    let mins = rolling_min(lows, window);
    let maxs = rolling_max(highs, window);
    pairwise_mean(&mins, &maxs)
}

/// Element-wise mean of two aligned optional series; `None` if either side is.
pub fn pairwise_mean(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<Option<f64>> {
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some((x + y) / 2.0),
            _ => None,
        })
        .collect()
}

fn rolling(values: &[f64], window: usize, pick: fn(f64, f64) -> f64) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || window > values.len() {
        return out;
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        out[i] = slice.iter().copied().reduce(pick);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_warmup_is_none() {
        let out = rolling_min(&[5.0, 3.0, 4.0, 1.0, 2.0], 3);
        assert_eq!(out, vec![None, None, Some(3.0), Some(1.0), Some(1.0)]);
    }

    #[test]
    fn max_over_window() {
        let out = rolling_max(&[5.0, 3.0, 4.0, 1.0, 2.0], 2);
        assert_eq!(out, vec![None, Some(5.0), Some(4.0), Some(4.0), Some(2.0)]);
    }

    #[test]
    fn window_of_one_is_identity() {
        let values = [2.0, 7.0, 1.0];
        let out = rolling_max(&values, 1);
        assert_eq!(out, vec![Some(2.0), Some(7.0), Some(1.0)]);
    }

    #[test]
    fn window_longer_than_input_is_all_none() {
        let out = rolling_min(&[1.0, 2.0, 3.0], 4);
        assert!(out.iter().all(Option::is_none));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn zero_window_is_all_none() {
        assert!(rolling_max(&[1.0, 2.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn empty_input() {
        assert!(rolling_min(&[], 9).is_empty());
    }

    #[test]
    fn midpoint_uses_low_min_and_high_max() {
        let lows = [9.0, 8.0, 10.0];
        let highs = [11.0, 12.0, 10.5];
        let out = rolling_midpoint(&lows, &highs, 2);
        // [None, (8+12)/2, (8+12)/2]
        assert_eq!(out, vec![None, Some(10.0), Some(10.0)]);
    }

    #[test]
    fn pairwise_mean_propagates_none() {
        let a = [Some(1.0), None, Some(3.0)];
        let b = [Some(3.0), Some(5.0), None];
        assert_eq!(pairwise_mean(&a, &b), vec![Some(2.0), None, None]);
    }
}
