//! Placement of trend changepoints.
//!
//! Candidate changepoints are placed at observation times, evenly spread over
//! the leading `changepoint_range` fraction of the history. The tail is kept
//! free of changepoints so the most recent observations cannot bend the
//! trend on their own, and the last observation is never a candidate.

/// Place up to `count` changepoints over the first `range` fraction of `t`.
///
/// # Arguments
/// * `t` - Strictly increasing normalized observation times
/// * `count` - Requested number of changepoints
/// * `range` - Fraction of the history eligible for changepoints, in (0, 1]
///
/// # Returns
/// Strictly increasing normalized changepoint times. Fewer than `count` are
/// returned when the eligible history is too short to hold them.
pub fn place_changepoints(t: &[f64], count: usize, range: f64) -> Vec<f64> {
    let n = t.len();
    if n < 3 || count == 0 {
        return vec![];
    }

    // Number of leading observations eligible to host a changepoint
    let hist = ((n as f64 * range).floor() as usize).min(n - 1);
    let count = if count + 1 > hist {
        hist.saturating_sub(1)
    } else {
        count
    };
    if count == 0 {
        return vec![];
    }

    let last = (hist - 1) as f64;
    let mut changepoints: Vec<f64> = Vec::with_capacity(count);
    for j in 1..=count {
        let idx = (j as f64 * last / count as f64).round() as usize;
        let cp = t[idx];
        if changepoints.last().map_or(true, |&prev| cp > prev) {
            changepoints.push(cp);
        }
    }
    changepoints
}
