//! Summary statistics behind the box and violin charts.

/// Five-number summary drawn by a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

/// Bandwidth floor so a single repeated value still draws a visible violin.
pub const MIN_BANDWIDTH: f64 = 0.05;
/// Points sampled along each violin outline.
pub const KDE_POINTS: usize = 64;

/// Linearly interpolated quantile of sorted data, `p` in `[0, 1]`.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        n => {
            let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
            let lo = h.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
        }
    }
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quartiles plus whiskers at the furthest points within 1.5×IQR, and the
/// points beyond them. `None` when there are no finite values.
pub fn box_stats(values: &[f64]) -> Option<(BoxStats, Vec<f64>)> {
    let sorted = sorted_finite(values);
    let q1 = quantile(&sorted, 0.25)?;
    let median = quantile(&sorted, 0.5)?;
    let q3 = quantile(&sorted, 0.75)?;
    let fence = 1.5 * (q3 - q1);
    let (lo_fence, hi_fence) = (q1 - fence, q3 + fence);

    let inside = || sorted.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence);
    let lower_whisker = inside().next().unwrap_or(q1);
    let upper_whisker = inside().last().unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();

    Some((
        BoxStats { lower_whisker, q1, median, q3, upper_whisker },
        outliers,
    ))
}

fn std_dev(sorted: &[f64]) -> f64 {
    let n = sorted.len() as f64;
    if sorted.len() < 2 {
        return 0.0;
    }
    let mean = sorted.iter().sum::<f64>() / n;
    (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
}

/// Silverman's rule of thumb.
pub fn silverman_bandwidth(sorted: &[f64]) -> f64 {
    let sd = std_dev(sorted);
    let iqr = match (quantile(sorted, 0.25), quantile(sorted, 0.75)) {
        (Some(q1), Some(q3)) => q3 - q1,
        _ => 0.0,
    };
    let spread = if iqr > 0.0 { sd.min(iqr / 1.349) } else { sd };
    let bw = 1.059 * spread * (sorted.len().max(1) as f64).powf(-0.2);
    bw.max(MIN_BANDWIDTH)
}

/// Gaussian kernel density sampled at `points` values spanning
/// `[min - 2h, max + 2h]`. Returns `(value, density)` pairs.
pub fn kde(values: &[f64], points: usize) -> Vec<[f64; 2]> {
    let sorted = sorted_finite(values);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    let h = silverman_bandwidth(&sorted);
    let (start, end) = (min - 2.0 * h, max + 2.0 * h);
    let steps = points.max(2) - 1;
    let norm = 1.0 / (sorted.len() as f64 * h * (2.0 * std::f64::consts::PI).sqrt());

    (0..=steps)
        .map(|i| {
            let x = start + (end - start) * i as f64 / steps as f64;
            let density: f64 = sorted
                .iter()
                .map(|v| (-0.5 * ((x - v) / h).powi(2)).exp())
                .sum::<f64>()
                * norm;
            [x, density]
        })
        .collect()
}
