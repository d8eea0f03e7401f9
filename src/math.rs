/// Smallest p-value considered before taking a logarithm
pub const PVALUE_FLOOR: f64 = 1e-300;

/// Smallest baseMean considered before taking a logarithm
pub const BASE_MEAN_FLOOR: f64 = 1e-10;

/// `log10(max(x, floor))`, leaving NaN untouched
pub fn floored_log10(x: f64, floor: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    x.max(floor).log10()
}

/// `-log10(p)` with zero (or negative) p-values floored to [`PVALUE_FLOOR`]
pub fn neg_log10_pvalue(pvalue: f64) -> f64 {
    -floored_log10(pvalue, PVALUE_FLOOR)
}

/// Equal-width histogram over the observed range of `x`
///
/// Returns the `bins + 1` bin edges and the count of each bin. The last bin is
/// closed on the right so the maximum is counted. NaN values are ignored.
pub fn histogram(x: &[f64], bins: usize) -> (Vec<f64>, Vec<usize>) {
    let values = x.iter().copied().filter(|v| !v.is_nan()).collect::<Vec<_>>();
    if values.is_empty() || bins == 0 {
        return (Vec::new(), Vec::new());
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // widen a zero-width range
    let (lower, upper) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (upper - lower) / bins as f64;
    let edges = (0..=bins)
        .map(|i| lower + width * i as f64)
        .collect::<Vec<_>>();

    let mut counts = vec![0; bins];
    for v in values {
        let bin = (((v - lower) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    (edges, counts)
}

/// Filliben's estimate of the uniform order statistic medians for a sample of size `n`
pub fn uniform_order_statistic_medians(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.5],
        _ => {
            let last = 0.5_f64.powf(1.0 / n as f64);
            let mut medians = (1..=n)
                .map(|i| (i as f64 - 0.3175) / (n as f64 + 0.365))
                .collect::<Vec<_>>();
            medians[0] = 1.0 - last;
            medians[n - 1] = last;
            medians
        }
    }
}

/// Least-squares line through `(x, y)` as `(slope, intercept, r)`
pub fn linear_fit(x: &[f64], y: &[f64]) -> (f64, f64, f64) {
    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    let r = sxy / (sxx * syy).sqrt();
    (slope, intercept, r)
}
