//! Score normalisation helpers.

/// `numerator / denominator` clamped to [0, 1]; 0 when the denominator is 0.
pub fn clamp_ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (numerator as f64 / denominator as f64).clamp(0.0, 1.0)
}

/// `min(1, value / target)`, floored at 0. A non-positive target saturates
/// any positive value.
pub fn saturating_ratio(value: f64, target: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    if target <= 0.0 {
        return 1.0;
    }
    (value / target).min(1.0)
}

/// `Σ wᵢ·vᵢ × 100 / Σ wᵢ` over the parts whose value is present.
///
/// Absent parts are left out of both sums. Returns 0 when no weight is used.
pub fn weighted_score(parts: &[(Option<f64>, f64)]) -> f64 {
    let (sum, weight) = parts
        .iter()
        .filter_map(|(value, w)| value.map(|v| (v * w, *w)))
        .fold((0.0, 0.0), |(s, tw), (v, w)| (s + v, tw + w));
    if weight <= 0.0 {
        return 0.0;
    }
    (sum * 100.0 / weight).clamp(0.0, 100.0)
}

/// Mean of the present values, `None` when all are absent.
pub fn mean_present(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
