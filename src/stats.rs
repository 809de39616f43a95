//! Summary metrics over a catalog or a filtered subset. Every function is
//! order independent and returns a safe default on an empty input.

pub fn count_where<T, P>(items: &[T], pred: P) -> usize
where
    P: Fn(&T) -> bool,
{
    items.iter().filter(|item| pred(item)).count()
}

pub fn sum<T, F>(items: &[T], field: F) -> f64
where
    F: Fn(&T) -> Option<f64>,
{
    items.iter().filter_map(|item| field(item)).sum()
}

/// Mean of the defined values of `field`. Items without a value do not enter
/// the denominator; zero defined values yields 0, never NaN.
pub fn average<T, F>(items: &[T], field: F) -> f64
where
    F: Fn(&T) -> Option<f64>,
{
    let mut total = 0.0;
    let mut denom = 0usize;
    for item in items {
        if let Some(v) = field(item) {
            total += v;
            denom += 1;
        }
    }
    if denom == 0 {
        0.0
    } else {
        total / denom as f64
    }
}

/// Largest defined value of `field`, or 0 when none is defined.
pub fn max_or_zero<T, F>(items: &[T], field: F) -> f64
where
    F: Fn(&T) -> Option<f64>,
{
    items
        .iter()
        .filter_map(|item| field(item))
        .fold(0.0, f64::max)
}
