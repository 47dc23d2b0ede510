//! Formatting and statistics for training logs.
use itertools::Itertools;

/// Formats a timestep zero-padded to 7 characters with thousands separators.
///
/// `1000` is rendered as `001,000` and `1234567` as `1,234,567`.
pub fn format_timestep(t: usize) -> String {
    let digits = format!("{:06}", t);
    let n = digits.len();
    digits
        .chars()
        .enumerate()
        .map(|(i, c)| match i > 0 && (n - i) % 3 == 0 {
            true => format!(",{}", c),
            false => c.to_string(),
        })
        .join("")
}

/// Mean and population standard deviation, `(0, 0)` for an empty slice.
pub fn mean_std(xs: &[f32]) -> (f32, f32) {
    if xs.is_empty() {
        return (0.0, 0.0);
    }
    let n = xs.len() as f32;
    let mean = xs.iter().sum::<f32>() / n;
    let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / n;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestep() {
        assert_eq!(format_timestep(0), "000,000");
        assert_eq!(format_timestep(1), "000,001");
        assert_eq!(format_timestep(1000), "001,000");
        assert_eq!(format_timestep(123456), "123,456");
        assert_eq!(format_timestep(1234567), "1,234,567");
        assert_eq!(format_timestep(12345678), "12,345,678");
    }

    #[test]
    fn test_mean_std() {
        assert_eq!(mean_std(&[]), (0.0, 0.0));
        let (m, s) = mean_std(&[1.0, 3.0]);
        assert_eq!(m, 2.0);
        assert_eq!(s, 1.0);
    }
}
