//! Human-readable formatting of share difficulties and progress

const UNITS: [&str; 7] = ["", "K", "M", "G", "T", "P", "E"];

pub const DEFAULT_BAR_WIDTH: usize = 18;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Format a count with a magnitude suffix, e.g. `1500` -> `"1.50K"`
pub fn format_mining_number(value: u64) -> String {
    format_magnitude(value as f64)
}

/// Format a (possibly fractional) quantity with a magnitude suffix.
///
/// Values below 1000 are printed as truncated integers without a suffix.
pub fn format_magnitude(value: f64) -> String {
    let mut num = if value.is_finite() { value } else { 0.0 };
    let mut index = 0;
    while num >= 1000.0 && index < UNITS.len() - 1 {
        num /= 1000.0;
        index += 1;
    }

    if index == 0 {
        format!("{}", num.trunc() as i64)
    } else {
        format!("{:.2}{}", num, UNITS[index])
    }
}

/// Render a ratio as a markdown bar plus percentage, capped at 100%
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let ratio = if ratio.is_nan() { 0.0 } else { ratio.max(0.0) };
    let capped = ratio.min(1.0);
    let filled = ((capped * width as f64) as usize).min(width);

    let bar: String = std::iter::repeat_n(FILLED, filled)
        .chain(std::iter::repeat_n(EMPTY, width - filled))
        .collect();

    format!("`{}` **{:.2}%**", bar, capped * 100.0)
}
