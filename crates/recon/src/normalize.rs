//! Classification code normalization for reference-sheet codes.
//!
//! Report codes are never passed through here; they arrive already in the
//! padded reporting format.

/// Width every dictionary key is padded to.
pub const CODE_WIDTH: usize = 6;

/// Normalize a raw reference code.
///
/// With `segmented`, characters 3 to 5 (the sub-classification segment and
/// its separator) are dropped first. Periods are then removed and the result
/// right-padded with '0' to [`CODE_WIDTH`].
pub fn normalize_code(raw: &str, segmented: bool) -> String {
    let code: String = if segmented {
        raw.chars().take(2).chain(raw.chars().skip(5)).collect()
    } else {
        raw.to_string()
    };
    pad_code(&code.replace('.', ""))
}

/// Right-pad with '0' to [`CODE_WIDTH`]. Never truncates.
pub fn pad_code(code: &str) -> String {
    format!("{code:0<CODE_WIDTH$}")
}
