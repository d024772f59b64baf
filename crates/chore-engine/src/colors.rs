//! Member colour palette.

use crate::error::{ChoreError, Result};

/// Colours handed out to new members, in order.
pub const MEMBER_COLORS: [&str; 10] = [
    "#6366f1", "#ec4899", "#14b8a6", "#f59e0b", "#8b5cf6", "#10b981", "#f43f5e", "#3b82f6",
    "#84cc16", "#06b6d4",
];

/// Colour for tasks with no (known) assignee.
pub const UNASSIGNED_COLOR: &str = "#9ca3af";

/// First palette colour not in `used`; cycles once all ten are taken.
///
/// # Examples
///
/// ```
/// use chore_engine::colors::next_color;
///
/// assert_eq!(next_color::<&str>(&[]), "#6366f1");
/// assert_eq!(next_color(&["#6366f1"]), "#ec4899");
/// ```
pub fn next_color<S: AsRef<str>>(used: &[S]) -> &'static str {
    MEMBER_COLORS
        .iter()
        .copied()
        .find(|c| !used.iter().any(|u| u.as_ref().eq_ignore_ascii_case(c)))
        .unwrap_or(MEMBER_COLORS[used.len() % MEMBER_COLORS.len()])
}

/// Convert `#rrggbb` (or `rrggbb`) to a CSS `rgba(...)` string.
///
/// # Errors
///
/// Returns [`ChoreError::InvalidColor`] unless the input is six hex digits.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Result<String> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChoreError::InvalidColor(hex.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| ChoreError::InvalidColor(hex.to_string()))
    };
    Ok(format!("rgba({}, {}, {}, {alpha})", channel(0)?, channel(2)?, channel(4)?))
}

// ── Tests ───────────────────────────────────────────────────────────────────
