//! # Fixed Constants
//!
//! Colors, limits and defaults compiled into the binary.
//! None of these change at runtime; per-deployment values live in the
//! app configuration instead.

/// Line color for the selected country.
pub const SELECTED_COUNTRY_COLOR: &str = "#295e84";

/// Color used when a code has no registry color.
pub const FALLBACK_COLOR: &str = "#95a5a6";

/// Palette cycled through for peer comparison countries.
pub const PEER_PALETTE: [&str; 8] = [
    "#e74c3c", "#f39c12", "#27ae60", "#3498db", "#9b59b6", "#1abc9c", "#34495e", "#e67e22",
];

/// Default year separating history from projections.
pub const DEFAULT_BASE_YEAR: i32 = 2025;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum size of a single source file (200 MB).
///
/// Sources are read fully into memory at startup.
pub const MAX_SOURCE_FILE_SIZE: u64 = 200 * 1024 * 1024;

/// Maximum number of codes a single request may name.
pub const MAX_REQUEST_CODES: usize = 64;

/// Maximum length of a single code string.
pub const MAX_CODE_LENGTH: usize = 16;

/// Peer palette color for the `index`-th peer country.
#[must_use]
pub fn peer_color(index: usize) -> &'static str {
    PEER_PALETTE[index % PEER_PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_palette_cycles() {
        assert_eq!(peer_color(0), "#e74c3c");
        assert_eq!(peer_color(8), peer_color(0));
        assert_eq!(peer_color(9), "#f39c12");
    }

    #[test]
    fn selected_color_not_in_palette() {
        assert!(!PEER_PALETTE.contains(&SELECTED_COUNTRY_COLOR));
    }
}
