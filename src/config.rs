//! Bounded parsing shared by the server's environment and the page's query
//! string. Out-of-range or malformed values fall back to the default.

pub fn parse_u64_with_bounds(raw: Option<&str>, default: u64, bounds: (u64, u64)) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

pub fn parse_usize_with_bounds(raw: Option<&str>, default: usize, bounds: (usize, usize)) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

pub fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_values_accept_inclusive_range() {
        assert_eq!(parse_u64_with_bounds(Some("1"), 5, (1, 10)), 1);
        assert_eq!(parse_u64_with_bounds(Some(" 10 "), 5, (1, 10)), 10);
        assert_eq!(parse_usize_with_bounds(Some("7"), 5, (1, 10)), 7);
    }

    #[test]
    fn out_of_range_or_garbage_falls_back() {
        assert_eq!(parse_u64_with_bounds(Some("0"), 5, (1, 10)), 5);
        assert_eq!(parse_u64_with_bounds(Some("11"), 5, (1, 10)), 5);
        assert_eq!(parse_usize_with_bounds(Some("-3"), 5, (1, 10)), 5);
        assert_eq!(parse_usize_with_bounds(Some("many"), 5, (1, 10)), 5);
        assert_eq!(parse_usize_with_bounds(None, 5, (1, 10)), 5);
    }

    #[test]
    fn non_empty_trims_and_drops_blank() {
        assert_eq!(non_empty(Some("  dist ")), Some("dist".to_string()));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }
}
