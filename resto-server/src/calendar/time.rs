//! Time-of-day normalization

/// Canonicalize a time of day to `HH:MM:SS`
///
/// Accepts `HH:MM`, `HH:MM:SS` and `HH:MM:SS.ffffff`. Any other input is
/// returned unchanged.
pub fn normalize_time(time: &str) -> String {
    let two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());

    let parts: Vec<&str> = time.split(':').collect();
    match parts.as_slice() {
        [h, m] if two_digits(h) && two_digits(m) => format!("{h}:{m}:00"),
        [h, m, s] if two_digits(h) && two_digits(m) => {
            let (secs, fraction) = match s.split_once('.') {
                Some((secs, fraction)) => (secs, Some(fraction)),
                None => (*s, None),
            };
            let fraction_ok =
                fraction.is_none_or(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()));
            if two_digits(secs) && fraction_ok {
                format!("{h}:{m}:{secs}")
            } else {
                time.to_string()
            }
        }
        _ => time.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_formats() {
        assert_eq!(normalize_time("18:00"), "18:00:00");
        assert_eq!(normalize_time("18:00:30"), "18:00:30");
        assert_eq!(normalize_time("18:00:30.123456"), "18:00:30");
    }

    #[test]
    fn test_unknown_formats_pass_through() {
        assert_eq!(normalize_time("6pm"), "6pm");
        assert_eq!(normalize_time("8:00"), "8:00");
        assert_eq!(normalize_time("18:00:3"), "18:00:3");
        assert_eq!(normalize_time("18:00:30."), "18:00:30.");
        assert_eq!(normalize_time(""), "");
    }
}
