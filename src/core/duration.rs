//! Duration parsing and formatting.

/// Format a number of seconds as `MM:SS`.
#[must_use]
pub fn format_mmss(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a number of seconds as a human-readable string.
#[must_use]
pub fn format_seconds(total_seconds: u64) -> String {
    let plural = |n: u64| if n == 1 { "" } else { "s" };

    if total_seconds < 60 {
        return format!("{total_seconds} second{}", plural(total_seconds));
    }

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        if minutes > 0 {
            format!("{hours} hour{}, {minutes} minute{}", plural(hours), plural(minutes))
        } else {
            format!("{hours} hour{}", plural(hours))
        }
    } else if seconds > 0 {
        format!("{minutes} minute{}, {seconds} second{}", plural(minutes), plural(seconds))
    } else {
        format!("{minutes} minute{}", plural(minutes))
    }
}

/// Parse a duration string like "90", "90s", "2m", "1m30s" into seconds.
///
/// A bare number, or a trailing number without a unit, is read as seconds.
/// Returns `None` for empty, zero, or malformed input.
#[must_use]
pub fn parse_duration(s: &str) -> Option<u64> {
    let s = s.trim().to_lowercase();

    if let Ok(seconds) = s.parse::<u64>() {
        return (seconds > 0).then_some(seconds);
    }

    let mut total: u64 = 0;
    let mut current = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current.push(c);
            continue;
        }
        if current.is_empty() {
            return None;
        }
        let n: u64 = current.parse().ok()?;
        current.clear();

        let unit = match c {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return None,
        };
        total = total.checked_add(n.checked_mul(unit)?)?;
    }

    if !current.is_empty() {
        let n: u64 = current.parse().ok()?;
        total = total.checked_add(n)?;
    }

    (total > 0).then_some(total)
}

/// Render a progress bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0)) * width as f64) as usize;
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(63), "01:03");
        assert_eq!(format_mmss(1500), "25:00");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(1), "1 second");
        assert_eq!(format_seconds(45), "45 seconds");
        assert_eq!(format_seconds(60), "1 minute");
        assert_eq!(format_seconds(63), "1 minute, 3 seconds");
        assert_eq!(format_seconds(7200), "2 hours");
        assert_eq!(format_seconds(5400), "1 hour, 30 minutes");
    }

    #[test]
    fn test_parse_duration_bare_number_is_seconds() {
        assert_eq!(parse_duration("60"), Some(60));
        assert_eq!(parse_duration(" 90 "), Some(90));
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("2m"), Some(120));
        assert_eq!(parse_duration("1m30s"), Some(90));
        assert_eq!(parse_duration("1h"), Some(3600));
        assert_eq!(parse_duration("1m30"), Some(90));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("").is_none());
        assert!(parse_duration("0").is_none());
        assert!(parse_duration("abc").is_none());
        assert!(parse_duration("5x").is_none());
        assert!(parse_duration("m").is_none());
    }

    #[test]
    fn test_render_progress_bar() {
        let bar = render_progress_bar(0.5, 10);
        assert!(bar.contains("█████"));
        assert!(bar.contains("░░░░░"));
        assert_eq!(render_progress_bar(2.0, 4), "[████]");
    }
}
