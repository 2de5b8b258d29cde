use crate::domain::model::{PrayerTimes, SkipReason, SlotTime};
use crate::utils::error::{BotError, Result};
use chrono::NaiveDate;

pub const DEFAULT_LOCATION: &str = "Colombo (Sri Lanka)";
pub const MESSAGE_FOOTER: &str = "{ACJU}";

/// A day's row spans the date cell plus six time cells.
const ROW_LINES: usize = 7;
/// Date token plus six (clock, meridiem) pairs.
const ROW_TOKENS: usize = 13;

/// Plain text of every page of a timetable PDF.
pub fn extract_text(pdf: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(pdf).map_err(|e| BotError::PdfError {
        message: format!("{:?}", e),
    })
}

/// Label of a day's first cell, e.g. `31-Jul`, `1-Aug`.
pub fn day_label(date: NaiveDate) -> String {
    date.format("%-d-%b").to_string()
}

/// Finds the row for `date` and returns its cells joined by single spaces.
///
/// The timetable lays each cell on its own line, so the row is the line equal to
/// the day label followed by the next six lines. Lines are split on `\n` only,
/// so a trailing newline still counts as a (blank) line after the last cell.
/// Only when no such row exists is a row kept on a single line accepted.
pub fn find_day_row(text: &str, date: NaiveDate) -> Option<String> {
    let label = day_label(date);
    let lines: Vec<&str> = text.split('\n').collect();

    let exact = lines
        .iter()
        .enumerate()
        .find(|(i, line)| line.trim() == label && i + ROW_LINES < lines.len());
    if let Some((i, _)) = exact {
        let row = lines[i..i + ROW_LINES].join(" ");
        tracing::debug!("Matched row: {}", row);
        return Some(row);
    }

    lines.iter().map(|line| line.trim()).find_map(|line| {
        let mut tokens = line.split_whitespace();
        if tokens.next() == Some(label.as_str()) && tokens.count() + 1 >= ROW_TOKENS {
            tracing::debug!("Matched single-line row: {}", line);
            Some(line.to_string())
        } else {
            None
        }
    })
}

pub fn parse_row(row: &str, date: NaiveDate) -> std::result::Result<PrayerTimes, SkipReason> {
    let parts: Vec<&str> = row.split_whitespace().collect();
    if parts.len() < ROW_TOKENS {
        return Err(SkipReason::MalformedRow { tokens: parts.len() });
    }

    let slot = |n: usize| SlotTime::new(parts[2 * n + 1], parts[2 * n + 2]);

    Ok(PrayerTimes {
        date,
        fajr: slot(0),
        sunrise: slot(1),
        luhar: slot(2),
        asar: slot(3),
        maghrib: slot(4),
        isha: slot(5),
    })
}

pub fn format_message(times: &PrayerTimes, location: &str) -> String {
    let mut msg = format!(
        "Prayer Times - {}\n{}\n\n",
        location,
        times.date.format("%d %B %Y")
    );
    for (name, slot) in times.slots() {
        msg.push_str(&format!("{} - {}\n", name, slot));
    }
    msg.push('\n');
    msg.push_str(MESSAGE_FOOTER);
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const PAGE: &str = "PRAYER TIMES FOR COLOMBO\n\
Date\nFajr\nSunrise\nLuhar\nAsar\nMaghrib\nIsha\n\
30-Jul\n4:38 am\n6:03 am\n12:13 pm\n3:34 pm\n6:23 pm\n7:35 pm\n\
31-Jul\n4:38 am\n6:03 am\n12:13 pm\n3:33 pm\n6:23 pm\n7:35 pm\n\
Page 1\n";

    #[test]
    fn test_day_label_has_no_padding() {
        assert_eq!(day_label(date(2025, 7, 31)), "31-Jul");
        assert_eq!(day_label(date(2025, 8, 1)), "1-Aug");
    }

    #[test]
    fn test_find_day_row_joins_seven_lines() {
        let row = find_day_row(PAGE, date(2025, 7, 30)).unwrap();
        assert_eq!(row, "30-Jul 4:38 am 6:03 am 12:13 pm 3:34 pm 6:23 pm 7:35 pm");
    }

    #[test]
    fn test_find_day_row_requires_lines_after_label() {
        // 31-Jul 後面只有 7 行，i + 7 < len 不成立
        let truncated = "31-Jul\n4:38 am\n6:03 am\n12:13 pm\n3:33 pm\n6:23 pm\n7:35 pm";
        assert!(find_day_row(truncated, date(2025, 7, 31)).is_none());

        assert!(find_day_row(PAGE, date(2025, 7, 31)).is_some());
    }

    #[test]
    fn test_find_day_row_last_row_before_trailing_newline() {
        // 月底最後一列後面只剩結尾換行
        let text = "Date\n31-Jul\n4:38 am\n6:03 am\n12:13 pm\n3:33 pm\n6:23 pm\n7:35 pm\n";
        let row = find_day_row(text, date(2025, 7, 31)).unwrap();
        assert_eq!(row, "31-Jul 4:38 am 6:03 am 12:13 pm 3:33 pm 6:23 pm 7:35 pm");
    }

    #[test]
    fn test_find_day_row_prefers_cell_per_line_layout() {
        let text = "31-Jul 4:00 am 5:00 am 12:00 pm 3:00 pm 6:00 pm 7:00 pm (draft)\n\
31-Jul\n4:38 am\n6:03 am\n12:13 pm\n3:33 pm\n6:23 pm\n7:35 pm\n";
        let row = find_day_row(text, date(2025, 7, 31)).unwrap();
        assert_eq!(row, "31-Jul 4:38 am 6:03 am 12:13 pm 3:33 pm 6:23 pm 7:35 pm");
    }

    #[test]
    fn test_find_day_row_missing_day() {
        assert!(find_day_row(PAGE, date(2025, 8, 1)).is_none());
    }

    #[test]
    fn test_find_day_row_does_not_match_longer_day() {
        let text = "11-Aug 4:30 am 5:58 am 12:11 pm 3:31 pm 6:23 pm 7:34 pm\n";
        assert!(find_day_row(text, date(2025, 8, 1)).is_none());
        assert!(find_day_row(text, date(2025, 8, 11)).is_some());
    }

    #[test]
    fn test_parse_row() {
        let row = "30-Jul 4:38 am 6:03 am 12:13 pm 3:34 pm 6:23 pm 7:35 pm";
        let times = parse_row(row, date(2025, 7, 30)).unwrap();
        assert_eq!(times.fajr, SlotTime::new("4:38", "am"));
        assert_eq!(times.luhar.to_string(), "12:13 pm");
        assert_eq!(times.isha, SlotTime::new("7:35", "pm"));
    }

    #[test]
    fn test_parse_row_too_few_tokens() {
        let row = "30-Jul 4:38 6:03 12:13 3:34 6:23 7:35";
        assert_eq!(
            parse_row(row, date(2025, 7, 30)),
            Err(SkipReason::MalformedRow { tokens: 7 })
        );
    }

    #[test]
    fn test_format_message() {
        let row = "1-Aug 4:37 am 6:03 am 12:13 pm 3:33 pm 6:23 pm 7:35 pm";
        let times = parse_row(row, date(2025, 8, 1)).unwrap();
        let msg = format_message(&times, DEFAULT_LOCATION);

        let expected = "Prayer Times - Colombo (Sri Lanka)\n\
01 August 2025\n\
\n\
Fajr - 4:37 am\n\
Sunrise - 6:03 am\n\
Luhar - 12:13 pm\n\
Asar - 3:33 pm\n\
Maghrib - 6:23 pm\n\
Isha - 7:35 pm\n\
\n\
{ACJU}";
        assert_eq!(msg, expected);
    }

    #[test]
    fn test_extract_text_rejects_non_pdf() {
        let err = extract_text(b"<html>Not Found</html>").unwrap_err();
        assert!(matches!(err, BotError::PdfError { .. }));
    }
}
