use crate::adapters::telegram::parse_recipient;
use crate::utils::error::{BotError, Result};
use chrono::{FixedOffset, NaiveTime};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> BotError {
    BotError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(field_name, url_str, format!("Invalid URL format: {}", e))),
    }
}

/// 模板需包含 `{month}`，代入後須為合法 URL
pub fn validate_url_template(field_name: &str, template: &str) -> Result<()> {
    if !template.contains("{month}") {
        return Err(invalid(field_name, template, "Template must contain {month}"));
    }
    let sample = template.replace("{month}", "January").replace("{year}", "2025");
    validate_url(field_name, &sample).map_err(|_| invalid(field_name, template, "Template does not form a valid http(s) URL"))
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| BotError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// `HH:MM`, 24 小時制
pub fn parse_send_time(field_name: &str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| invalid(field_name, value, "Expected a 24-hour time like 19:25"))
}

/// `+05:30`, `-04:00`, `Z`
pub fn parse_utc_offset(field_name: &str, value: &str) -> Result<FixedOffset> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| invalid(field_name, value, "Offset out of range"));
    }

    let (sign, rest) = match trimmed.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(invalid(field_name, value, "Offset must start with + or -")),
    };

    let (hours, minutes) = rest
        .split_once(':')
        .ok_or_else(|| invalid(field_name, value, "Expected an offset like +05:30"))?;
    let hours: i32 = hours
        .parse()
        .map_err(|_| invalid(field_name, value, "Offset hours are not a number"))?;
    let minutes: i32 = minutes
        .parse()
        .map_err(|_| invalid(field_name, value, "Offset minutes are not a number"))?;
    validate_range(field_name, hours, 0, 14)?;
    validate_range(field_name, minutes, 0, 59)?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| invalid(field_name, value, "Offset out of range"))
}

pub fn validate_chat_id(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    parse_recipient(value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("timetable_url", "https://example.com").is_ok());
        assert!(validate_url("timetable_url", "http://example.com").is_ok());
        assert!(validate_url("timetable_url", "").is_err());
        assert!(validate_url("timetable_url", "invalid-url").is_err());
        assert!(validate_url("timetable_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_url_template() {
        assert!(validate_url_template("t", "https://example.com/{month}-{year}.pdf").is_ok());
        assert!(validate_url_template("t", "https://example.com/static.pdf").is_err());
        assert!(validate_url_template("t", "{month}.pdf").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("poll_interval_secs", 20, 1).is_ok());
        assert!(validate_positive_number("poll_interval_secs", 0, 1).is_err());
    }

    #[test]
    fn test_parse_send_time() {
        let time = parse_send_time("send_at", "19:25").unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(19, 25, 0).unwrap());
        assert!(parse_send_time("send_at", "7:25 pm").is_err());
        assert!(parse_send_time("send_at", "25:00").is_err());
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(
            parse_utc_offset("utc_offset", "+05:30").unwrap().local_minus_utc(),
            5 * 3600 + 30 * 60
        );
        assert_eq!(
            parse_utc_offset("utc_offset", "-04:00").unwrap().local_minus_utc(),
            -4 * 3600
        );
        assert_eq!(parse_utc_offset("utc_offset", "Z").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("utc_offset", "05:30").is_err());
        assert!(parse_utc_offset("utc_offset", "+5").is_err());
        assert!(parse_utc_offset("utc_offset", "+05:75").is_err());
    }

    #[test]
    fn test_validate_chat_id() {
        assert!(validate_chat_id("chat_id", "-1001234567890").is_ok());
        assert!(validate_chat_id("chat_id", "@prayer_times").is_ok());
        assert!(validate_chat_id("chat_id", "@").is_err());
        assert!(validate_chat_id("chat_id", "not a chat").is_err());
        assert!(validate_chat_id("chat_id", "  ").is_err());
    }
}
