//! Rupiah, date and relative-time formatting in Indonesian conventions.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc, Weekday};

use crate::utils::timezone::to_wib;

pub const CURRENCY_PREFIX: &str = "Rp";

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const SHORT_MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Thousands-grouped integer with `.` separators: `1234567` -> `1.234.567`.
pub fn format_number(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_currency(amount: f64) -> String {
    let body = format_number(amount.abs());
    if amount.round() < 0.0 {
        format!("-{} {}", CURRENCY_PREFIX, body)
    } else {
        format!("{} {}", CURRENCY_PREFIX, body)
    }
}

/// `Rp 1.5jt`, `Rp 2.3M`, `Rp 750.0rb`; amounts below one thousand use
/// [`format_currency`]. The unit is chosen after rounding, so 999.999
/// thousand reads as `Rp 1.0jt`.
pub fn format_compact_currency(amount: f64) -> String {
    const UNITS: [(f64, &str); 3] = [(1_000.0, "rb"), (1_000_000.0, "jt"), (1_000_000_000.0, "M")];

    let abs = amount.abs();
    let mut shown = abs.round();
    let mut suffix = None;
    for (unit, name) in UNITS {
        if shown < 1_000.0 {
            break;
        }
        shown = (abs / unit * 10.0).round() / 10.0;
        suffix = Some(name);
    }

    match suffix {
        Some(name) => {
            let sign = if amount < 0.0 { "-" } else { "" };
            format!("{}{} {:.1}{}", sign, CURRENCY_PREFIX, shown, name)
        }
        None => format_currency(amount),
    }
}

/// `+Rp 50.000` for income, `-Rp 50.000` for expenses.
pub fn format_signed_amount(amount: f64, is_income: bool) -> String {
    let sign = if is_income { '+' } else { '-' };
    format!("{}{}", sign, format_currency(amount.abs()))
}

pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

/// Parses user-typed rupiah input. Accepts `Rp` prefixes, `.` thousands
/// separators and `,` as the decimal mark.
pub fn parse_amount_input(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(CURRENCY_PREFIX)
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '.')
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePattern {
    /// `dd/MM/yyyy`
    Date,
    /// `HH:mm`
    Time,
    /// `dd/MM/yyyy HH:mm`
    DateTime,
    /// `dd/MM/yy`
    ShortDate,
    /// `dd/MM HH:mm`
    DayMonthTime,
}

impl DatePattern {
    pub fn chrono_format(&self) -> &'static str {
        match self {
            DatePattern::Date => "%d/%m/%Y",
            DatePattern::Time => "%H:%M",
            DatePattern::DateTime => "%d/%m/%Y %H:%M",
            DatePattern::ShortDate => "%d/%m/%y",
            DatePattern::DayMonthTime => "%d/%m %H:%M",
        }
    }
}

pub fn format_date(value: NaiveDateTime, pattern: DatePattern) -> String {
    value.format(pattern.chrono_format()).to_string()
}

/// Hand-written twin of [`format_date`]; both must stay byte-identical.
pub fn format_date_manual(value: NaiveDateTime, pattern: DatePattern) -> String {
    let date = format!(
        "{:02}/{:02}/{:04}",
        value.day(),
        value.month(),
        value.year()
    );
    let time = format!("{:02}:{:02}", value.hour(), value.minute());

    match pattern {
        DatePattern::Date => date,
        DatePattern::Time => time,
        DatePattern::DateTime => format!("{} {}", date, time),
        DatePattern::ShortDate => format!(
            "{:02}/{:02}/{:02}",
            value.day(),
            value.month(),
            value.year().rem_euclid(100)
        ),
        DatePattern::DayMonthTime => {
            format!("{:02}/{:02} {}", value.day(), value.month(), time)
        }
    }
}

/// Formats a backend instant in WIB.
pub fn format_wib(instant: DateTime<Utc>, pattern: DatePattern) -> String {
    format_date(to_wib(instant).naive_local(), pattern)
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

pub fn short_month_name(month: u32) -> &'static str {
    SHORT_MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

pub fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

/// `18 Oktober 2026`
pub fn format_long_date<D: Datelike>(value: &D) -> String {
    format!("{} {} {}", value.day(), month_name(value.month()), value.year())
}

/// `Oktober 2026`
pub fn format_month_year<D: Datelike>(value: &D) -> String {
    format!("{} {}", month_name(value.month()), value.year())
}

/// `18 Okt`
pub fn format_short_day_month<D: Datelike>(value: &D) -> String {
    format!("{} {}", value.day(), short_month_name(value.month()))
}

pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed.num_seconds() < 60 {
        return "Baru saja".to_string();
    }

    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return format!("{} menit lalu", minutes);
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{} jam lalu", hours);
    }

    let days = elapsed.num_days();
    if days < 7 {
        format!("{} hari lalu", days)
    } else if days < 30 {
        format!("{} minggu lalu", days / 7)
    } else if days < 365 {
        format!("{} bulan lalu", days / 30)
    } else {
        format!("{} tahun lalu", days / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(1234567.0), "Rp 1.234.567");
        assert_eq!(format_currency(0.0), "Rp 0");
        assert_eq!(format_currency(999.0), "Rp 999");
        assert_eq!(format_currency(1000.0), "Rp 1.000");
        assert_eq!(format_currency(1500.6), "Rp 1.501");
        assert_eq!(format_currency(-25000.0), "-Rp 25.000");
        assert_eq!(format_currency(-0.2), "Rp 0");
    }

    #[test]
    fn test_format_compact_currency_buckets() {
        assert_eq!(format_compact_currency(1500000.0), "Rp 1.5jt");
        assert_eq!(format_compact_currency(2000000000.0), "Rp 2.0M");
        assert_eq!(format_compact_currency(750000.0), "Rp 750.0rb");
        assert_eq!(format_compact_currency(1000.0), "Rp 1.0rb");
        assert_eq!(format_compact_currency(999.0), "Rp 999");
        assert_eq!(format_compact_currency(-1500000.0), "-Rp 1.5jt");
    }

    #[test]
    fn test_format_compact_currency_rounds_before_choosing_unit() {
        assert_eq!(format_compact_currency(999_999.0), "Rp 1.0jt");
        assert_eq!(format_compact_currency(999_999_999.0), "Rp 1.0M");
        assert_eq!(format_compact_currency(999.6), "Rp 1.0rb");
        assert_eq!(format_compact_currency(950_000.0), "Rp 950.0rb");
        assert_eq!(format_compact_currency(-999_999.0), "-Rp 1.0jt");
    }

    #[test]
    fn test_format_signed_amount() {
        assert_eq!(format_signed_amount(50000.0, true), "+Rp 50.000");
        assert_eq!(format_signed_amount(50000.0, false), "-Rp 50.000");
        assert_eq!(format_signed_amount(-50000.0, false), "-Rp 50.000");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(45.456, 1), "45.5%");
        assert_eq!(format_percentage(100.0, 0), "100%");
    }

    #[test]
    fn test_parse_amount_input() {
        assert_eq!(parse_amount_input("1.234.567"), Some(1234567.0));
        assert_eq!(parse_amount_input("Rp 50.000"), Some(50000.0));
        assert_eq!(parse_amount_input("1.234,50"), Some(1234.5));
        assert_eq!(parse_amount_input(""), None);
        assert_eq!(parse_amount_input("abc"), None);
    }

    #[test]
    fn test_date_patterns_match_manual_formatter() {
        let values = [
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(7, 3, 0).unwrap(),
            NaiveDate::from_ymd_opt(2009, 12, 31).unwrap().and_hms_opt(23, 59, 59).unwrap(),
            NaiveDate::from_ymd_opt(2030, 6, 15).unwrap().and_hms_opt(0, 0, 0).unwrap(),
        ];
        let patterns = [
            DatePattern::Date,
            DatePattern::Time,
            DatePattern::DateTime,
            DatePattern::ShortDate,
            DatePattern::DayMonthTime,
        ];
        for value in values {
            for pattern in patterns {
                assert_eq!(
                    format_date(value, pattern),
                    format_date_manual(value, pattern),
                    "{:?} {:?}",
                    value,
                    pattern
                );
            }
        }
    }

    #[test]
    fn test_date_pattern_literals() {
        let value = NaiveDate::from_ymd_opt(2009, 3, 7)
            .unwrap()
            .and_hms_opt(8, 5, 0)
            .unwrap();
        assert_eq!(format_date(value, DatePattern::Date), "07/03/2009");
        assert_eq!(format_date(value, DatePattern::Time), "08:05");
        assert_eq!(format_date(value, DatePattern::DateTime), "07/03/2009 08:05");
        assert_eq!(format_date(value, DatePattern::ShortDate), "07/03/09");
        assert_eq!(format_date(value, DatePattern::DayMonthTime), "07/03 08:05");
    }

    #[test]
    fn test_format_wib_shifts_to_local_time() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 31, 20, 30, 0).unwrap();
        assert_eq!(format_wib(instant, DatePattern::DateTime), "01/02/2024 03:30");
    }

    #[test]
    fn test_indonesian_names() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(format_long_date(&date), "18 Oktober 2026");
        assert_eq!(format_month_year(&date), "Oktober 2026");
        assert_eq!(format_short_day_month(&date), "18 Okt");
        assert_eq!(day_name(date.weekday()), "Minggu");
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let cases = [
            (Duration::seconds(30), "Baru saja"),
            (Duration::seconds(-300), "Baru saja"),
            (Duration::minutes(1), "1 menit lalu"),
            (Duration::minutes(59), "59 menit lalu"),
            (Duration::minutes(90), "1 jam lalu"),
            (Duration::hours(23), "23 jam lalu"),
            (Duration::days(1), "1 hari lalu"),
            (Duration::days(6), "6 hari lalu"),
            (Duration::days(7), "1 minggu lalu"),
            (Duration::days(29), "4 minggu lalu"),
            (Duration::days(30), "1 bulan lalu"),
            (Duration::days(364), "12 bulan lalu"),
            (Duration::days(365), "1 tahun lalu"),
            (Duration::days(800), "2 tahun lalu"),
        ];
        for (ago, expected) in cases {
            assert_eq!(format_relative_time(now - ago, now), expected, "{:?}", ago);
        }
    }
}
