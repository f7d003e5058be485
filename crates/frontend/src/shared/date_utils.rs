//! Local calendar helpers for form defaults.

use chrono::{Datelike, Local, NaiveDate};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `YYYY-MM-DD`, the value format of `<input type="date">`.
pub fn today_iso() -> String {
    today().format("%Y-%m-%d").to_string()
}

/// `(month, year)` of the month before `date`.
pub fn previous_month(date: NaiveDate) -> (u32, i32) {
    if date.month() == 1 {
        (12, date.year() - 1)
    } else {
        (date.month() - 1, date.year())
    }
}

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_month_wraps_the_year() {
        let jan = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(previous_month(jan), (12, 2024));
        let jul = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert_eq!(previous_month(jul), (6, 2025));
    }
}
