use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};

/// Next calendar day after `from`, advanced day-by-day past Saturday
/// and Sunday. Pure function of the input date.
pub fn next_business_day(from: NaiveDate) -> NaiveDate {
    let mut date = from + Duration::days(1);
    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date = date + Duration::days(1);
    }
    date
}

/// Due date for orders placed now, evaluated against the current UTC date
pub fn next_business_day_utc() -> NaiveDate {
    next_business_day(Utc::now().date_naive())
}
