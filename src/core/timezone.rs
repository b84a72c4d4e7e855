use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Utc};

/// Calendar of the business: all "today", "start of year" and "start of month"
/// questions are answered in the business' fixed UTC offset (Gulf time by default),
/// while audit timestamps stay in UTC.
#[derive(Debug, Clone, Copy)]
pub struct BusinessCalendar {
    offset: FixedOffset,
}

impl BusinessCalendar {
    /// Build a calendar for a whole-hour UTC offset; out-of-range offsets fall back to UTC
    pub fn new(utc_offset_hours: i32) -> Self {
        let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    /// Business-local date for a UTC instant
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }

    pub fn start_of_year(&self, date: NaiveDate) -> NaiveDate {
        NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
    }

    pub fn start_of_month(&self, date: NaiveDate) -> NaiveDate {
        NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
    }
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self::new(4)
    }
}
