use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Period {
    pub from: String,
    pub to: String,
}

/// A public holiday as supplied by the holiday lookup: a numeric
/// day/month/year triple plus the localized name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicHoliday {
    pub date: u32,
    pub month: u32,
    pub year: i32,
    #[serde(rename = "englishName")]
    pub english_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateEventsInput {
    pub name: String,
    /// Personal holiday dates in `DD/MM/YYYY` form, matched by string
    /// equality against the formatted dates of the period.
    pub holidays: Vec<String>,
    /// Monthly salary, passed through on payday events.
    pub income: f64,
    pub work_start: String,
    pub work_end: String,
    pub lunch_start: String,
    pub lunch_end: String,
    /// Weekday numbers the employee works, 1 = Sunday through 7 = Saturday.
    pub work_days: Vec<u32>,
    pub period: Period,
    /// Day-of-month pattern, e.g. `"01"`. Matched textually against the
    /// zero-padded day component of each date.
    pub payment_day: String,
    pub payment_time: String,
    /// Used by callers to fetch `public_holidays`; ignored by the generator.
    pub country: String,
    pub currency: String,
    pub public_holidays: Vec<PublicHoliday>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayOffData {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaydayData {
    pub amount: f64,
    pub currency: String,
}

/// A single calendar event. Day-off events carry no time and sort at the
/// start of their date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkEvent {
    DayOff { date: String, data: DayOffData },
    ArrivesAtWork { date: String, time: String },
    LeavesForLunch { date: String, time: String },
    ArrivesFromLunch { date: String, time: String },
    LeavesFromWork { date: String, time: String },
    Payday { date: String, time: String, data: PaydayData },
}

impl WorkEvent {
    pub fn date(&self) -> &str {
        match self {
            WorkEvent::DayOff { date, .. }
            | WorkEvent::ArrivesAtWork { date, .. }
            | WorkEvent::LeavesForLunch { date, .. }
            | WorkEvent::ArrivesFromLunch { date, .. }
            | WorkEvent::LeavesFromWork { date, .. }
            | WorkEvent::Payday { date, .. } => date,
        }
    }

    pub fn time(&self) -> Option<&str> {
        match self {
            WorkEvent::DayOff { .. } => None,
            WorkEvent::ArrivesAtWork { time, .. }
            | WorkEvent::LeavesForLunch { time, .. }
            | WorkEvent::ArrivesFromLunch { time, .. }
            | WorkEvent::LeavesFromWork { time, .. }
            | WorkEvent::Payday { time, .. } => Some(time),
        }
    }
}

/// Echo of the schedule the events were generated from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub name: String,
    pub income: f64,
    pub work_start: String,
    pub work_end: String,
    pub lunch_start: String,
    pub lunch_end: String,
    pub work_days: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkCalendar {
    pub period: Period,
    pub employee: EmployeeSummary,
    pub events: Vec<WorkEvent>,
}
