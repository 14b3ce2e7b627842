use chrono::{Datelike, NaiveDate};
use regex::Regex;
use thiserror::Error;

use crate::events::model::{
    DayOffData, EmployeeSummary, GenerateEventsInput, PaydayData, Period, WorkCalendar, WorkEvent,
};

/// Collected field-level validation failures, reported before any generation
/// happens.
#[derive(Debug, Error, PartialEq)]
#[error("Invalid Data: {}", .errors.join("; "))]
pub struct InvalidInput {
    pub errors: Vec<String>,
}

/// Composite sort key: (year, month, day, hour, minute). Events without a
/// time component use 00:00 and therefore sort ahead of timed events on the
/// same date.
type EventKey = (i32, u32, u32, u32, u32);

const MIDNIGHT: (u32, u32) = (0, 0);

/// Expands the schedule into a chronologically sorted list of events covering
/// `period.from ..= period.to`.
///
/// Every date in the period produces either exactly one day-off event or all
/// four work events, classified in this precedence order: personal holiday,
/// public holiday, non-work weekday, work day. Independently, a date whose
/// formatted day component matches `payment_day` also produces a payday
/// event.
pub fn generate(input: &GenerateEventsInput) -> Result<WorkCalendar, InvalidInput> {
    let schedule = validate(input)?;

    let public_holidays: Vec<(String, &str)> = input
        .public_holidays
        .iter()
        .map(|h| {
            (
                format!("{:02}/{:02}/{}", h.date, h.month, h.year),
                h.english_name.as_str(),
            )
        })
        .collect();

    let mut events: Vec<(EventKey, WorkEvent)> = Vec::new();
    let mut current = schedule.from;

    while current <= schedule.to {
        let formatted = format_date(current);
        let day_number = current.weekday().num_days_from_sunday() + 1;

        if input.holidays.iter().any(|h| h == &formatted) {
            events.push((
                key(current, MIDNIGHT),
                WorkEvent::DayOff {
                    date: formatted.clone(),
                    data: DayOffData {
                        name: "Personal".to_string(),
                    },
                },
            ));
        } else if let Some((_, name)) = public_holidays.iter().find(|(d, _)| d == &formatted) {
            events.push((
                key(current, MIDNIGHT),
                WorkEvent::DayOff {
                    date: formatted.clone(),
                    data: DayOffData {
                        name: (*name).to_string(),
                    },
                },
            ));
        } else if !input.work_days.contains(&day_number) {
            events.push((
                key(current, MIDNIGHT),
                WorkEvent::DayOff {
                    date: formatted.clone(),
                    data: DayOffData {
                        name: "Day off".to_string(),
                    },
                },
            ));
        } else {
            events.push((
                key(current, schedule.work_start),
                WorkEvent::ArrivesAtWork {
                    date: formatted.clone(),
                    time: input.work_start.clone(),
                },
            ));
            events.push((
                key(current, schedule.work_end),
                WorkEvent::LeavesFromWork {
                    date: formatted.clone(),
                    time: input.work_end.clone(),
                },
            ));
            events.push((
                key(current, schedule.lunch_start),
                WorkEvent::LeavesForLunch {
                    date: formatted.clone(),
                    time: input.lunch_start.clone(),
                },
            ));
            events.push((
                key(current, schedule.lunch_end),
                WorkEvent::ArrivesFromLunch {
                    date: formatted.clone(),
                    time: input.lunch_end.clone(),
                },
            ));
        }

        if schedule.payday.is_match(&formatted) {
            events.push((
                key(current, schedule.payment_time),
                WorkEvent::Payday {
                    date: formatted,
                    time: input.payment_time.clone(),
                    data: PaydayData {
                        amount: input.income,
                        currency: input.currency.clone(),
                    },
                },
            ));
        }

        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }

    // Stable sort: same-key events keep their emission order.
    events.sort_by_key(|(key, _)| *key);

    Ok(WorkCalendar {
        period: Period {
            from: input.period.from.clone(),
            to: input.period.to.clone(),
        },
        employee: EmployeeSummary {
            name: input.name.clone(),
            income: input.income,
            work_start: input.work_start.clone(),
            work_end: input.work_end.clone(),
            lunch_start: input.lunch_start.clone(),
            lunch_end: input.lunch_end.clone(),
            work_days: input.work_days.clone(),
        },
        events: events.into_iter().map(|(_, event)| event).collect(),
    })
}

struct ValidatedSchedule {
    from: NaiveDate,
    to: NaiveDate,
    work_start: (u32, u32),
    work_end: (u32, u32),
    lunch_start: (u32, u32),
    lunch_end: (u32, u32),
    payment_time: (u32, u32),
    payday: Regex,
}

fn validate(input: &GenerateEventsInput) -> Result<ValidatedSchedule, InvalidInput> {
    let mut errors = Vec::new();

    let from = parse_date(&input.period.from);
    if from.is_none() {
        errors.push(format!(
            "Invalid date '{}' for 'period.from': Required 'DD/MM/YYYY'",
            input.period.from
        ));
    }
    let to = parse_date(&input.period.to);
    if to.is_none() {
        errors.push(format!(
            "Invalid date '{}' for 'period.to': Required 'DD/MM/YYYY'",
            input.period.to
        ));
    }

    let mut time_field = |field: &str, value: &str| {
        let parsed = parse_time(value);
        if parsed.is_none() {
            errors.push(format!(
                "Invalid time '{}' for '{}': Required 'hh:mm[:ss]'",
                value, field
            ));
        }
        parsed.unwrap_or(MIDNIGHT)
    };

    let work_start = time_field("work_start", &input.work_start);
    let work_end = time_field("work_end", &input.work_end);
    let lunch_start = time_field("lunch_start", &input.lunch_start);
    let lunch_end = time_field("lunch_end", &input.lunch_end);
    let payment_time = time_field("payment_time", &input.payment_time);

    for &day in &input.work_days {
        if !(1..=7).contains(&day) {
            errors.push(format!(
                "Invalid value '{}' for 'work_days': Must be between 1 and 7",
                day
            ));
        }
    }

    if !input.income.is_finite() || input.income < 0.0 {
        errors.push(format!(
            "Invalid value '{}' for 'income': Must be above '0'",
            input.income
        ));
    }

    // The payment day is spliced into the pattern verbatim; a value that does
    // not compile is rejected here rather than mid-generation.
    let payday = Regex::new(&format!(r"^{}/\d{{1,2}}/\d{{4,}}$", input.payment_day));
    if payday.is_err() {
        errors.push(format!(
            "Invalid value '{}' for 'payment_day'",
            input.payment_day
        ));
    }

    if !errors.is_empty() {
        return Err(InvalidInput { errors });
    }

    match (from, to, payday) {
        (Some(from), Some(to), Ok(payday)) => Ok(ValidatedSchedule {
            from,
            to,
            work_start,
            work_end,
            lunch_start,
            lunch_end,
            payment_time,
            payday,
        }),
        _ => Err(InvalidInput {
            errors: vec!["Invalid input".to_string()],
        }),
    }
}

fn key(date: NaiveDate, time: (u32, u32)) -> EventKey {
    (date.year(), date.month(), date.day(), time.0, time.1)
}

/// Parses a `DD/MM/YYYY` date. Components need not be zero-padded.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('/');
    let day: u32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let year: i32 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses an `hh:mm[:ss]` time into hours and minutes; seconds are accepted
/// and ignored for ordering purposes.
fn parse_time(s: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return None;
    }

    let hour: u32 = parts[0].trim().parse().ok()?;
    let minute: u32 = parts[1].trim().parse().ok()?;
    if let Some(seconds) = parts.get(2) {
        let _: u32 = seconds.trim().parse().ok()?;
    }

    (hour < 24 && minute < 60).then_some((hour, minute))
}

fn format_date(date: NaiveDate) -> String {
    format!("{:02}/{:02}/{}", date.day(), date.month(), date.year())
}
