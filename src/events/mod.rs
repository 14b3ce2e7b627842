//! Work-event generation: expands an employee's schedule descriptor over a
//! calendar period into a sorted list of dated events.

pub mod generator;
pub mod model;

pub use generator::{InvalidInput, generate};
pub use model::{
    DayOffData, EmployeeSummary, GenerateEventsInput, PaydayData, Period, PublicHoliday,
    WorkCalendar, WorkEvent,
};
