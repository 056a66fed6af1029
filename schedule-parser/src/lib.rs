//! Merges pasted course schedules, tasks and teacher links into one
//! date-ordered timetable and exports it as an iCalendar file.

mod axis;
mod error;
mod parser;
mod store;
mod structs;

#[cfg(feature = "ics")]
mod ics;

pub use axis::date_axis;
pub use error::ExportError;
pub use parser::{parse_course, ParsedCourse};
pub use store::ScheduleStore;
pub use structs::{
    Course, CourseTeachers, DateKey, ScheduleTable, Session, TableRow, TeacherLink,
};

#[cfg(feature = "ics")]
pub use self::ics::{Export, Skipped, CONTENT_TYPE, FILE_NAME};
