use ics::{
    escape_text,
    properties::{Description, DtEnd, DtStart, Summary, URL},
    ICalendar,
};
use log::warn;

use crate::{DateKey, ExportError, ScheduleStore, Session};

pub const FILE_NAME: &str = "course_schedule.ics";
pub const CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

const PRODID: &str = "-//hacksw/handcal//NONSGML v1.0//EN";
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub calendar: String,
    pub skipped: Vec<Skipped>,
}

/// A populated cell that could not be turned into an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub date: DateKey,
    pub course: String,
    pub error: ExportError,
}

impl ScheduleStore {
    /// Builds one floating-time event per (date, course) cell, dates in
    /// calendar order and courses in insertion order.
    #[must_use]
    pub fn to_ics(&self) -> (ICalendar<'_>, Vec<Skipped>) {
        let mut icalendar = ICalendar::new("2.0", PRODID);
        let mut skipped = Vec::new();

        for date in self.all_dates() {
            for (index, course) in self.courses().iter().enumerate() {
                let Some(session) = course.sessions.get(&date) else {
                    continue;
                };

                let link = self
                    .teacher_link(&course.name, &session.instructor)
                    .unwrap_or_default();

                match session_event(&date, index, &course.name, session, link) {
                    Ok(event) => icalendar.add_event(event),
                    Err(error) => {
                        warn!("Skipping `{}` on {date}: {error}", course.name);
                        skipped.push(Skipped {
                            date: date.clone(),
                            course: course.name.clone(),
                            error,
                        });
                    }
                }
            }
        }

        (icalendar, skipped)
    }

    #[must_use]
    pub fn export(&self) -> Export {
        let (icalendar, skipped) = self.to_ics();

        Export {
            calendar: icalendar.to_string(),
            skipped,
        }
    }
}

fn session_event<'a>(
    date: &DateKey,
    index: usize,
    course: &'a str,
    session: &Session,
    link: &'a str,
) -> Result<ics::Event<'a>, ExportError> {
    let day = date
        .date()
        .ok_or_else(|| ExportError::Date(date.to_string()))?;
    let (start, end) = session.time_range()?;

    let start = day.and_time(start).format(TIMESTAMP_FORMAT).to_string();
    let end = day.and_time(end).format(TIMESTAMP_FORMAT).to_string();

    // Course position keeps ids apart when names differ only in spaces.
    let id = format!("{}_{}_{}", start, index, course.replace(' ', "-"));

    let mut ics_event = ics::Event::new(id, format!("{start}Z"));

    ics_event.push(DtStart::new(start));
    ics_event.push(DtEnd::new(end));
    ics_event.push(Summary::new(escape_text(course)));
    ics_event.push(Description::new(escape_text(format!(
        "Teacher: {}\nLink: {link}",
        session.instructor
    ))));
    ics_event.push(URL::new(link));

    Ok(ics_event)
}

#[cfg(test)]
mod test {
    use crate::{DateKey, ExportError, ScheduleStore, Skipped};

    const HEADER: &str = "#\tDate\tTeacher\tHours";

    fn algorithms() -> ScheduleStore {
        let mut store = ScheduleStore::new();
        store.add_course(
            "Algorithms",
            &format!("{HEADER}\n1\t01/01/2024\tDr. Cohen\t10:00 - 12:00"),
        );
        store
    }

    fn events(calendar: &str) -> Vec<&str> {
        calendar
            .split("BEGIN:VEVENT")
            .skip(1)
            .map(|block| block.split("END:VEVENT").next().unwrap())
            .collect()
    }

    #[test]
    fn test_export_single_event() {
        let export = algorithms().export();
        let calendar = export.calendar;

        assert!(calendar.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(calendar.contains("VERSION:2.0\r\n"));
        assert!(calendar.contains("PRODID:-//hacksw/handcal//NONSGML v1.0//EN\r\n"));
        assert!(calendar.trim_end().ends_with("END:VCALENDAR"));

        let events = events(&calendar);
        assert_eq!(events.len(), 1);
        assert!(events[0].contains("UID:20240101T100000_0_Algorithms\r\n"));
        assert!(events[0].contains("DTSTAMP:20240101T100000Z\r\n"));
        assert!(events[0].contains("DTSTART:20240101T100000\r\n"));
        assert!(events[0].contains("DTEND:20240101T120000\r\n"));
        assert!(events[0].contains("SUMMARY:Algorithms\r\n"));
        assert!(events[0].contains("DESCRIPTION:Teacher: Dr. Cohen\\nLink: \r\n"));
        assert!(events[0].contains("URL:\r\n"));
        assert!(export.skipped.is_empty());
    }

    #[test]
    fn test_export_uses_teacher_link() {
        let mut store = algorithms();
        store.set_teacher_link("Algorithms", "Dr. Cohen", "https://meet.example/c");

        let calendar = store.export().calendar;
        assert!(calendar.contains("DESCRIPTION:Teacher: Dr. Cohen\\nLink: https://meet.example/c\r\n"));
        assert!(calendar.contains("URL:https://meet.example/c\r\n"));
    }

    #[test]
    fn test_export_escapes_text() {
        let mut store = ScheduleStore::new();
        store.add_course(
            "Logic; Sets",
            &format!("{HEADER}\n1\t01/01/2024\tCohen, Jr.\t10:00 - 12:00"),
        );

        let calendar = store.export().calendar;
        assert!(calendar.contains("SUMMARY:Logic\\; Sets\r\n"));
        assert!(calendar.contains("DESCRIPTION:Teacher: Cohen\\, Jr.\\nLink: \r\n"));
    }

    #[test]
    fn test_export_order() {
        let mut store = ScheduleStore::new();
        store.add_course(
            "Databases",
            &format!(
                "{HEADER}\n1\t02/01/2024\tDr. Levi\t09:00 - 11:00\n2\t01/01/2024\tDr. Levi\t14:00 - 16:00"
            ),
        );
        store.add_course(
            "Algorithms",
            &format!("{HEADER}\n1\t01/01/2024\tDr. Cohen\t10:00 - 12:00"),
        );
        store.set_task(DateKey::new("03/01/2024"), "Homework 1");

        let calendar = store.export().calendar;
        let starts = events(&calendar)
            .into_iter()
            .map(|event| {
                event
                    .lines()
                    .find_map(|line| line.strip_prefix("DTSTART:"))
                    .unwrap()
                    .to_owned()
            })
            .collect::<Vec<_>>();

        assert_eq!(
            starts,
            vec!["20240101T140000", "20240101T100000", "20240102T090000"]
        );
    }

    #[test]
    fn test_export_skips_malformed_hours() {
        let mut store = algorithms();
        store.add_course(
            "Databases",
            &format!("{HEADER}\n1\t01/01/2024\tDr. Levi\tmorning"),
        );

        let export = store.export();
        assert_eq!(events(&export.calendar).len(), 1);
        assert_eq!(
            export.skipped,
            vec![Skipped {
                date: DateKey::new("01/01/2024"),
                course: "Databases".to_owned(),
                error: ExportError::HoursRange("morning".to_owned()),
            }]
        );
    }

    #[test]
    fn test_export_skips_undecodable_date() {
        let mut store = ScheduleStore::new();
        store.add_course(
            "Algorithms",
            &format!("{HEADER}\n1\t2024-01-01\tDr. Cohen\t10:00 - 12:00"),
        );

        let export = store.export();
        assert!(events(&export.calendar).is_empty());
        assert_eq!(
            export.skipped,
            vec![Skipped {
                date: DateKey::new("2024-01-01"),
                course: "Algorithms".to_owned(),
                error: ExportError::Date("2024-01-01".to_owned()),
            }]
        );
    }

    #[test]
    fn test_export_skips_overnight_hours() {
        let mut store = algorithms();
        store.add_course(
            "Databases",
            &format!("{HEADER}\n1\t01/01/2024\tDr. Levi\t22:00 - 01:00"),
        );

        let export = store.export();
        assert_eq!(events(&export.calendar).len(), 1);
        assert!(!export.calendar.contains("SUMMARY:Databases"));
        assert_eq!(
            export.skipped[0].error,
            ExportError::EndBeforeStart("22:00 - 01:00".to_owned())
        );
    }

    #[test]
    fn test_export_uids_are_distinct() {
        let mut store = ScheduleStore::new();
        let text = format!("{HEADER}\n1\t01/01/2024\tDr. Cohen\t10:00 - 12:00");
        store.add_course("Data Bases", &text);
        store.add_course("Data-Bases", &text);

        let calendar = store.export().calendar;
        let uids = calendar
            .lines()
            .filter(|line| line.starts_with("UID:"))
            .collect::<Vec<_>>();

        assert_eq!(uids.len(), 2);
        assert_ne!(uids[0], uids[1]);
    }

    #[test]
    fn test_export_is_idempotent() {
        let mut store = algorithms();
        store.set_task(DateKey::new("15/02/2024"), "Homework 1");

        assert_eq!(store.export(), store.export());
    }

    #[test]
    fn test_export_empty_store() {
        let calendar = ScheduleStore::new().export().calendar;
        assert!(events(&calendar).is_empty());
        assert!(calendar.contains("BEGIN:VCALENDAR"));
        assert!(calendar.contains("END:VCALENDAR"));
    }
}
