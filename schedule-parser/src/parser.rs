use std::collections::HashMap;

use log::debug;

use crate::{DateKey, Session};

/// Sessions and instructors read from one pasted course block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCourse {
    pub sessions: HashMap<DateKey, Session>,
    /// Distinct instructors in the order they first appear.
    pub instructors: Vec<String>,
}

/// Parses tab separated rows of `<label>\t<date>\t<instructor>\t<hours>`.
///
/// The first line is a header and is ignored. Rows missing any of date,
/// instructor or hours are dropped. A later row for the same date replaces
/// the earlier one.
pub fn parse_course<S: AsRef<str>>(s: S) -> ParsedCourse {
    let mut parsed = ParsedCourse::default();

    for (idx, line) in s.as_ref().trim().lines().enumerate().skip(1) {
        let Some((date, session)) = parse_row(line) else {
            debug!("Skipping incomplete row on line {}", idx + 1);
            continue;
        };

        if !parsed.instructors.contains(&session.instructor) {
            parsed.instructors.push(session.instructor.clone());
        }

        parsed.sessions.insert(date, session);
    }

    parsed
}

fn parse_row(line: &str) -> Option<(DateKey, Session)> {
    let mut fields = line
        .split('\t')
        .skip(1)
        .map(|field| Some(field).filter(|field| !field.is_empty()));

    let date = fields.next()??;
    let instructor = fields.next()??;
    let hours = fields.next()??;

    Some((
        DateKey::new(date),
        Session {
            instructor: instructor.to_owned(),
            hours: hours.to_owned(),
        },
    ))
}
