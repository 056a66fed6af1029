use std::collections::HashMap;

use chrono::NaiveDate;
use log::debug;

use crate::axis::date_axis;
use crate::parser::{parse_course, ParsedCourse};
use crate::{Course, CourseTeachers, DateKey, ScheduleTable, TableRow, TeacherLink};

/// Courses, tasks and teacher links for one editing session.
///
/// Courses keep the position of their first insertion. Nothing is ever
/// removed; every write replaces what was at its key.
#[derive(Debug, Clone, Default)]
pub struct ScheduleStore {
    courses: Vec<Course>,
    tasks: HashMap<DateKey, String>,
    links: HashMap<String, Vec<TeacherLink>>,
    revision: u64,
}

impl ScheduleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `text` and merges it as course `name`. Returns `false` without
    /// touching the store when either argument is empty.
    pub fn add_course(&mut self, name: &str, text: &str) -> bool {
        if name.is_empty() || text.is_empty() {
            return false;
        }

        self.merge_course(name, parse_course(text));
        true
    }

    /// Replaces the sessions of `name` and registers its instructors,
    /// keeping links that were already set.
    pub fn merge_course(&mut self, name: &str, parsed: ParsedCourse) {
        debug!(
            "Merging course `{name}` with {} sessions",
            parsed.sessions.len()
        );

        match self.courses.iter_mut().find(|course| course.name == name) {
            Some(course) => course.sessions = parsed.sessions,
            None => self.courses.push(Course {
                name: name.to_owned(),
                sessions: parsed.sessions,
            }),
        }

        let links = self.links.entry(name.to_owned()).or_default();
        for instructor in parsed.instructors {
            if !links.iter().any(|link| link.teacher == instructor) {
                links.push(TeacherLink {
                    teacher: instructor,
                    url: String::new(),
                });
            }
        }

        self.revision += 1;
    }

    pub fn set_task<S: Into<String>>(&mut self, date: DateKey, text: S) {
        self.tasks.insert(date, text.into());
        self.revision += 1;
    }

    /// Adds a task picked from a calendar. Empty text is ignored.
    pub fn add_task_on(&mut self, date: NaiveDate, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }

        self.set_task(DateKey::from(date), text);
        true
    }

    pub fn set_teacher_link(&mut self, course: &str, teacher: &str, url: &str) {
        let links = self.links.entry(course.to_owned()).or_default();

        match links.iter_mut().find(|link| link.teacher == teacher) {
            Some(link) => url.clone_into(&mut link.url),
            None => links.push(TeacherLink {
                teacher: teacher.to_owned(),
                url: url.to_owned(),
            }),
        }

        self.revision += 1;
    }

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course_names(&self) -> impl Iterator<Item = &str> {
        self.courses.iter().map(|course| course.name.as_str())
    }

    #[must_use]
    pub fn course(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.name == name)
    }

    #[must_use]
    pub fn tasks(&self) -> &HashMap<DateKey, String> {
        &self.tasks
    }

    #[must_use]
    pub fn task(&self, date: &DateKey) -> Option<&str> {
        self.tasks.get(date).map(String::as_str)
    }

    #[must_use]
    pub fn teacher_links(&self, course: &str) -> &[TeacherLink] {
        self.links.get(course).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn teacher_link(&self, course: &str, teacher: &str) -> Option<&str> {
        self.teacher_links(course)
            .iter()
            .find(|link| link.teacher == teacher)
            .map(|link| link.url.as_str())
    }

    /// Bumped by every write.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Every date that has a session in some course or a task, in calendar order.
    #[must_use]
    pub fn all_dates(&self) -> Vec<DateKey> {
        date_axis(
            self.courses
                .iter()
                .flat_map(|course| course.sessions.keys())
                .chain(self.tasks.keys()),
        )
    }

    #[must_use]
    pub fn table(&self) -> ScheduleTable {
        let rows = self
            .all_dates()
            .into_iter()
            .map(|date| TableRow {
                cells: self
                    .courses
                    .iter()
                    .map(|course| {
                        course
                            .sessions
                            .get(&date)
                            .map(ToString::to_string)
                            .unwrap_or_default()
                    })
                    .collect(),
                task: self.task(&date).unwrap_or_default().to_owned(),
                date,
            })
            .collect();

        let teachers = self
            .courses
            .iter()
            .map(|course| CourseTeachers {
                course: course.name.clone(),
                teachers: self.teacher_links(&course.name).to_vec(),
            })
            .collect();

        ScheduleTable {
            courses: self.course_names().map(str::to_owned).collect(),
            rows,
            teachers,
        }
    }
}
