//! Read-only student roster

use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::student::{normalize_student_id, Student},
};

/// Snapshot of the students known to the server, loaded once at start-up
#[derive(Debug, Clone)]
pub struct Roster {
    students: Vec<Student>,
    by_id: HashMap<String, usize>,
}

impl Roster {
    /// Build the roster, normalizing IDs and rejecting duplicates
    pub fn new(students: impl IntoIterator<Item = Student>) -> AppResult<Self> {
        let mut roster = Self {
            students: Vec::new(),
            by_id: HashMap::new(),
        };

        for student in students {
            let student = Student::new(&student.id, student.name, student.grade);
            if student.id.is_empty() {
                return Err(AppError::Validation("Roster contains an empty student ID".into()));
            }
            if roster.by_id.contains_key(&student.id) {
                return Err(AppError::Validation(format!(
                    "Duplicate student ID {} in roster",
                    student.id
                )));
            }
            roster.by_id.insert(student.id.clone(), roster.students.len());
            roster.students.push(student);
        }

        Ok(roster)
    }

    /// Look up a student, case-insensitively
    pub fn get(&self, student_id: &str) -> Option<&Student> {
        self.by_id
            .get(&normalize_student_id(student_id))
            .map(|&idx| &self.students[idx])
    }

    /// Students in roster order
    pub fn all(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
