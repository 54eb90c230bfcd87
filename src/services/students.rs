//! Roster queries

use crate::{
    error::{AppResult, AttendanceError},
    models::student::{normalize_student_id, Student},
    repository::Repository,
};

#[derive(Clone)]
pub struct StudentsService {
    repository: Repository,
}

impl StudentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All students, ordered by name
    pub fn list(&self) -> Vec<Student> {
        let mut students = self.repository.roster.all().to_vec();
        students.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        students
    }

    pub fn get(&self, student_id: &str) -> AppResult<Student> {
        self.repository
            .roster
            .get(student_id)
            .cloned()
            .ok_or_else(|| AttendanceError::UnknownStudent(normalize_student_id(student_id)).into())
    }

    pub fn count(&self) -> usize {
        self.repository.roster.len()
    }
}
