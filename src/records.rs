use chrono::NaiveDate;
use serde_json::Value;

use crate::dates;

pub const PLANNING_COLUMNS: [&str; 5] = ["Date", "Matière", "Type", "Description", "Statut"];
pub const EXERCISE_COLUMNS: [&str; 4] = ["Matière", "Chapitre", "Réf", "État"];
pub const KHOLLE_COLUMNS: [&str; 3] = ["Date", "Matière", "Colleur"];

pub const PLANNING_SUBJECTS: [&str; 7] = [
    "Maths", "Physique", "Chimie", "SII", "Info", "Français", "Anglais",
];
pub const PLANNING_TYPES: [&str; 5] = ["DS", "DM", "Colle", "Examen", "Autre"];
pub const PLANNING_STATUSES: [&str; 4] = ["À venir", "En cours", "Terminé", "Reporté"];
pub const EXERCISE_SUBJECTS: [&str; 5] = ["Maths", "Physique", "Chimie", "SII", "Info"];
pub const EXERCISE_STATES: [&str; 3] = ["À faire", "En cours", "Terminé"];
pub const KHOLLE_SUBJECTS: [&str; 7] = [
    "Maths", "Physique", "Chimie", "SII", "Info", "Anglais", "Français",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanningEntry {
    pub date: Option<NaiveDate>,
    pub subject: String,
    pub kind: String,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseEntry {
    pub subject: String,
    pub chapter: String,
    pub reference: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KholleEntry {
    pub date: Option<NaiveDate>,
    pub subject: String,
    pub examiner: String,
}

/// Cell at `idx` of a row-major record, normalized to text. Missing cells and
/// JSON nulls become the empty string; stray scalars are stringified.
fn text_cell(row: &[Value], idx: usize) -> String {
    match row.get(idx) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn date_cell(row: &[Value], idx: usize) -> Option<NaiveDate> {
    dates::parse_lenient(&text_cell(row, idx))
}

impl PlanningEntry {
    pub fn from_row(row: &[Value]) -> Self {
        Self {
            date: date_cell(row, 0),
            subject: text_cell(row, 1),
            kind: text_cell(row, 2),
            description: text_cell(row, 3),
            status: text_cell(row, 4),
        }
    }

    pub fn to_row(&self) -> Vec<Value> {
        vec![
            Value::String(dates::to_storage(self.date)),
            Value::String(self.subject.clone()),
            Value::String(self.kind.clone()),
            Value::String(self.description.clone()),
            Value::String(self.status.clone()),
        ]
    }
}

impl ExerciseEntry {
    pub fn from_row(row: &[Value]) -> Self {
        Self {
            subject: text_cell(row, 0),
            chapter: text_cell(row, 1),
            reference: text_cell(row, 2),
            state: text_cell(row, 3),
        }
    }

    pub fn to_row(&self) -> Vec<Value> {
        vec![
            Value::String(self.subject.clone()),
            Value::String(self.chapter.clone()),
            Value::String(self.reference.clone()),
            Value::String(self.state.clone()),
        ]
    }
}

impl KholleEntry {
    pub fn from_row(row: &[Value]) -> Self {
        Self {
            date: date_cell(row, 0),
            subject: text_cell(row, 1),
            examiner: text_cell(row, 2),
        }
    }

    pub fn to_row(&self) -> Vec<Value> {
        vec![
            Value::String(dates::to_storage(self.date)),
            Value::String(self.subject.clone()),
            Value::String(self.examiner.clone()),
        ]
    }
}
