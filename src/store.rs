use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use tracing::warn;

use crate::error::StoreResult;
use crate::records::{ExerciseEntry, KholleEntry, PlanningEntry};

/// The three lists of the record file, decoded from their row-major form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerData {
    pub planning: Vec<PlanningEntry>,
    pub exercices: Vec<ExerciseEntry>,
    pub kholles: Vec<KholleEntry>,
}

/// How the record file was obtained. Both fallback cases resolve to the empty
/// default, but they stay distinguishable for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded,
    MissingFile,
    Malformed(String),
}

fn rows_of(doc: &Value, key: &str) -> Vec<Vec<Value>> {
    match doc.get(key) {
        Some(Value::Array(rows)) => rows
            .iter()
            .filter_map(|row| match row {
                Value::Array(cells) => Some(cells.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

impl TrackerData {
    /// Loads the record file, substituting the empty default when the file is
    /// absent or unreadable as JSON.
    pub fn load(path: &Path) -> (Self, LoadOutcome) {
        if !path.exists() {
            return (Self::default(), LoadOutcome::MissingFile);
        }
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %path.display(), %err, "record file unreadable, starting empty");
                return (Self::default(), LoadOutcome::Malformed(err.to_string()));
            }
        };
        let doc: Value = match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(err) => {
                warn!(path = %path.display(), %err, "record file malformed, starting empty");
                return (Self::default(), LoadOutcome::Malformed(err.to_string()));
            }
        };
        if !doc.is_object() {
            warn!(path = %path.display(), "record file is not a JSON object, starting empty");
            return (
                Self::default(),
                LoadOutcome::Malformed("le fichier n'est pas un objet JSON".into()),
            );
        }

        let data = Self {
            planning: rows_of(&doc, "planning")
                .iter()
                .map(|row| PlanningEntry::from_row(row))
                .collect(),
            exercices: rows_of(&doc, "exercices")
                .iter()
                .map(|row| ExerciseEntry::from_row(row))
                .collect(),
            kholles: rows_of(&doc, "kholles")
                .iter()
                .map(|row| KholleEntry::from_row(row))
                .collect(),
        };
        (data, LoadOutcome::Loaded)
    }

    /// Flattens the three lists back to row-major arrays and overwrites the
    /// file in full. Last save wins; there is no merge.
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let doc = json!({
            "planning": self.planning.iter().map(PlanningEntry::to_row).collect::<Vec<_>>(),
            "exercices": self.exercices.iter().map(ExerciseEntry::to_row).collect::<Vec<_>>(),
            "kholles": self.kholles.iter().map(KholleEntry::to_row).collect::<Vec<_>>(),
        });
        fs::write(path, serde_json::to_string_pretty(&doc)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn absent_file_yields_empty_lists() {
        let dir = tempdir().unwrap();
        let (data, outcome) = TrackerData::load(&dir.path().join("mpsi_data.json"));
        assert_eq!(outcome, LoadOutcome::MissingFile);
        assert_eq!(data, TrackerData::default());
    }

    #[test]
    fn malformed_file_yields_empty_lists_with_reason() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mpsi_data.json");
        fs::write(&path, "{not json").unwrap();
        let (data, outcome) = TrackerData::load(&path);
        assert_eq!(data, TrackerData::default());
        assert!(matches!(outcome, LoadOutcome::Malformed(_)));
    }

    #[test]
    fn non_object_document_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mpsi_data.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let (data, outcome) = TrackerData::load(&path);
        assert_eq!(data, TrackerData::default());
        assert!(matches!(outcome, LoadOutcome::Malformed(_)));
    }

    #[test]
    fn missing_keys_decode_as_empty_lists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mpsi_data.json");
        fs::write(&path, r#"{"planning": [["12/05/2024", "Maths", "DS", "", "À venir"]]}"#)
            .unwrap();
        let (data, outcome) = TrackerData::load(&path);
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(data.planning.len(), 1);
        assert_eq!(
            data.planning[0].date,
            NaiveDate::from_ymd_opt(2024, 5, 12)
        );
        assert!(data.exercices.is_empty());
        assert!(data.kholles.is_empty());
    }

    #[test]
    fn save_then_load_round_trips_by_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mpsi_data.json");
        let data = TrackerData {
            planning: vec![PlanningEntry {
                date: NaiveDate::from_ymd_opt(2024, 5, 12),
                subject: "Physique".into(),
                kind: "Colle".into(),
                description: "Optique".into(),
                status: "Terminé".into(),
            }],
            exercices: vec![ExerciseEntry {
                subject: "Maths".into(),
                chapter: "Suites".into(),
                reference: "Ex 4.2".into(),
                state: "En cours".into(),
            }],
            kholles: vec![KholleEntry {
                date: None,
                subject: "Anglais".into(),
                examiner: "Mme Roux".into(),
            }],
        };
        data.save(&path).unwrap();
        let (reloaded, outcome) = TrackerData::load(&path);
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(reloaded, data);
    }

    #[test]
    fn non_array_rows_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mpsi_data.json");
        fs::write(
            &path,
            r#"{"exercices": ["oops", ["Info", "Tris", "TD 3", "À faire"]]}"#,
        )
        .unwrap();
        let (data, _) = TrackerData::load(&path);
        assert_eq!(data.exercices.len(), 1);
        assert_eq!(data.exercices[0].chapter, "Tris");
    }
}
