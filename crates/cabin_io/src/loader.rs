//! Loader: read a local draw file, validate cross-references, and return a
//! typed `LoadedDraw` for the pipeline. No network I/O.
//!
//! Draw file shape:
//! `{ "drawing": {id, season}, "participants": [..], "periods": [..],
//!    "apartments": [..], "wishes": [..] }`

#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cabin_core::{Apartment, DrawInput, Participant, ParticipantId, Period, Wish};

use crate::{hasher, IoError};

/// Drawing the wishes were collected for. Carried through to the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DrawingMeta {
    pub id: String,
    pub season: String,
}

/// Wire shape of the draw file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DrawFile {
    pub drawing: DrawingMeta,
    pub participants: Vec<Participant>,
    pub periods: Vec<Period>,
    pub apartments: Vec<Apartment>,
    #[serde(default)]
    pub wishes: Vec<Wish>,
}

/// Validated input ready for the engine.
#[derive(Debug, Clone)]
pub struct LoadedDraw {
    pub source: PathBuf,
    pub drawing: DrawingMeta,
    /// Participants are restricted to those who submitted at least one wish.
    pub input: DrawInput,
    /// Participants listed in the file, wishes or not.
    pub catalog_participants: usize,
    /// SHA-256 of the file's canonical JSON.
    pub input_sha256: String,
}

/// Read, parse, and validate a draw file.
pub fn load_draw_file(path: &Path) -> Result<LoadedDraw, IoError> {
    let text = fs::read_to_string(path)
        .map_err(|e| IoError::Read(format!("{}: {e}", path.display())))?;
    let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| IoError::Json {
        pointer: "/".into(),
        msg: format!("{}: {e}", path.display()),
    })?;
    let input_sha256 = hasher::sha256_canonical(&value)?;
    let file: DrawFile = serde_json::from_value(value).map_err(|e| IoError::Json {
        pointer: "/".into(),
        msg: format!("{}: {e}", path.display()),
    })?;

    let catalog_participants = file.participants.len();
    let drawing = file.drawing.clone();
    let input = into_draw_input(file)?;
    info!(
        path = %path.display(),
        drawing = %drawing.id,
        participants = input.participants.len(),
        wishes = input.wishes.len(),
        sha256 = %input_sha256,
        "draw file loaded"
    );
    Ok(LoadedDraw {
        source: path.to_path_buf(),
        drawing,
        input,
        catalog_participants,
        input_sha256,
    })
}

/// Validate a parsed file and flatten it into engine tables.
pub fn into_draw_input(file: DrawFile) -> Result<DrawInput, IoError> {
    if file.drawing.id.trim().is_empty() {
        return Err(IoError::Validate("drawing.id must not be empty".into()));
    }

    let mut seen = BTreeSet::new();
    for p in &file.participants {
        if !seen.insert(&p.id) {
            return Err(IoError::Validate(format!("duplicate participant id {}", p.id)));
        }
    }

    let mut periods = BTreeMap::new();
    for p in file.periods {
        if p.start_date > p.end_date {
            return Err(IoError::Validate(format!(
                "period {} starts after it ends ({} > {})",
                p.id, p.start_date, p.end_date
            )));
        }
        let id = p.id.clone();
        if periods.insert(id.clone(), p).is_some() {
            return Err(IoError::Validate(format!("duplicate period id {id}")));
        }
    }

    let mut apartments = BTreeMap::new();
    for a in file.apartments {
        let id = a.id.clone();
        if apartments.insert(id.clone(), a).is_some() {
            return Err(IoError::Validate(format!("duplicate apartment id {id}")));
        }
    }

    for (i, w) in file.wishes.iter().enumerate() {
        if !seen.contains(&w.participant) {
            return Err(IoError::Validate(format!(
                "wishes[{i}]: unknown participant {}",
                w.participant
            )));
        }
        if !periods.contains_key(&w.period) {
            return Err(IoError::Validate(format!("wishes[{i}]: unknown period {}", w.period)));
        }
        if w.priority == 0 {
            return Err(IoError::Validate(format!("wishes[{i}]: priority must be >= 1")));
        }
        if w.apartments.is_empty() {
            return Err(IoError::Validate(format!("wishes[{i}]: no apartments listed")));
        }
        if let Some(a) = w.apartments.iter().find(|a| !apartments.contains_key(*a)) {
            return Err(IoError::Validate(format!("wishes[{i}]: unknown apartment {a}")));
        }
    }

    let wishers: BTreeSet<&ParticipantId> = file.wishes.iter().map(|w| &w.participant).collect();
    let participants: Vec<Participant> = file
        .participants
        .iter()
        .filter(|p| wishers.contains(&p.id))
        .cloned()
        .collect();
    debug!(
        catalog = file.participants.len(),
        with_wishes = participants.len(),
        "participant set resolved"
    );

    Ok(DrawInput {
        participants,
        periods,
        apartments,
        wishes: file.wishes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "drawing": { "id": "d-2025", "season": "Easter 2025" },
            "participants": [
                { "id": "u1", "name": "Ada", "email": "ada@example.org" },
                { "id": "u2", "name": "Bo",  "email": "bo@example.org" },
                { "id": "u3", "name": "Cy",  "email": "cy@example.org" }
            ],
            "periods": [
                { "id": "w14", "start_date": "2025-04-10", "end_date": "2025-04-17", "description": "Easter" }
            ],
            "apartments": [
                { "id": "a1", "name": "Upper", "sort_order": 1 },
                { "id": "a2", "name": "Lower", "sort_order": 2 }
            ],
            "wishes": [
                { "participant": "u1", "period": "w14", "priority": 1, "apartments": ["a2", "a1"] },
                { "participant": "u2", "period": "w14", "priority": 1, "apartments": ["a1"], "comment": "dog" }
            ]
        })
    }

    fn parse(v: serde_json::Value) -> Result<DrawInput, IoError> {
        into_draw_input(serde_json::from_value(v).unwrap())
    }

    #[test]
    fn only_wishers_take_part() {
        let input = parse(sample()).unwrap();
        let ids: Vec<&str> = input.participants.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["u1", "u2"]);
        assert_eq!(input.periods.len(), 1);
        assert_eq!(input.apartments.len(), 2);
    }

    #[test]
    fn unknown_apartment_rejected() {
        let mut v = sample();
        v["wishes"][0]["apartments"] = json!(["a9"]);
        let err = parse(v).unwrap_err();
        assert!(matches!(err, IoError::Validate(ref m) if m.contains("a9")), "{err}");
    }

    #[test]
    fn zero_priority_rejected() {
        let mut v = sample();
        v["wishes"][1]["priority"] = json!(0);
        assert!(matches!(parse(v), Err(IoError::Validate(_))));
    }

    #[test]
    fn inverted_period_rejected() {
        let mut v = sample();
        v["periods"][0]["end_date"] = json!("2025-04-01");
        assert!(matches!(parse(v), Err(IoError::Validate(_))));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut v = sample();
        v["apartments"][1]["id"] = json!("a1");
        assert!(matches!(parse(v), Err(IoError::Validate(ref m)) if m.contains("duplicate")));
    }

    #[test]
    fn bad_id_shape_is_a_json_error() {
        let mut v = sample();
        v["participants"][0]["id"] = json!("has space");
        assert!(serde_json::from_value::<DrawFile>(v).is_err());
    }

    #[test]
    fn hash_is_stable_under_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        fs::write(&a, serde_json::to_string_pretty(&sample()).unwrap()).unwrap();
        // Same content, different whitespace and key order at the top level.
        let reordered = format!(
            "{{\"wishes\":{},\"apartments\":{},\"periods\":{},\"participants\":{},\"drawing\":{}}}",
            sample()["wishes"],
            sample()["apartments"],
            sample()["periods"],
            sample()["participants"],
            sample()["drawing"]
        );
        fs::write(&b, reordered).unwrap();
        let la = load_draw_file(&a).unwrap();
        let lb = load_draw_file(&b).unwrap();
        assert_eq!(la.input_sha256, lb.input_sha256);
        assert_eq!(la.catalog_participants, 3);
        assert_eq!(la.drawing.season, "Easter 2025");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_draw_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, IoError::Read(_)));
    }
}
