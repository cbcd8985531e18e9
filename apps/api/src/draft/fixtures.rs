//! Drafts shared by unit tests across modules.

use serde_json::json;

use crate::draft::{FieldPath, ResumeDraft, SetField};

pub const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==";

pub const FIFTEEN_WORDS: &str =
    "Built a small interpreter in Rust with a parser, type checker and bytecode virtual machine";

pub fn set(draft: ResumeDraft, path: &str, value: serde_json::Value) -> ResumeDraft {
    let path: FieldPath = path.parse().expect("fixture path");
    draft
        .with_value(&path, &value)
        .unwrap_or_else(|| panic!("fixture path {path} rejected"))
}

/// A draft that passes every submit rule.
pub fn submittable_draft() -> ResumeDraft {
    let mut draft = ResumeDraft::empty();
    draft = set(draft, "personal.name", json!("Asha"));
    draft = set(draft, "personal.photo", json!(PNG_DATA_URL));
    for i in 0..3 {
        draft = set(draft, &format!("projects.{i}.title"), json!(format!("Project {i}")));
        draft = set(draft, &format!("projects.{i}.tech"), json!("Rust, Axum"));
        draft = set(draft, &format!("projects.{i}.desc"), json!(FIFTEEN_WORDS));
        draft = set(draft, &format!("certs.{i}.name"), json!(format!("Cert {i}")));
    }
    for logo in ["LeetCode", "HackerRank", "NPTEL", "Coursera"] {
        draft = draft.with_toggled(SetField::Logos, logo).expect("logo slot");
    }
    draft
}
