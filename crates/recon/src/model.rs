use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// A raw scalar as read from a sheet. No coercion beyond what the source
/// format itself does.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    String(String),
    Float(f64),
    Int(i64),
    Bool(bool),
}

/// One sheet row. Positions align across rows of the same sheet.
pub type Row = Vec<Cell>;

impl Cell {
    /// Render the cell as text. Integral floats print without decimals.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::String(s) => s.clone(),
            Self::Float(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Self::Int(n) => n.to_string(),
            Self::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Exact text equality; non-text cells never match a label.
    pub fn is_label(&self, label: &str) -> bool {
        matches!(self, Self::String(s) if s == label)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

/// Cell at `col`, treating positions past the end of a short row as empty.
pub fn cell_at(row: &[Cell], col: usize) -> &Cell {
    static EMPTY: Cell = Cell::Empty;
    row.get(col).unwrap_or(&EMPTY)
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classification axis within an indicator-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeType {
    Functional,
    Economic,
}

impl std::fmt::Display for CodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Functional => write!(f, "functional"),
            Self::Economic => write!(f, "economic"),
        }
    }
}

/// code → label
pub type CodeMap = BTreeMap<String, String>;

/// indicator-type → code-type → (code → label)
pub type CodeTree = BTreeMap<String, BTreeMap<CodeType, CodeMap>>;

/// Result of resolving a (indicator-type, code-type) pair in the dictionary.
#[derive(Debug, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a CodeMap),
    UnknownIndicator,
    UnknownCodeType,
}

/// Canonical classification. Built once per run, read-only afterward.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: CodeTree,
}

impl Dictionary {
    pub fn from_tree(entries: CodeTree) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, indicator: &str, code_type: CodeType) -> Lookup<'_> {
        match self.entries.get(indicator) {
            None => Lookup::UnknownIndicator,
            Some(by_type) => match by_type.get(&code_type) {
                None => Lookup::UnknownCodeType,
                Some(codes) => Lookup::Found(codes),
            },
        }
    }

    pub fn contains(&self, indicator: &str, code_type: CodeType, code: &str) -> bool {
        matches!(self.lookup(indicator, code_type), Lookup::Found(codes) if codes.contains_key(code))
    }

    /// Per-pair code counts, in key order.
    pub fn stats(&self) -> Vec<DictionaryStat> {
        self.entries
            .iter()
            .flat_map(|(indicator, by_type)| {
                by_type.iter().map(move |(code_type, codes)| DictionaryStat {
                    indicator_type: indicator.clone(),
                    code_type: *code_type,
                    codes: codes.len(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryStat {
    pub indicator_type: String,
    pub code_type: CodeType,
    pub codes: usize,
}

/// Codes pulled from one entity report, raw (not normalized).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedCodes {
    entries: CodeTree,
}

impl ExtractedCodes {
    /// Record a code; a later insert under the same key overwrites the label.
    pub fn insert(&mut self, indicator: &str, code_type: CodeType, code: String, label: String) {
        self.entries
            .entry(indicator.to_string())
            .or_default()
            .entry(code_type)
            .or_default()
            .insert(code, label);
    }

    pub fn get(&self, indicator: &str, code_type: CodeType) -> Option<&CodeMap> {
        self.entries.get(indicator).and_then(|m| m.get(&code_type))
    }

    pub fn has_code_type(&self, code_type: CodeType) -> bool {
        self.entries.values().any(|m| m.contains_key(&code_type))
    }

    /// Every (indicator-type, code-type, code, label) quadruple.
    pub fn iter(&self) -> impl Iterator<Item = (&str, CodeType, &str, &str)> {
        self.entries.iter().flat_map(|(indicator, by_type)| {
            by_type.iter().flat_map(move |(code_type, codes)| {
                codes
                    .iter()
                    .map(move |(code, label)| (indicator.as_str(), *code_type, code.as_str(), label.as_str()))
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }
}

// ---------------------------------------------------------------------------
// Entities + Output
// ---------------------------------------------------------------------------

/// (operator ID, unit ID) pair carried in a report's file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId {
    pub operator_id: String,
    pub unit_id: String,
}

/// A code present in a report but absent from the dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MissingCodeRecord {
    pub operator_id: String,
    pub unit_id: String,
    pub indicator_type: String,
    pub code_type: CodeType,
    pub code: String,
    pub label: String,
}

impl MissingCodeRecord {
    /// Output column order shared by every writer.
    pub const COLUMNS: [&'static str; 6] =
        ["operator_id", "unit_id", "indicator_type", "code_type", "code", "label"];

    pub fn entity(&self) -> EntityId {
        EntityId {
            operator_id: self.operator_id.clone(),
            unit_id: self.unit_id.clone(),
        }
    }

    pub fn fields(&self) -> [String; 6] {
        [
            self.operator_id.clone(),
            self.unit_id.clone(),
            self.indicator_type.clone(),
            self.code_type.to_string(),
            self.code.clone(),
            self.label.clone(),
        ]
    }
}

/// A report category the dictionary has no entry for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuralWarning {
    UnknownIndicator { file: String, indicator_type: String },
    UnknownCodeType { file: String, indicator_type: String, code_type: CodeType },
}

impl std::fmt::Display for StructuralWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownIndicator { file, indicator_type } => {
                write!(f, "{file}: unknown indicator-type category '{indicator_type}'")
            }
            Self::UnknownCodeType { file, indicator_type, code_type } => {
                write!(f, "{file}: unknown code-type category '{code_type}' under '{indicator_type}'")
            }
        }
    }
}
