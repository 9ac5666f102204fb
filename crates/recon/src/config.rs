use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ReconError;
use crate::model::CodeType;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration. Every field has a default matching the standard
/// reporting templates, so an empty TOML document is a valid config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    pub reference: ReferenceConfig,
    pub report: ReportConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    /// Abort the batch on the first unreadable report instead of skipping it.
    pub strict: bool,
}

// ---------------------------------------------------------------------------
// Reference workbook
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceConfig {
    pub workbook: PathBuf,
    /// Header marker, also the label column.
    pub label_column: String,
    pub code_column: String,
    pub sheets: Vec<SheetDescriptor>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from("clasificatie.xlsx"),
            label_column: "Denumire".into(),
            code_column: "cod. Ec".into(),
            sheets: vec![
                SheetDescriptor::new("Venituri", "Venit", CodeType::Functional, false),
                SheetDescriptor::new("Cheltuieli FCT", "Cheltuiala", CodeType::Functional, true),
                SheetDescriptor::new("Cheltuieli ECN", "Cheltuiala", CodeType::Economic, false),
            ],
        }
    }
}

/// One reference sheet and the dictionary slot it fills.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetDescriptor {
    pub sheet: String,
    pub indicator_type: String,
    pub code_type: CodeType,
    /// Codes carry a sub-classification segment (`AA.BBB.CC`) to drop.
    #[serde(default)]
    pub segmented: bool,
}

impl SheetDescriptor {
    pub fn new(sheet: &str, indicator_type: &str, code_type: CodeType, segmented: bool) -> Self {
        Self {
            sheet: sheet.into(),
            indicator_type: indicator_type.into(),
            code_type,
            segmented,
        }
    }
}

// ---------------------------------------------------------------------------
// Entity reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub sheet: String,
    /// Indicator-type whose rows carry no economic classification.
    pub revenue_indicator: String,
    pub columns: ReportColumns,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sheet: "Sheet1".into(),
            revenue_indicator: "Venit".into(),
            columns: ReportColumns::default(),
        }
    }
}

/// Header labels of the report sheet. `indicator_type` doubles as the
/// header-row marker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportColumns {
    pub indicator_type: String,
    pub functional_code: String,
    pub functional_label: String,
    pub economic_code: String,
    pub economic_label: String,
}

impl Default for ReportColumns {
    fn default() -> Self {
        Self {
            indicator_type: "Tip Indicator".into(),
            functional_code: "Clasificatie Functionala".into(),
            functional_label: "Clasificatie Functionala Descriere".into(),
            economic_code: "Clasificatie Economica".into(),
            economic_label: "Clasificatie Economica Descriere".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Input + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub dir: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("./files") }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: PathBuf,
    /// Inferred from the path extension when unset.
    pub format: Option<OutputFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("missing_codes.xlsx"),
            format: None,
        }
    }
}

impl OutputConfig {
    pub fn resolved_format(&self) -> OutputFormat {
        self.format
            .unwrap_or_else(|| OutputFormat::from_path(&self.path).unwrap_or(OutputFormat::Xlsx))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Xlsx,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(Self::Xlsx),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xlsx => write!(f, "xlsx"),
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let reference = &self.reference;
        if reference.sheets.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one reference sheet is required".into(),
            ));
        }
        if reference.label_column.is_empty() || reference.code_column.is_empty() {
            return Err(ReconError::ConfigValidation(
                "reference label_column and code_column must be non-empty".into(),
            ));
        }

        let mut names = HashSet::new();
        let mut slots = HashSet::new();
        for desc in &reference.sheets {
            if desc.sheet.is_empty() || desc.indicator_type.is_empty() {
                return Err(ReconError::ConfigValidation(
                    "reference sheets need a sheet name and an indicator_type".into(),
                ));
            }
            if !names.insert(desc.sheet.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "reference sheet '{}' listed twice",
                    desc.sheet
                )));
            }
            if !slots.insert((desc.indicator_type.as_str(), desc.code_type)) {
                return Err(ReconError::ConfigValidation(format!(
                    "'{}' / {} is filled by more than one sheet",
                    desc.indicator_type, desc.code_type
                )));
            }
        }

        let cols = &self.report.columns;
        let labels = [
            &cols.indicator_type,
            &cols.functional_code,
            &cols.functional_label,
            &cols.economic_code,
            &cols.economic_label,
        ];
        if labels.iter().any(|l| l.is_empty()) || self.report.sheet.is_empty() {
            return Err(ReconError::ConfigValidation(
                "report sheet and column labels must be non-empty".into(),
            ));
        }

        Ok(())
    }

    /// Resolve relative paths against `base` (the config file's directory).
    pub fn rebase(&mut self, base: &Path) {
        for path in [&mut self.reference.workbook, &mut self.input.dir, &mut self.output.path] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
