use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info, info_span, warn};

use crate::aggregate::MissingCodeAggregate;
use crate::config::ReconConfig;
use crate::dictionary::build_dictionary;
use crate::error::Result;
use crate::extract::extract_codes;
use crate::model::{CodeType, Dictionary, EntityId, ExtractedCodes, Lookup, MissingCodeRecord, StructuralWarning};
use crate::source::TabularSource;

/// Outcome of diffing one report against the dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub missing: Vec<MissingCodeRecord>,
    pub warnings: Vec<StructuralWarning>,
}

impl Reconciliation {
    fn warn(&mut self, warning: StructuralWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Diff every extracted code against the dictionary.
///
/// A category the dictionary lacks yields one structural warning per file and
/// its codes are skipped rather than reported missing.
pub fn reconcile(
    dictionary: &Dictionary,
    extracted: &ExtractedCodes,
    entity: &EntityId,
    file: &str,
) -> Reconciliation {
    let mut out = Reconciliation::default();
    // An unknown indicator warns once whatever its code-types; an unknown
    // code-type warns once per (indicator, code-type).
    let mut warned: HashSet<(&str, Option<CodeType>)> = HashSet::new();

    for (indicator, code_type, code, label) in extracted.iter() {
        let known = match dictionary.lookup(indicator, code_type) {
            Lookup::Found(codes) => codes,
            Lookup::UnknownIndicator => {
                if warned.insert((indicator, None)) {
                    out.warn(StructuralWarning::UnknownIndicator {
                        file: file.to_string(),
                        indicator_type: indicator.to_string(),
                    });
                }
                continue;
            }
            Lookup::UnknownCodeType => {
                if warned.insert((indicator, Some(code_type))) {
                    out.warn(StructuralWarning::UnknownCodeType {
                        file: file.to_string(),
                        indicator_type: indicator.to_string(),
                        code_type,
                    });
                }
                continue;
            }
        };

        if !known.contains_key(code) {
            out.missing.push(MissingCodeRecord {
                operator_id: entity.operator_id.clone(),
                unit_id: entity.unit_id.clone(),
                indicator_type: indicator.to_string(),
                code_type,
                code: code.to_string(),
                label: label.to_string(),
            });
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub files_total: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub entities: usize,
    pub missing_codes: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub run_at: String,
    pub reference_workbook: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub meta: RunMeta,
    pub summary: RunSummary,
    pub records: Vec<MissingCodeRecord>,
    pub warnings: Vec<StructuralWarning>,
    pub skipped: Vec<SkippedFile>,
}

/// Build the dictionary, then reconcile every report in order.
pub fn run_batch(config: &ReconConfig, source: &dyn TabularSource, files: &[PathBuf]) -> Result<RunResult> {
    let dictionary = build_dictionary(source, &config.reference)?;
    run_with_dictionary(&dictionary, config, source, files)
}

/// Reconcile reports against an already built dictionary.
///
/// Per-file failures skip the file unless `config.strict` is set; any other
/// failure aborts the batch.
pub fn run_with_dictionary(
    dictionary: &Dictionary,
    config: &ReconConfig,
    source: &dyn TabularSource,
    files: &[PathBuf],
) -> Result<RunResult> {
    let mut aggregate = MissingCodeAggregate::new();
    let mut warnings = Vec::new();
    let mut skipped = Vec::new();

    for (idx, path) in files.iter().enumerate() {
        let name = display_name(path);
        info!("processing {} ({} of {})", name, idx + 1, files.len());
        let _span = info_span!("report", file = %name).entered();

        match process_file(dictionary, config, source, path, &name) {
            Ok(result) => {
                aggregate.extend(result.missing);
                warnings.extend(result.warnings);
            }
            Err(err) if err.is_per_file() && !config.strict => {
                error!("skipping file: {err}");
                skipped.push(SkippedFile { file: name, error: err.to_string() });
            }
            Err(err) => return Err(err),
        }
    }

    let summary = RunSummary {
        files_total: files.len(),
        files_processed: files.len() - skipped.len(),
        files_skipped: skipped.len(),
        entities: aggregate.by_entity().len(),
        missing_codes: aggregate.len(),
        warnings: warnings.len(),
    };

    Ok(RunResult {
        meta: RunMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            reference_workbook: config.reference.workbook.display().to_string(),
        },
        summary,
        records: aggregate.into_grouped_records(),
        warnings,
        skipped,
    })
}

fn process_file(
    dictionary: &Dictionary,
    config: &ReconConfig,
    source: &dyn TabularSource,
    path: &Path,
    name: &str,
) -> Result<Reconciliation> {
    let entity = EntityId::from_path(path)?;
    let extracted = extract_codes(source, path, &config.report)?;
    Ok(reconcile(dictionary, &extracted, &entity, name))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
