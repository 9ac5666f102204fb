use std::path::Path;

use tracing::{debug, warn};

use crate::config::{ReferenceConfig, SheetDescriptor};
use crate::error::{LocateError, ReconError, Result};
use crate::header::{first_data_row, locate_column, locate_header_row};
use crate::model::{cell_at, CodeMap, CodeTree, Dictionary, Row};
use crate::normalize::normalize_code;
use crate::source::TabularSource;

/// Build the classification dictionary from every configured reference sheet.
///
/// Any missing header or column is fatal: the reference workbook is a fixed
/// template and a deviation needs a human to look at it.
pub fn build_dictionary(source: &dyn TabularSource, reference: &ReferenceConfig) -> Result<Dictionary> {
    let mut tree = CodeTree::new();

    for desc in &reference.sheets {
        let rows = source.read_sheet(&reference.workbook, &desc.sheet)?;
        let codes = sheet_codes(&rows, desc, reference)
            .map_err(|source| layout_error(&reference.workbook, &desc.sheet, source))?;

        if codes.is_empty() {
            warn!(sheet = %desc.sheet, "reference sheet has no code rows");
        }
        debug!(
            sheet = %desc.sheet,
            indicator_type = %desc.indicator_type,
            code_type = %desc.code_type,
            codes = codes.len(),
            "loaded reference sheet"
        );

        // Merge under the indicator-type; other code-types already there stay.
        tree.entry(desc.indicator_type.clone())
            .or_default()
            .insert(desc.code_type, codes);
    }

    Ok(Dictionary::from_tree(tree))
}

/// code → label pairs of one reference sheet, codes normalized.
fn sheet_codes(
    rows: &[Row],
    desc: &SheetDescriptor,
    reference: &ReferenceConfig,
) -> Result<CodeMap, LocateError> {
    let header = locate_header_row(rows, &reference.label_column)?;
    let label_col = locate_column(&rows[header], &reference.label_column)?;
    let code_col = locate_column(&rows[header], &reference.code_column)?;

    let mut codes = CodeMap::new();
    let Some(start) = first_data_row(rows, header, code_col) else {
        return Ok(codes);
    };

    for row in &rows[start..] {
        let code = cell_at(row, code_col);
        let label = cell_at(row, label_col);
        if code.is_blank() || label.is_blank() {
            continue;
        }
        codes.insert(normalize_code(&code.as_text(), desc.segmented), label.as_text());
    }

    Ok(codes)
}

fn layout_error(path: &Path, sheet: &str, source: LocateError) -> ReconError {
    ReconError::Layout {
        path: path.to_path_buf(),
        sheet: sheet.to_string(),
        source,
    }
}
