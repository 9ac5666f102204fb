use std::path::Path;

use crate::error::{ReconError, Result};
use crate::model::EntityId;

/// Token separator in report file names.
pub const NAME_DELIMITER: char = '_';

const OPERATOR_TOKEN: usize = 3;
const UNIT_TOKEN: usize = 4;

impl EntityId {
    /// Parse `yyyymmdd_FORM_TREZ_<operator>_<unit>_...` style names.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let tokens: Vec<&str> = name.split(NAME_DELIMITER).collect();
        if tokens.len() <= UNIT_TOKEN {
            return Err(ReconError::FileName { name: name.to_string() });
        }
        Ok(Self {
            operator_id: tokens[OPERATOR_TOKEN].to_string(),
            unit_id: tokens[UNIT_TOKEN].to_string(),
        })
    }

    /// Parse from a path, ignoring the directory and the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_file_name(&name)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.operator_id, NAME_DELIMITER, self.unit_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_treasury_file_name() {
        let id = EntityId::from_file_name("20230630_FXB-EXB-901_TREZ002_4562150_4562150_02_51422020.xlsx").unwrap();
        assert_eq!(id.operator_id, "4562150");
        assert_eq!(id.unit_id, "4562150");
        assert_eq!(id.to_string(), "4562150_4562150");
    }

    #[test]
    fn exactly_five_tokens_is_enough() {
        let id = EntityId::from_path(Path::new("files/a_b_c_111_222.xlsx")).unwrap();
        assert_eq!(id.operator_id, "111");
        assert_eq!(id.unit_id, "222");
    }

    #[test]
    fn short_names_rejected() {
        let err = EntityId::from_file_name("20230630_FXB_TREZ002_4562150.xlsx").unwrap_err();
        assert!(matches!(err, ReconError::FileName { .. }));
    }
}
