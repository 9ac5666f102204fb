use std::collections::{BTreeMap, HashSet};

use crate::model::{EntityId, MissingCodeRecord};

/// Run-wide missing-code collection.
///
/// Records keep first-insertion order; a record equal in every field to one
/// already held is dropped.
#[derive(Debug, Clone, Default)]
pub struct MissingCodeAggregate {
    records: Vec<MissingCodeRecord>,
    seen: HashSet<MissingCodeRecord>,
}

impl MissingCodeAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the record was already present.
    pub fn insert(&mut self, record: MissingCodeRecord) -> bool {
        if self.seen.contains(&record) {
            return false;
        }
        self.seen.insert(record.clone());
        self.records.push(record);
        true
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = MissingCodeRecord>) {
        for record in records {
            self.insert(record);
        }
    }

    pub fn records(&self) -> &[MissingCodeRecord] {
        &self.records
    }

    /// Records flattened in `by_entity` order: entity, then indicator-type,
    /// then first-insertion order.
    pub fn into_grouped_records(self) -> Vec<MissingCodeRecord> {
        let mut records = self.records;
        records.sort_by(|a, b| {
            (&a.operator_id, &a.unit_id, &a.indicator_type).cmp(&(&b.operator_id, &b.unit_id, &b.indicator_type))
        });
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// (operator, unit) → indicator-type → records.
    pub fn by_entity(&self) -> BTreeMap<EntityId, BTreeMap<&str, Vec<&MissingCodeRecord>>> {
        let mut grouped: BTreeMap<EntityId, BTreeMap<&str, Vec<&MissingCodeRecord>>> = BTreeMap::new();
        for record in &self.records {
            grouped
                .entry(record.entity())
                .or_default()
                .entry(record.indicator_type.as_str())
                .or_default()
                .push(record);
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CodeType;

    fn record(op: &str, indicator: &str, code: &str) -> MissingCodeRecord {
        MissingCodeRecord {
            operator_id: op.into(),
            unit_id: op.into(),
            indicator_type: indicator.into(),
            code_type: CodeType::Functional,
            code: code.into(),
            label: format!("label {code}"),
        }
    }

    #[test]
    fn identical_records_stored_once() {
        let mut agg = MissingCodeAggregate::new();
        assert!(agg.insert(record("1", "Venit", "020200")));
        assert!(!agg.insert(record("1", "Venit", "020200")));
        assert!(agg.insert(record("2", "Venit", "020200")));
        assert_eq!(agg.len(), 2);
    }

    #[test]
    fn label_difference_is_a_distinct_record() {
        let mut agg = MissingCodeAggregate::new();
        let mut other = record("1", "Venit", "020200");
        other.label = "Alt nume".into();
        agg.extend([record("1", "Venit", "020200"), other]);
        assert_eq!(agg.len(), 2);
    }

    #[test]
    fn insertion_order_preserved() {
        let mut agg = MissingCodeAggregate::new();
        agg.extend([record("9", "Venit", "b"), record("1", "Venit", "a")]);
        let codes: Vec<_> = agg.records().iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["b", "a"]);
    }

    #[test]
    fn grouped_by_entity_then_indicator() {
        let mut agg = MissingCodeAggregate::new();
        agg.extend([
            record("2", "Venit", "a"),
            record("1", "Cheltuiala", "b"),
            record("1", "Venit", "c"),
            record("1", "Cheltuiala", "d"),
        ]);
        let grouped = agg.by_entity();
        assert_eq!(grouped.len(), 2);
        let first = grouped.values().next().unwrap();
        assert_eq!(first["Cheltuiala"].len(), 2);
        assert_eq!(first["Venit"].len(), 1);
    }

    #[test]
    fn grouped_records_follow_entity_then_indicator() {
        let mut agg = MissingCodeAggregate::new();
        agg.extend([
            record("2", "Venit", "a"),
            record("1", "Venit", "b"),
            record("2", "Cheltuiala", "c"),
            record("1", "Venit", "d"),
            record("2", "Venit", "e"),
        ]);
        let codes: Vec<_> = agg.into_grouped_records().into_iter().map(|r| r.code).collect();
        assert_eq!(codes, ["b", "d", "c", "a", "e"]);
    }
}
