use serde::{Deserialize, Serialize};

use crate::backend_state::DataTable;

use super::{DataCollection, DatasetId, RangeRoi};

/// A logical membership condition over dataset rows.
///
/// Conditions are defined per attribute name, not per dataset, so the same
/// subset applies to every dataset carrying that attribute (a dataset
/// without it simply matches nothing).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SubsetState {
    Range { attribute: String, roi: RangeRoi },
    And(Box<SubsetState>, Box<SubsetState>),
    Or(Box<SubsetState>, Box<SubsetState>),
    Xor(Box<SubsetState>, Box<SubsetState>),
    Not(Box<SubsetState>),
}

impl SubsetState {
    pub fn range(attribute: &str, lo: f64, hi: f64) -> Self {
        SubsetState::Range {
            attribute: attribute.to_string(),
            roi: RangeRoi::new(lo, hi),
        }
    }

    /// Evaluate the membership predicate for one row of a table.
    /// NaN values never match a range.
    pub fn contains(&self, table: &DataTable, row: usize) -> bool {
        match self {
            SubsetState::Range { attribute, roi } => table
                .column(attribute)
                .and_then(|col| col.get(row))
                .is_some_and(|value| roi.contains(*value)),
            SubsetState::And(a, b) => a.contains(table, row) && b.contains(table, row),
            SubsetState::Or(a, b) => a.contains(table, row) || b.contains(table, row),
            SubsetState::Xor(a, b) => a.contains(table, row) != b.contains(table, row),
            SubsetState::Not(a) => !a.contains(table, row),
        }
    }

    /// A short human-readable description for the subset list.
    pub fn describe(&self) -> String {
        match self {
            SubsetState::Range { attribute, roi } => {
                format!("{:.4} <= {} <= {:.4}", roi.lo, attribute, roi.hi)
            }
            SubsetState::And(..) => "combined (and)".to_string(),
            SubsetState::Or(..) => "combined (or)".to_string(),
            SubsetState::Xor(..) => "combined (xor)".to_string(),
            SubsetState::Not(..) => "inverted".to_string(),
        }
    }
}

/// A named subset: its condition plus the dataset the user most recently
/// interacted with when defining it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subset {
    pub label: String,
    pub state: SubsetState,
    pub focus: Option<DatasetId>,
    pub visible: bool,
}

impl Subset {
    pub fn new(label: String, state: SubsetState, focus: Option<DatasetId>) -> Self {
        Self {
            label,
            state,
            focus,
            visible: true,
        }
    }
}

/// How a freshly drawn selection combines with the current editable
/// subset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombineMode {
    #[default]
    Replace,
    And,
    Or,
    Xor,
    AndNot,
}

impl CombineMode {
    pub fn label(&self) -> &'static str {
        match self {
            CombineMode::Replace => "Replace",
            CombineMode::And => "And",
            CombineMode::Or => "Or",
            CombineMode::Xor => "Xor",
            CombineMode::AndNot => "And Not",
        }
    }

    fn combine(&self, old: SubsetState, new: SubsetState) -> SubsetState {
        match self {
            CombineMode::Replace => new,
            CombineMode::And => SubsetState::And(Box::new(old), Box::new(new)),
            CombineMode::Or => SubsetState::Or(Box::new(old), Box::new(new)),
            CombineMode::Xor => SubsetState::Xor(Box::new(old), Box::new(new)),
            CombineMode::AndNot => {
                SubsetState::And(Box::new(old), Box::new(SubsetState::Not(Box::new(new))))
            }
        }
    }
}

/// Applies new subset conditions to the collection's current editable
/// subset. The collection is passed in explicitly; there is no global
/// "current mode" singleton.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct EditSubsetMode {
    pub mode: CombineMode,
}

impl EditSubsetMode {
    /// Combine `new_state` into the current editable subset and refocus it
    /// onto `focus`. Creates a new subset if none is being edited. A single
    /// synchronous replace-or-create operation.
    pub fn apply(&self, collection: &mut DataCollection, new_state: SubsetState, focus: DatasetId) {
        match collection.edit_subset().and_then(|i| collection.subsets.get_mut(i)) {
            Some(subset) => {
                let old = subset.state.clone();
                subset.state = self.mode.combine(old, new_state);
                subset.focus = Some(focus);
            }
            None => {
                let label = format!("S{}", collection.subsets.len() + 1);
                log::debug!("creating new subset '{}'", label);
                collection
                    .subsets
                    .push(Subset::new(label, new_state, Some(focus)));
                collection.set_edit_subset(Some(collection.subsets.len() - 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataTable {
        DataTable::parse_str("x,y\n0.5,10\n1.5,20\n2.5,nope\n3.5,40\n").unwrap()
    }

    #[test]
    fn range_condition_is_inclusive() {
        let table = table();
        let state = SubsetState::range("x", 1.5, 3.5);
        let matches: Vec<bool> = (0..table.n_rows())
            .map(|row| state.contains(&table, row))
            .collect();
        assert_eq!(matches, vec![false, true, true, true]);
    }

    #[test]
    fn nan_and_missing_attributes_never_match() {
        let table = table();
        let on_y = SubsetState::range("y", 0.0, 100.0);
        // Row 2 has an unparseable y cell (NaN).
        assert!(!on_y.contains(&table, 2));
        let missing = SubsetState::range("z", 0.0, 100.0);
        assert!(!(0..table.n_rows()).any(|row| missing.contains(&table, row)));
    }

    #[test]
    fn logical_combinations() {
        let table = table();
        let a = SubsetState::range("x", 0.0, 2.0);
        let b = SubsetState::range("x", 1.0, 4.0);
        let and = SubsetState::And(Box::new(a.clone()), Box::new(b.clone()));
        let xor = SubsetState::Xor(Box::new(a.clone()), Box::new(b.clone()));
        let not = SubsetState::Not(Box::new(a));
        assert!(and.contains(&table, 1)); // x = 1.5 in both
        assert!(!and.contains(&table, 0)); // x = 0.5 only in a
        assert!(xor.contains(&table, 0));
        assert!(!xor.contains(&table, 1));
        assert!(not.contains(&table, 3));
    }

    #[test]
    fn apply_creates_then_combines() {
        let mut collection = DataCollection::default();
        let focus = DatasetId::default();
        let mut edit_mode = EditSubsetMode::default();

        edit_mode.apply(&mut collection, SubsetState::range("x", 1.0, 2.0), focus);
        assert_eq!(collection.subsets.len(), 1);
        assert_eq!(collection.edit_subset(), Some(0));
        assert_eq!(collection.subsets[0].focus, Some(focus));

        // Replace mode overwrites the condition of the edited subset.
        edit_mode.apply(&mut collection, SubsetState::range("x", 3.0, 4.0), focus);
        assert_eq!(collection.subsets.len(), 1);
        assert_eq!(
            collection.subsets[0].state,
            SubsetState::range("x", 3.0, 4.0)
        );

        // Or mode wraps the previous condition instead.
        edit_mode.mode = CombineMode::Or;
        edit_mode.apply(&mut collection, SubsetState::range("x", 5.0, 6.0), focus);
        match &collection.subsets[0].state {
            SubsetState::Or(old, new) => {
                assert_eq!(**old, SubsetState::range("x", 3.0, 4.0));
                assert_eq!(**new, SubsetState::range("x", 5.0, 6.0));
            }
            other => panic!("expected or-combination, got {:?}", other),
        }

        // Deselecting the edit subset makes the next apply create a new one.
        collection.set_edit_subset(None);
        edit_mode.apply(&mut collection, SubsetState::range("y", 0.0, 1.0), focus);
        assert_eq!(collection.subsets.len(), 2);
        assert_eq!(collection.edit_subset(), Some(1));
    }
}
