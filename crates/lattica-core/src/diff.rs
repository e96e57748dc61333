//! Incremental value diff
//!
//! Computes "what actually needs to be sent" when an updated value tree is
//! submitted to an external resource: the subset of the new tree that is
//! absent from, or different to, the previous tree.

use std::collections::BTreeMap;

use crate::element::InstanceElement;
use crate::values::Value;

/// Entries of `new_value` that are absent in `previous` or differ from it
///
/// Mappings are diffed recursively; any other variant - including lists -
/// is compared and emitted wholesale from `new_value`. Keys present and
/// structurally identical in both trees are omitted. Returns `None` when
/// nothing changed.
pub fn changed_values(new_value: &Value, previous: &Value) -> Option<Value> {
    match (new_value, previous) {
        (Value::Map(new_entries), Value::Map(prev_entries)) => {
            let mut changed = BTreeMap::new();
            for (key, value) in new_entries {
                match prev_entries.get(key) {
                    None => {
                        changed.insert(key.clone(), value.clone());
                    }
                    Some(prev_value) => {
                        if matches!((value, prev_value), (Value::Map(_), Value::Map(_))) {
                            if let Some(nested) = changed_values(value, prev_value) {
                                changed.insert(key.clone(), nested);
                            }
                        } else if value != prev_value {
                            changed.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
            if changed.is_empty() {
                None
            } else {
                Some(Value::Map(changed))
            }
        }
        _ => (new_value != previous).then(|| new_value.clone()),
    }
}

impl InstanceElement {
    /// Diff this instance's value tree against a previous version of it
    pub fn values_not_in_previous_or_different(&self, previous: &Value) -> Option<Value> {
        changed_values(&self.value, previous)
    }
}
