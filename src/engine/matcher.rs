//! Rule matching for a single edit

use crate::input::EditEvent;
use crate::rules::{Rule, RuleCatalog};

/// Every rule in `catalog` triggered by `event`, in catalog order
///
/// Operations without editable content (e.g. a read) never match.
pub fn find_matches(catalog: &RuleCatalog, event: &EditEvent<'_>) -> Vec<&'static Rule> {
    let Some(content) = event.content.as_deref() else {
        return Vec::new();
    };

    catalog
        .iter()
        .filter(|rule| rule.matches(event.file_path, content))
        .collect()
}
