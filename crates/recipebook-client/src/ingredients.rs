//! Variable-length ingredient rows bound to a recipe.

/// The editable ingredient list of a recipe form.
///
/// Always holds at least one row. Removing the last row is silently ignored,
/// so a form never shows zero ingredient fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientEditor {
    rows: Vec<String>,
}

impl IngredientEditor {
    /// A single blank row.
    pub fn new() -> Self {
        Self {
            rows: vec![String::new()],
        }
    }

    /// One row per value, in order. An empty sequence yields one blank row.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<String> = values.into_iter().map(Into::into).collect();
        if rows.is_empty() {
            Self::new()
        } else {
            Self { rows }
        }
    }

    /// Append a row.
    pub fn add(&mut self, initial_value: impl Into<String>) {
        self.rows.push(initial_value.into());
    }

    /// Remove the row at `index`.
    ///
    /// Returns false, leaving the rows untouched, when only one row is left
    /// or the index is out of range.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        true
    }

    /// Overwrite the value of an existing row. Returns false if out of range.
    pub fn set(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                *row = value.into();
                true
            }
            None => false,
        }
    }

    /// Current row values in display order.
    pub fn values(&self) -> &[String] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Never true; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for IngredientEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_blank_row() {
        let editor = IngredientEditor::new();
        assert_eq!(editor.values(), [""]);
    }

    #[test]
    fn last_row_cannot_be_removed() {
        let mut editor = IngredientEditor::new();
        assert!(!editor.remove_at(0));
        assert_eq!(editor.len(), 1);

        editor.add("salt");
        assert!(editor.remove_at(0));
        assert!(!editor.remove_at(0));
        assert_eq!(editor.values(), ["salt"]);
    }

    #[test]
    fn remove_keeps_order_of_remaining_rows() {
        let mut editor = IngredientEditor::from_values(["flour", "eggs", "milk"]);
        assert!(editor.remove_at(1));
        assert_eq!(editor.values(), ["flour", "milk"]);
        assert!(!editor.remove_at(7));
    }

    #[test]
    fn seeding_from_nothing_still_shows_a_row() {
        let editor = IngredientEditor::from_values(Vec::<String>::new());
        assert_eq!(editor.len(), 1);
        assert!(!editor.is_empty());
    }

    #[test]
    fn row_count_never_reaches_zero() {
        let mut editor = IngredientEditor::from_values(["a", "b", "c", "d"]);
        for _ in 0..10 {
            editor.remove_at(0);
        }
        assert_eq!(editor.values(), ["d"]);

        assert!(editor.set(0, "e"));
        assert!(!editor.set(3, "f"));
        assert_eq!(editor.values(), ["e"]);
    }
}
