use tracing::debug;

use crate::errors::CrudsError;
use crate::products::{Product, ProductFields};
use crate::store::{ProductStore, Storage};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorMode {
    #[default]
    Create,
    /// The next submit overwrites the product at `index`.
    Update { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created { copies: u32 },
    Updated { index: usize },
}

/// Form state for creating and updating products.
#[derive(Debug, Default)]
pub struct ProductEditor {
    mode: EditorMode,
    fields: ProductFields,
}

impl ProductEditor {
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_updating(&self) -> bool {
        matches!(self.mode, EditorMode::Update { .. })
    }

    pub fn fields(&self) -> &ProductFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut ProductFields {
        &mut self.fields
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "Create",
            EditorMode::Update { .. } => "Update",
        }
    }

    /// The count input only applies when creating.
    pub fn shows_count(&self) -> bool {
        !self.is_updating()
    }

    pub fn begin_edit<S: Storage>(
        &mut self,
        store: &ProductStore<S>,
        index: usize,
    ) -> Result<(), CrudsError> {
        let product = store.get(index)?;
        self.fields = ProductFields::from(product);
        self.mode = EditorMode::Update { index };
        debug!(index, "editing product");
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.fields.clear();
        self.mode = EditorMode::Create;
    }

    /// Validates the form and hands the product to the store. On any error the
    /// form and mode are left as they were.
    pub fn submit<S: Storage>(
        &mut self,
        store: &mut ProductStore<S>,
    ) -> Result<SubmitOutcome, CrudsError> {
        let missing = self.fields.missing_fields();
        if !missing.is_empty() {
            return Err(CrudsError::Validation(missing));
        }
        let product = Product::from_fields(&self.fields)?;
        let outcome = match self.mode {
            EditorMode::Create => {
                let copies = self.fields.copies()?;
                store.insert(product, copies)?;
                SubmitOutcome::Created { copies }
            }
            EditorMode::Update { index } => {
                store.replace_at(index, product)?;
                SubmitOutcome::Updated { index }
            }
        };
        self.cancel_edit();
        debug!(?outcome, "submitted product");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::products::Field;
    use crate::store::MemoryStorage;

    fn store() -> ProductStore<MemoryStorage> {
        ProductStore::open(MemoryStorage::default(), "products").unwrap()
    }

    fn fill(editor: &mut ProductEditor, title: &str, price: &str, count: &str) {
        let fields = editor.fields_mut();
        fields.set(Field::Title, title);
        fields.set(Field::Price, price);
        fields.set(Field::Count, count);
        fields.set(Field::Category, "Stationery");
    }

    #[test]
    fn create_with_count_inserts_copies() {
        let mut store = store();
        let mut editor = ProductEditor::default();
        fill(&mut editor, "Pen", "2", "3");

        let outcome = editor.submit(&mut store).unwrap();
        assert_eq!(outcome, SubmitOutcome::Created { copies: 3 });
        assert_eq!(store.len(), 3);
        assert!(store.products().iter().all(|p| p.total == Decimal::from(2)));
        assert_eq!(editor.fields(), &ProductFields::default());
    }

    #[test]
    fn create_without_usable_count_inserts_one() {
        let mut store = store();
        let mut editor = ProductEditor::default();
        for count in ["", "1", "0", "-2", "many"] {
            fill(&mut editor, "Pen", "2", count);
            editor.submit(&mut store).unwrap();
        }
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn missing_fields_block_submit() {
        let mut store = store();
        let mut editor = ProductEditor::default();
        fill(&mut editor, "", "2", "");
        let before = editor.fields().clone();

        let err = editor.submit(&mut store).unwrap_err();
        assert!(matches!(err, CrudsError::Validation(ref missing) if missing == &vec!["title"]));
        assert!(err.is_recoverable());
        assert!(store.is_empty());
        assert_eq!(editor.fields(), &before);
        assert_eq!(editor.mode(), EditorMode::Create);
    }

    #[test]
    fn update_replaces_one_position_and_returns_to_create() {
        let mut store = store();
        let mut editor = ProductEditor::default();
        fill(&mut editor, "Pen", "2", "3");
        editor.submit(&mut store).unwrap();

        editor.begin_edit(&store, 1).unwrap();
        assert_eq!(editor.mode(), EditorMode::Update { index: 1 });
        assert_eq!(editor.submit_label(), "Update");
        assert!(!editor.shows_count());
        assert_eq!(editor.fields().title, "Pen");

        editor.fields_mut().set(Field::Title, "Ink");
        editor.fields_mut().set(Field::Taxes, "1");
        let outcome = editor.submit(&mut store).unwrap();

        assert_eq!(outcome, SubmitOutcome::Updated { index: 1 });
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(0).unwrap().title, "Pen");
        assert_eq!(store.get(1).unwrap().title, "Ink");
        assert_eq!(store.get(1).unwrap().total, Decimal::from(3));
        assert_eq!(store.get(2).unwrap().title, "Pen");
        assert_eq!(editor.mode(), EditorMode::Create);
        assert_eq!(editor.submit_label(), "Create");
    }

    #[test]
    fn begin_edit_rejects_unknown_position() {
        let store = store();
        let mut editor = ProductEditor::default();
        assert!(matches!(
            editor.begin_edit(&store, 0),
            Err(CrudsError::OutOfRange { index: 0, len: 0 })
        ));
        assert_eq!(editor.mode(), EditorMode::Create);
    }

    #[test]
    fn stale_update_position_keeps_editor_state() {
        let mut store = store();
        let mut editor = ProductEditor::default();
        fill(&mut editor, "Pen", "2", "2");
        editor.submit(&mut store).unwrap();

        editor.begin_edit(&store, 1).unwrap();
        store.remove_at(1).unwrap();

        assert!(matches!(
            editor.submit(&mut store),
            Err(CrudsError::OutOfRange { index: 1, len: 1 })
        ));
        assert_eq!(editor.mode(), EditorMode::Update { index: 1 });
    }

    #[test]
    fn cancel_returns_to_create_without_touching_store() {
        let mut store = store();
        let mut editor = ProductEditor::default();
        fill(&mut editor, "Pen", "2", "");
        editor.submit(&mut store).unwrap();

        editor.begin_edit(&store, 0).unwrap();
        editor.fields_mut().set(Field::Title, "Ink");
        editor.cancel_edit();

        assert_eq!(editor.mode(), EditorMode::Create);
        assert!(editor.fields().title.is_empty());
        assert_eq!(store.get(0).unwrap().title, "Pen");
    }

    #[test]
    fn out_of_range_total_keeps_form() {
        let mut store = store();
        let mut editor = ProductEditor::default();
        fill(&mut editor, "Pen", &Decimal::MAX.to_string(), "");
        editor.fields_mut().set(Field::Taxes, "1");
        let before = editor.fields().clone();

        assert!(matches!(
            editor.submit(&mut store),
            Err(CrudsError::InvalidArgument(_))
        ));
        assert!(store.is_empty());
        assert_eq!(editor.fields(), &before);
    }

    #[test]
    fn count_above_cap_inserts_nothing() {
        let mut store = store();
        let mut editor = ProductEditor::default();
        fill(&mut editor, "Pen", "2", "4294967295");

        let err = editor.submit(&mut store).unwrap_err();
        assert!(matches!(err, CrudsError::InvalidArgument(_)));
        assert!(err.is_recoverable());
        assert!(store.is_empty());
        assert_eq!(editor.fields().count, "4294967295");
    }
}
