use std::fmt::Display;

use inquire::{Confirm, InquireError, Select, Text};
use tracing::{debug, warn};

use crate::editor::{EditorMode, ProductEditor, SubmitOutcome};
use crate::errors::CrudsError;
use crate::parse::parse_row_number;
use crate::search::{Search, SearchMode};
use crate::store::{ProductStore, Storage};
use crate::table::{delete_all_label, render_table, rows};
use crate::CrudsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellAction {
    Submit(EditorMode),
    Edit,
    Delete,
    DeleteAll(usize),
    Search,
    SearchMode,
    CancelEdit,
    Exit,
}

impl Display for ShellAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellAction::Submit(EditorMode::Create) => write!(f, "Create product"),
            ShellAction::Submit(EditorMode::Update { index }) => {
                write!(f, "Update product #{}", index + 1)
            }
            ShellAction::Edit => write!(f, "Edit product"),
            ShellAction::Delete => write!(f, "Delete product"),
            ShellAction::DeleteAll(len) => match delete_all_label(*len) {
                Some(label) => write!(f, "{label}"),
                None => write!(f, "Delete All"),
            },
            ShellAction::Search => write!(f, "Search"),
            ShellAction::SearchMode => write!(f, "Change search mode"),
            ShellAction::CancelEdit => write!(f, "Cancel edit"),
            ShellAction::Exit => write!(f, "Quit"),
        }
    }
}

/// The yes/no gate in front of deleting every product.
pub fn confirm_clear(len: usize) -> Result<bool, CrudsError> {
    Ok(
        Confirm::new(&format!("Are you sure you want to delete all {len} products?"))
            .with_default(false)
            .prompt()?,
    )
}

/// Clears the store only if `confirm` agrees. Returns whether anything was cleared.
pub fn clear_confirmed<S: Storage>(
    store: &mut ProductStore<S>,
    confirm: impl FnOnce(usize) -> Result<bool, CrudsError>,
) -> Result<bool, CrudsError> {
    if store.is_empty() || !confirm(store.len())? {
        return Ok(false);
    }
    store.clear()?;
    Ok(true)
}

pub fn print_products<S: Storage>(store: &ProductStore<S>, search: &Search, config: &CrudsConfig) {
    let shown = search.apply(store.products());
    println!("{}", render_table(&rows(&shown), config.currency));
    if !search.query().is_empty() {
        println!(
            "{} matching {:?} ({} of {})",
            search.mode().placeholder(),
            search.query(),
            shown.len(),
            store.len()
        );
    }
}

struct Shell<'a, S> {
    store: &'a mut ProductStore<S>,
    config: &'a CrudsConfig,
    editor: ProductEditor,
    search: Search,
}

impl<S: Storage> Shell<'_, S> {
    fn actions(&self) -> Vec<ShellAction> {
        let mut actions = vec![ShellAction::Submit(self.editor.mode())];
        if !self.store.is_empty() {
            actions.extend([ShellAction::Edit, ShellAction::Delete]);
            actions.push(ShellAction::DeleteAll(self.store.len()));
        }
        actions.extend([ShellAction::Search, ShellAction::SearchMode]);
        if self.editor.is_updating() {
            actions.push(ShellAction::CancelEdit);
        }
        actions.push(ShellAction::Exit);
        actions
    }

    fn row_number(&self, prompt: &str) -> Result<usize, CrudsError> {
        let number = Text::new(prompt)
            .with_help_message(&format!("1 to {}", self.store.len()))
            .prompt()?;
        parse_row_number(&number)
    }

    fn perform(&mut self, action: ShellAction) -> Result<(), CrudsError> {
        match action {
            ShellAction::Submit(_) => {
                println!("{}", self.editor.submit_label());
                let with_count = self.editor.shows_count();
                self.editor
                    .fields_mut()
                    .prompt(self.config, with_count)?;
                match self.editor.submit(&mut *self.store)? {
                    SubmitOutcome::Created { copies: 1 } => println!("Created 1 product"),
                    SubmitOutcome::Created { copies } => println!("Created {copies} products"),
                    SubmitOutcome::Updated { index } => println!("Updated product #{}", index + 1),
                }
            }
            ShellAction::Edit => {
                let index = self.row_number("Edit which product?")?;
                self.editor.begin_edit(&*self.store, index)?;
                println!("Editing product #{}", index + 1);
            }
            ShellAction::Delete => {
                let index = self.row_number("Delete which product?")?;
                let removed = self.store.remove_at(index)?;
                println!("Deleted {removed}");
                if let EditorMode::Update { index: pending } = self.editor.mode() {
                    if pending >= index {
                        self.editor.cancel_edit();
                        println!("The product being edited moved, edit cancelled");
                    }
                }
            }
            ShellAction::DeleteAll(_) => {
                if clear_confirmed(&mut *self.store, confirm_clear)? {
                    self.editor.cancel_edit();
                    println!("Deleted all products");
                }
            }
            ShellAction::Search => {
                let query = Text::new(self.search.mode().placeholder())
                    .with_initial_value(self.search.query())
                    .prompt()?;
                self.search.set_query(query);
            }
            ShellAction::SearchMode => {
                let mode = Select::new(
                    "Search by:",
                    vec![SearchMode::Title, SearchMode::Category],
                )
                .prompt()?;
                self.search.select_mode(mode);
            }
            ShellAction::CancelEdit => self.editor.cancel_edit(),
            ShellAction::Exit => {}
        }
        Ok(())
    }
}

/// Runs the interactive loop until the user quits. Every action finishes
/// before the next one is offered.
pub fn run<S: Storage>(
    store: &mut ProductStore<S>,
    config: &CrudsConfig,
) -> Result<(), CrudsError> {
    let mut shell = Shell {
        store,
        config,
        editor: ProductEditor::default(),
        search: Search::default(),
    };

    loop {
        print_products(&*shell.store, &shell.search, shell.config);
        let action = match Select::new("What next?", shell.actions()).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };
        if action == ShellAction::Exit {
            break;
        }
        debug!(%action, "shell action");
        match shell.perform(action) {
            Ok(()) => {}
            Err(CrudsError::Prompt(InquireError::OperationCanceled)) => {}
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "action rejected");
                println!("{e}");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    fn config() -> CrudsConfig {
        CrudsConfig::default()
    }

    #[test]
    fn actions_follow_store_and_editor_state() {
        let mut store = ProductStore::open(MemoryStorage::default(), "products").unwrap();
        let config = config();
        let mut shell = Shell {
            store: &mut store,
            config: &config,
            editor: ProductEditor::default(),
            search: Search::default(),
        };
        assert_eq!(
            shell.actions(),
            vec![
                ShellAction::Submit(EditorMode::Create),
                ShellAction::Search,
                ShellAction::SearchMode,
                ShellAction::Exit,
            ]
        );

        let fields = shell.editor.fields_mut();
        fields.title = "Pen".to_string();
        fields.price = "2".to_string();
        fields.count = "2".to_string();
        fields.category = "Stationery".to_string();
        shell.editor.submit(&mut *shell.store).unwrap();
        shell.editor.begin_edit(&*shell.store, 1).unwrap();

        let actions = shell.actions();
        assert_eq!(actions[0], ShellAction::Submit(EditorMode::Update { index: 1 }));
        assert!(actions.contains(&ShellAction::DeleteAll(2)));
        assert!(actions.contains(&ShellAction::CancelEdit));
        assert_eq!(ShellAction::DeleteAll(2).to_string(), "Delete All (2)");
        assert_eq!(actions[0].to_string(), "Update product #2");
    }

    fn stocked_store() -> ProductStore<MemoryStorage> {
        let mut store = ProductStore::open(MemoryStorage::default(), "products").unwrap();
        let mut editor = ProductEditor::default();
        let fields = editor.fields_mut();
        fields.title = "Pen".to_string();
        fields.price = "2".to_string();
        fields.count = "3".to_string();
        fields.category = "Stationery".to_string();
        editor.submit(&mut store).unwrap();
        store
    }

    #[test]
    fn declined_clear_leaves_store_and_blob() {
        let mut store = stocked_store();
        let blob = store.storage().get("products").unwrap();

        let mut asked = None;
        let cleared = clear_confirmed(&mut store, |len| {
            asked = Some(len);
            Ok(false)
        })
        .unwrap();

        assert!(!cleared);
        assert_eq!(asked, Some(3));
        assert_eq!(store.len(), 3);
        assert_eq!(store.storage().get("products").unwrap(), blob);
    }

    #[test]
    fn confirmed_clear_empties_store_and_blob() {
        let mut store = stocked_store();
        assert!(clear_confirmed(&mut store, |_| Ok(true)).unwrap());
        assert!(store.is_empty());
        assert_eq!(
            store.storage().get("products").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn clearing_an_empty_store_asks_nothing() {
        let mut store = ProductStore::open(MemoryStorage::default(), "products").unwrap();
        let cleared = clear_confirmed(&mut store, |_| -> Result<bool, CrudsError> {
            panic!("confirmation requested for an empty store")
        })
        .unwrap();
        assert!(!cleared);
    }
}
