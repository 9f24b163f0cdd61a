//! The modal create/edit surface for one recipe.
//!
//! A [`RecordDialog`] owns exactly one editing session. Its opener only ever
//! learns a single [`DialogOutcome`], delivered through the
//! [`PendingOutcome`] future handed out when the dialog was opened. The
//! dialog closes immediately on cancel; a gateway call that completes after
//! that is discarded.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};
use tokio::sync::oneshot;
use tracing::{debug, instrument};

use recipebook_core::error::{FieldViolation, SurfaceError, ValidationError};
use recipebook_core::{Error, Recipe, RecordGateway, RecordId, Result};

use crate::ingredients::IngredientEditor;
use crate::notice::Notice;

pub const NAME_MIN_CHARS: usize = 5;
pub const NAME_MAX_CHARS: usize = 255;

/// Terminal result of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// The store was mutated.
    Success,
    /// Closed without a successful submission.
    Dismissed,
}

/// The scalar fields of the recipe form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeForm {
    pub name: String,
    pub suitable_for: u32,
    pub vegetarian: bool,
    pub cooking_instruction: String,
}

impl RecipeForm {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            suitable_for: recipe.suitable_for,
            vegetarian: recipe.vegetarian,
            cooking_instruction: recipe.cooking_instruction.clone(),
        }
    }

    /// Check the form together with its ingredient rows.
    pub fn validate(&self, ingredients: &[String]) -> std::result::Result<(), ValidationError> {
        let mut violations = Vec::new();

        let name_len = self.name.chars().count();
        if self.name.trim().is_empty() {
            violations.push(FieldViolation {
                field: "name",
                message: "Recipe name is required".to_string(),
            });
        } else if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
            violations.push(FieldViolation {
                field: "name",
                message: format!(
                    "Recipe name must be between {} and {} characters",
                    NAME_MIN_CHARS, NAME_MAX_CHARS
                ),
            });
        }

        if self.suitable_for < 1 {
            violations.push(FieldViolation {
                field: "suitableFor",
                message: "Suitable for must be at least 1".to_string(),
            });
        }

        if self.cooking_instruction.trim().is_empty() {
            violations.push(FieldViolation {
                field: "cookingInstruction",
                message: "Cooking instruction is required".to_string(),
            });
        }

        if ingredients.is_empty() || ingredients.iter().any(|i| i.trim().is_empty()) {
            violations.push(FieldViolation {
                field: "ingredients",
                message: "Every ingredient needs a value".to_string(),
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }

    /// Copy the form and the ingredient rows into `recipe`.
    fn merge_into(&self, recipe: &mut Recipe, ingredients: &[String]) {
        recipe.name = self.name.clone();
        recipe.suitable_for = self.suitable_for;
        recipe.vegetarian = self.vegetarian;
        recipe.cooking_instruction = self.cooking_instruction.clone();
        recipe.ingredients = ingredients.to_vec();
    }
}

/// Everything that exists only while the dialog is open.
struct Editing {
    recipe: Recipe,
    form: RecipeForm,
    ingredients: IngredientEditor,
    error: Option<Notice>,
    loading: bool,
    submitting: bool,
    outcome: oneshot::Sender<DialogOutcome>,
}

type Slot = Mutex<Option<Editing>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<Editing>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply_loaded(slot: &Slot, result: Result<Recipe>) -> Result<()> {
    let mut state = lock(slot);
    let Some(editing) = state.as_mut() else {
        debug!("Dialog closed while loading; discarding result");
        return Err(SurfaceError::DialogClosed.into());
    };
    editing.loading = false;

    match result {
        Ok(recipe) => {
            editing.form = RecipeForm::from_recipe(&recipe);
            editing.ingredients = IngredientEditor::from_values(recipe.ingredients.clone());
            editing.recipe = recipe;
            editing.error = None;
            Ok(())
        }
        Err(err) => {
            debug!(error = %err, "Loading recipe failed");
            editing.error = Some(Notice::from(&err));
            Err(err)
        }
    }
}

/// One create or edit session.
///
/// Dropping an open dialog resolves [`DialogOutcome::Dismissed`].
pub struct RecordDialog {
    gateway: Arc<dyn RecordGateway>,
    record_id: Option<RecordId>,
    state: Arc<Slot>,
}

impl fmt::Debug for RecordDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDialog")
            .field("record_id", &self.record_id)
            .field("open", &self.is_open())
            .finish()
    }
}

impl RecordDialog {
    /// Open a dialog for a new recipe (`record_id` absent) or an existing one.
    ///
    /// Editing dialogs start empty; call [`load`](Self::load) or
    /// [`start_load`](Self::start_load) to fetch the stored recipe.
    pub fn open(
        gateway: Arc<dyn RecordGateway>,
        record_id: Option<RecordId>,
    ) -> (RecordDialog, PendingOutcome) {
        let (outcome, receiver) = oneshot::channel();
        let recipe = Recipe {
            id: record_id.clone(),
            ..Recipe::blank()
        };

        debug!(record_id = ?record_id, "Opening recipe dialog");

        let dialog = RecordDialog {
            gateway,
            record_id,
            state: Arc::new(Mutex::new(Some(Editing {
                form: RecipeForm::from_recipe(&recipe),
                ingredients: IngredientEditor::from_values(recipe.ingredients.clone()),
                recipe,
                error: None,
                loading: false,
                submitting: false,
                outcome,
            }))),
        };

        (dialog, PendingOutcome { receiver })
    }

    /// Fetch the stored recipe and seed the form with it.
    ///
    /// On failure the dialog stays open with its empty form and the error
    /// shown inline.
    #[instrument(skip(self), fields(record_id = ?self.record_id))]
    pub async fn load(&self) -> Result<()> {
        self.start_load().await
    }

    /// Start fetching the stored recipe; the returned future completes it.
    ///
    /// The dialog reports loading as soon as this returns. A recipe that
    /// arrives after the dialog was closed is discarded.
    pub fn start_load(&self) -> BoxFuture<'static, Result<()>> {
        let Some(id) = self.record_id.clone() else {
            return future::ready(Ok(())).boxed();
        };

        match lock(&self.state).as_mut() {
            Some(editing) => editing.loading = true,
            None => return future::ready(Err(SurfaceError::DialogClosed.into())).boxed(),
        }

        let gateway = self.gateway.clone();
        let state = self.state.clone();
        async move {
            let result = gateway.get(&id).await;
            apply_loaded(&state, result)
        }
        .boxed()
    }

    /// Validate, then create or update through the gateway.
    ///
    /// Success closes the dialog and resolves [`DialogOutcome::Success`]
    /// after its state has been released. Failure leaves it open with the
    /// message shown inline; the user may submit again.
    #[instrument(skip(self), fields(record_id = ?self.record_id))]
    pub async fn submit(&self) -> Result<()> {
        let recipe = {
            let mut state = lock(&self.state);
            let editing = state.as_mut().ok_or(SurfaceError::DialogClosed)?;
            if editing.submitting {
                return Err(SurfaceError::SubmissionPending.into());
            }

            let ingredients = editing.ingredients.values();
            if let Err(err) = editing.form.validate(ingredients) {
                let err = Error::Validation(err);
                editing.error = Some(Notice::from(&err));
                return Err(err);
            }

            let mut recipe = editing.recipe.clone();
            editing.form.merge_into(&mut recipe, ingredients);
            editing.submitting = true;
            editing.error = None;
            recipe
        };

        let guard = SubmitGuard { state: &*self.state };
        let result = match &self.record_id {
            None => self.gateway.create(&recipe).await,
            Some(id) => self.gateway.update(id, &recipe).await,
        };
        drop(guard);

        let mut state = lock(&self.state);
        match result {
            Ok(_) => {
                let released = state.take();
                drop(state);
                match released {
                    Some(editing) => {
                        debug!("Recipe saved; closing dialog");
                        let _ = editing.outcome.send(DialogOutcome::Success);
                        Ok(())
                    }
                    None => {
                        debug!("Dialog closed while saving; discarding result");
                        Err(SurfaceError::DialogClosed.into())
                    }
                }
            }
            Err(err) => {
                match state.as_mut() {
                    Some(editing) => editing.error = Some(Notice::from(&err)),
                    None => debug!(error = %err, "Dialog closed while saving; discarding error"),
                }
                Err(err)
            }
        }
    }

    /// Close without saving. Returns false if the dialog was already closed.
    pub fn cancel(&self) -> bool {
        let editing = lock(&self.state).take();
        match editing {
            Some(editing) => {
                debug!(record_id = ?self.record_id, "Recipe dialog dismissed");
                let _ = editing.outcome.send(DialogOutcome::Dismissed);
                true
            }
            None => false,
        }
    }

    pub fn record_id(&self) -> Option<&RecordId> {
        self.record_id.as_ref()
    }

    pub fn is_open(&self) -> bool {
        lock(&self.state).is_some()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).as_ref().is_some_and(|e| e.loading)
    }

    pub fn is_submitting(&self) -> bool {
        lock(&self.state).as_ref().is_some_and(|e| e.submitting)
    }

    /// Current form values, or `None` once closed.
    pub fn form(&self) -> Option<RecipeForm> {
        lock(&self.state).as_ref().map(|e| e.form.clone())
    }

    pub fn set_form(&self, form: RecipeForm) -> Result<()> {
        self.update_form(|current| *current = form)
    }

    pub fn update_form(&self, update: impl FnOnce(&mut RecipeForm)) -> Result<()> {
        let mut state = lock(&self.state);
        let editing = state.as_mut().ok_or(SurfaceError::DialogClosed)?;
        update(&mut editing.form);
        Ok(())
    }

    /// Current ingredient rows, or `None` once closed.
    pub fn ingredients(&self) -> Option<Vec<String>> {
        lock(&self.state)
            .as_ref()
            .map(|e| e.ingredients.values().to_vec())
    }

    pub fn edit_ingredients<R>(&self, edit: impl FnOnce(&mut IngredientEditor) -> R) -> Result<R> {
        let mut state = lock(&self.state);
        let editing = state.as_mut().ok_or(SurfaceError::DialogClosed)?;
        Ok(edit(&mut editing.ingredients))
    }

    /// The inline error, if any.
    pub fn error(&self) -> Option<Notice> {
        lock(&self.state).as_ref().and_then(|e| e.error.clone())
    }

    pub fn clear_error(&self) {
        if let Some(editing) = lock(&self.state).as_mut() {
            editing.error = None;
        }
    }
}

/// Resets the in-flight flag if the submission is abandoned mid-call.
struct SubmitGuard<'a> {
    state: &'a Slot,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if let Some(editing) = lock(self.state).as_mut() {
            editing.submitting = false;
        }
    }
}

/// Resolves once with the outcome of one dialog.
#[derive(Debug)]
#[must_use = "the outcome is only observed by awaiting it"]
pub struct PendingOutcome {
    receiver: oneshot::Receiver<DialogOutcome>,
}

impl Future for PendingOutcome {
    type Output = DialogOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<DialogOutcome> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|outcome| outcome.unwrap_or(DialogOutcome::Dismissed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RecipeForm {
        RecipeForm {
            name: "Tomato soup".to_string(),
            suitable_for: 2,
            vegetarian: true,
            cooking_instruction: "Simmer for 20 minutes.".to_string(),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(filled().validate(&["tomatoes".to_string()]).is_ok());
    }

    #[test]
    fn blank_ingredient_is_rejected() {
        let err = filled()
            .validate(&["tomatoes".to_string(), "  ".to_string()])
            .unwrap_err();
        assert!(err.has_field("ingredients"));
        assert_eq!(err.violations().len(), 1);

        let err = filled().validate(&[String::new()]).unwrap_err();
        assert!(err.has_field("ingredients"));
    }

    #[test]
    fn name_length_is_bounded() {
        let mut form = filled();
        form.name = "Soup".to_string();
        assert!(form.validate(&["x".to_string()]).unwrap_err().has_field("name"));

        form.name = "x".repeat(NAME_MAX_CHARS + 1);
        assert!(form.validate(&["x".to_string()]).unwrap_err().has_field("name"));

        form.name = "x".repeat(NAME_MAX_CHARS);
        assert!(form.validate(&["x".to_string()]).is_ok());
    }

    #[test]
    fn every_missing_field_is_reported() {
        let err = RecipeForm::default().validate(&[String::new()]).unwrap_err();
        for field in ["name", "suitableFor", "cookingInstruction", "ingredients"] {
            assert!(err.has_field(field), "missing violation for {field}");
        }
    }

    #[test]
    fn merge_keeps_identity_and_row_order() {
        let mut recipe = Recipe {
            id: Some(RecordId::new("r-1").unwrap()),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            ..Recipe::blank()
        };
        let rows = vec!["b".to_string(), "a".to_string()];
        filled().merge_into(&mut recipe, &rows);

        assert_eq!(recipe.id.as_ref().unwrap().as_str(), "r-1");
        assert_eq!(recipe.ingredients, rows);
        assert_eq!(recipe.name, "Tomato soup");
    }
}
