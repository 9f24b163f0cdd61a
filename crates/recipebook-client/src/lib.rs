//! recipebook-client - Orchestration of the recipe book's interactive flows.
//!
//! - [`ListOrchestrator`] keeps one authoritative page of recipes, applying
//!   only the most recently issued fetch.
//! - [`RecordDialog`] runs a single create or edit session and resolves one
//!   [`DialogOutcome`].
//! - [`ConfirmationGate`] turns a yes/no prompt into a one-shot answer.
//! - [`IngredientEditor`] keeps the ingredient rows non-empty.
//! - [`SessionManager`] is the only writer of the session context.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use recipebook_client::ListOrchestrator;
//! use recipebook_core::{PageRequest, RecordGateway};
//!
//! # async fn example(gateway: Arc<dyn RecordGateway>) {
//! let (list, initial) = ListOrchestrator::start(gateway, PageRequest::default());
//! initial.await;
//!
//! let (dialog, after_close) = list.open_create();
//! // ... fill the form, then:
//! let _ = dialog.submit().await;
//! let outcome = after_close.await;
//! # let _ = outcome;
//! # }
//! ```

mod confirm;
mod dialog;
mod ingredients;
mod list;
mod notice;
mod session;

pub use confirm::{ConfirmationGate, ConfirmationOptions, ConfirmationPrompt, Confirmed};
pub use dialog::{DialogOutcome, NAME_MAX_CHARS, NAME_MIN_CHARS, PendingOutcome, RecipeForm, RecordDialog};
pub use ingredients::IngredientEditor;
pub use list::{DeleteOutcome, FetchOutcome, ListOrchestrator, ListView};
pub use notice::Notice;
pub use session::SessionManager;
