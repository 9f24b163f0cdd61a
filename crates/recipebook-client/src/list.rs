//! The paginated recipe list and the actions launched from it.
//!
//! Every fetch is tagged with a sequence number when it is issued. A result
//! is committed only if no later fetch has been issued in the meantime;
//! anything else is dropped on arrival. Issuing and committing both happen
//! under the view channel's lock, so the check cannot interleave with a new
//! issue.
//!
//! `is_loading` is derived, never toggled: it holds while a delete is in
//! flight or while the latest issued fetch has not committed.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use recipebook_core::error::InvalidInputError;
use recipebook_core::{Error, PageRequest, PageResult, Recipe, RecordGateway, RecordId, Result};

use crate::confirm::{ConfirmationGate, ConfirmationOptions, ConfirmationPrompt};
use crate::dialog::{DialogOutcome, RecordDialog};
use crate::notice::Notice;

/// Everything the shell renders for the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    /// The most recently committed page.
    pub page: PageResult<Recipe>,
    pub is_loading: bool,
    /// The page that was last asked for.
    pub request: PageRequest,
    pub selected: Option<RecordId>,
    pub notice: Option<Notice>,
}

impl ListView {
    fn loading(request: PageRequest) -> Self {
        Self {
            page: PageResult::empty(request),
            is_loading: true,
            request,
            selected: None,
            notice: None,
        }
    }
}

/// What happened to one fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The page replaced the current one.
    Applied,
    /// The fetch failed and the list fell back to an empty page.
    Failed(Error),
    /// A later fetch was issued first; the result was dropped.
    Superseded,
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied)
    }
}

/// What happened to one delete request.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// The recipe was deleted and the page reloaded.
    Deleted,
    /// The user declined; nothing was called.
    Cancelled,
    Failed(Error),
}

struct Shared {
    gateway: Arc<dyn RecordGateway>,
    view: watch::Sender<ListView>,
    issued: AtomicU64,
    /// Sequence number of the last committed fetch.
    settled: AtomicU64,
    deletes: AtomicUsize,
    confirmations: ConfirmationGate,
}

/// Drives the recipe list.
///
/// Cheap to clone; clones drive the same list.
#[derive(Clone)]
pub struct ListOrchestrator {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for ListOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListOrchestrator")
            .field("view", &*self.shared.view.borrow())
            .field("issued", &self.shared.issued.load(Ordering::Relaxed))
            .field("settled", &self.shared.settled.load(Ordering::Relaxed))
            .field("deletes", &self.shared.deletes.load(Ordering::Relaxed))
            .finish()
    }
}

impl ListOrchestrator {
    /// Create the list and issue its first fetch.
    ///
    /// The list starts out loading; the returned future completes the
    /// initial fetch.
    pub fn start(
        gateway: Arc<dyn RecordGateway>,
        request: PageRequest,
    ) -> (Self, BoxFuture<'static, FetchOutcome>) {
        let (view, _) = watch::channel(ListView::loading(request));
        let orchestrator = Self {
            shared: Arc::new(Shared {
                gateway,
                view,
                issued: AtomicU64::new(0),
                settled: AtomicU64::new(0),
                deletes: AtomicUsize::new(0),
                confirmations: ConfirmationGate::new(),
            }),
        };
        let initial = orchestrator.load_page(request);
        (orchestrator, initial)
    }

    /// A copy of the current view.
    pub fn view(&self) -> ListView {
        self.shared.view.borrow().clone()
    }

    /// Receive every view change.
    pub fn subscribe(&self) -> watch::Receiver<ListView> {
        self.shared.view.subscribe()
    }

    /// Issue a fetch for `request`.
    ///
    /// The fetch counts as issued as soon as this returns; the future
    /// performs the gateway call and the commit.
    pub fn load_page(&self, request: PageRequest) -> BoxFuture<'static, FetchOutcome> {
        let mut seq = 0;
        self.shared.view.send_modify(|view| {
            seq = self.shared.issued.fetch_add(1, Ordering::AcqRel) + 1;
            view.is_loading = true;
            view.request = request;
        });

        let shared = self.shared.clone();
        async move { shared.fetch(seq, request).await }.boxed()
    }

    /// A pagination event from the shell.
    pub fn change_page(&self, request: PageRequest) -> BoxFuture<'static, FetchOutcome> {
        debug!(
            page_index = request.page_index(),
            page_size = request.page_size(),
            "Page changed"
        );
        self.load_page(request)
    }

    /// Fetch the current page again.
    pub fn reload(&self) -> BoxFuture<'static, FetchOutcome> {
        let request = self.shared.view.borrow().request;
        self.load_page(request)
    }

    pub fn select(&self, id: Option<RecordId>) {
        self.shared.view.send_modify(|view| view.selected = id);
    }

    pub fn dismiss_notice(&self) {
        self.shared.view.send_if_modified(|view| view.notice.take().is_some());
    }

    /// Open an empty dialog for a new recipe.
    ///
    /// The returned future resolves to the dialog's outcome, after the
    /// current page has been reloaded if the outcome is a success.
    pub fn open_create(&self) -> (RecordDialog, BoxFuture<'static, DialogOutcome>) {
        let (dialog, outcome) = RecordDialog::open(self.shared.gateway.clone(), None);
        (dialog, self.reload_after(outcome))
    }

    /// Open a dialog for an existing recipe and start loading it.
    ///
    /// The dialog comes back at once, reporting loading; the first future
    /// completes the load and the second resolves the outcome. A failed load
    /// is shown inline on the dialog, which stays open. Cancelling before the
    /// load completes dismisses the dialog and discards the recipe.
    ///
    /// # Errors
    ///
    /// Fails only when `recipe` has never been saved.
    pub fn open_edit(
        &self,
        recipe: &Recipe,
    ) -> Result<(
        RecordDialog,
        BoxFuture<'static, Result<()>>,
        BoxFuture<'static, DialogOutcome>,
    )> {
        let id = saved_id(recipe)?;
        let (dialog, outcome) = RecordDialog::open(self.shared.gateway.clone(), Some(id));
        let loaded = dialog.start_load();
        Ok((dialog, loaded, self.reload_after(outcome)))
    }

    fn reload_after(
        &self,
        outcome: impl std::future::Future<Output = DialogOutcome> + Send + 'static,
    ) -> BoxFuture<'static, DialogOutcome> {
        let this = self.clone();
        async move {
            let outcome = outcome.await;
            debug!(?outcome, "Dialog closed");
            if outcome == DialogOutcome::Success {
                this.reload().await;
            }
            outcome
        }
        .boxed()
    }

    /// Ask before deleting `recipe`.
    ///
    /// The shell answers the returned prompt; the future resolves after the
    /// answer and, if confirmed, the delete and reload.
    ///
    /// # Errors
    ///
    /// Fails when another confirmation is still pending or when `recipe`
    /// has never been saved.
    #[instrument(skip(self, recipe), fields(name = %recipe.name))]
    pub fn request_delete(
        &self,
        recipe: &Recipe,
    ) -> Result<(ConfirmationPrompt, BoxFuture<'static, DeleteOutcome>)> {
        let id = saved_id(recipe)?;
        let (prompt, confirmed) = self
            .shared
            .confirmations
            .open(ConfirmationOptions::delete_recipe())?;

        let this = self.clone();
        let follow_up = async move {
            if !confirmed.await {
                debug!(id = %id, "Delete cancelled");
                return DeleteOutcome::Cancelled;
            }

            let pending = PendingDelete::begin(this.shared.clone());

            match this.shared.gateway.delete(&id).await {
                Ok(()) => {
                    info!(id = %id, "Recipe deleted");
                    let reload = this.reload();
                    pending.finish(|view| view.selected = None);
                    reload.await;
                    DeleteOutcome::Deleted
                }
                Err(err) => {
                    warn!(id = %id, error = %err, "Delete failed");
                    pending.finish(|view| view.notice = Some(Notice::from(&err)));
                    DeleteOutcome::Failed(err)
                }
            }
        }
        .boxed();

        Ok((prompt, follow_up))
    }
}

impl Shared {
    fn busy(&self) -> bool {
        self.deletes.load(Ordering::Acquire) > 0
            || self.issued.load(Ordering::Acquire) != self.settled.load(Ordering::Acquire)
    }

    async fn fetch(&self, seq: u64, request: PageRequest) -> FetchOutcome {
        debug!(
            seq,
            page_index = request.page_index(),
            page_size = request.page_size(),
            "Fetching page"
        );

        let result = self
            .gateway
            .list(request.page_index(), request.page_size())
            .await;

        let mut outcome = FetchOutcome::Superseded;
        self.view.send_if_modified(|view| {
            if self.issued.load(Ordering::Acquire) != seq {
                return false;
            }

            self.settled.store(seq, Ordering::Release);
            view.is_loading = self.busy();
            match result {
                Ok(mut page) => {
                    page.contents.truncate(request.page_size() as usize);
                    view.page = page;
                    view.notice = None;
                    outcome = FetchOutcome::Applied;
                }
                Err(err) => {
                    warn!(seq, error = %err, "Listing recipes failed; showing an empty page");
                    view.page = PageResult::empty(request);
                    view.notice = err.requires_reauth().then(|| Notice::from(&err));
                    outcome = FetchOutcome::Failed(err);
                }
            }
            true
        });

        if matches!(outcome, FetchOutcome::Superseded) {
            debug!(seq, "Discarding superseded page");
        }
        outcome
    }
}

/// Counts one delete as in flight until finished or dropped.
struct PendingDelete {
    shared: Arc<Shared>,
    finished: bool,
}

impl PendingDelete {
    fn begin(shared: Arc<Shared>) -> Self {
        shared.view.send_modify(|view| {
            shared.deletes.fetch_add(1, Ordering::AcqRel);
            view.is_loading = true;
        });
        Self {
            shared,
            finished: false,
        }
    }

    fn finish(mut self, update: impl FnOnce(&mut ListView)) {
        self.finished = true;
        self.release(update);
    }

    fn release(&self, update: impl FnOnce(&mut ListView)) {
        let shared = &self.shared;
        shared.view.send_modify(|view| {
            shared.deletes.fetch_sub(1, Ordering::AcqRel);
            update(view);
            view.is_loading = shared.busy();
        });
    }
}

impl Drop for PendingDelete {
    fn drop(&mut self) {
        if !self.finished {
            self.release(|_| {});
        }
    }
}

fn saved_id(recipe: &Recipe) -> Result<RecordId> {
    recipe.id.clone().ok_or_else(|| {
        InvalidInputError::Other {
            message: "recipe has not been saved yet".to_string(),
        }
        .into()
    })
}
