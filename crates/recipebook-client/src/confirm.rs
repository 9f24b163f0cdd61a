//! Yes/no gating before destructive actions.
//!
//! Each [`ConfirmationGate::open`] call produces its own prompt and its own
//! one-shot answer; nothing is shared between unrelated confirmations except
//! the gate's "a prompt is open" flag.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::debug;

use recipebook_core::Result;
use recipebook_core::error::SurfaceError;

/// Text of a confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationOptions {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
}

impl ConfirmationOptions {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        confirm_text: impl Into<String>,
        cancel_text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_text: confirm_text.into(),
            cancel_text: cancel_text.into(),
        }
    }

    /// The fixed prompt shown before deleting a recipe.
    pub fn delete_recipe() -> Self {
        Self::new(
            "Delete?",
            "Are you sure you want to delete the selected items ?",
            "YES, DELETE",
            "CANCEL",
        )
    }
}

/// Hands out confirmation prompts, at most one at a time.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationGate {
    busy: Arc<AtomicBool>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a prompt.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::ConfirmationPending`] while a previous prompt
    /// from this gate is still unanswered.
    pub fn open(&self, options: ConfirmationOptions) -> Result<(ConfirmationPrompt, Confirmed)> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SurfaceError::ConfirmationPending)?;

        debug!(title = %options.title, "Opening confirmation prompt");

        let (reply, answer) = oneshot::channel();
        Ok((
            ConfirmationPrompt {
                options,
                reply: Some(reply),
                busy: self.busy.clone(),
            },
            Confirmed { answer },
        ))
    }

    /// Returns true while a prompt is waiting for an answer.
    pub fn is_open(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// The open prompt. Answering consumes it; dropping it counts as cancel.
#[derive(Debug)]
pub struct ConfirmationPrompt {
    options: ConfirmationOptions,
    reply: Option<oneshot::Sender<bool>>,
    busy: Arc<AtomicBool>,
}

impl ConfirmationPrompt {
    pub fn options(&self) -> &ConfirmationOptions {
        &self.options
    }

    pub fn confirm(mut self) {
        self.settle(true);
    }

    pub fn cancel(mut self) {
        self.settle(false);
    }

    /// Escape, backdrop click and the like. Same as [`cancel`](Self::cancel).
    pub fn dismiss(mut self) {
        self.settle(false);
    }

    fn settle(&mut self, confirmed: bool) {
        if let Some(reply) = self.reply.take() {
            // The gate is free by the time the listener sees the answer.
            self.busy.store(false, Ordering::Release);
            debug!(confirmed, "Confirmation answered");
            let _ = reply.send(confirmed);
        }
    }
}

impl Drop for ConfirmationPrompt {
    fn drop(&mut self) {
        self.settle(false);
    }
}

/// Resolves once with the answer to one prompt.
#[derive(Debug)]
#[must_use = "the answer is only observed by awaiting it"]
pub struct Confirmed {
    answer: oneshot::Receiver<bool>,
}

impl Future for Confirmed {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        Pin::new(&mut self.answer)
            .poll(cx)
            .map(|answer| answer.unwrap_or(false))
    }
}
