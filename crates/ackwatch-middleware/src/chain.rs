//! Ordered handler chain.
//!
//! Handlers run one after another. A handler returning [`Flow::Stop`] or an
//! error ends the dispatch. Each dispatch is logged on entry (`->`) and on
//! exit (`<-`, with elapsed time) at `debug` level.

use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::error::{MiddlewareError, MiddlewareResult};
use crate::handler::{Flow, Handler};
use crate::interaction::Interaction;

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Handlers that ran, including the one that stopped the chain.
    pub handlers_run: usize,
    /// Name of the handler that returned [`Flow::Stop`], if any.
    pub stopped_by: Option<String>,
    /// Time spent in the chain.
    pub elapsed: Duration,
}

/// Ordered sequence of handlers sharing state `S`.
pub struct HandlerChain<S> {
    handlers: Vec<Arc<dyn Handler<S>>>,
    contain_panics: bool,
}

impl<S: Sync> Default for HandlerChain<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sync> HandlerChain<S> {
    /// Create an empty chain with panic containment enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            contain_panics: true,
        }
    }

    /// Append a handler.
    #[must_use]
    pub fn with(mut self, handler: impl Handler<S> + 'static) -> Self {
        self.push(Arc::new(handler));
        self
    }

    /// Append a shared handler.
    pub fn push(&mut self, handler: Arc<dyn Handler<S>>) {
        self.handlers.push(handler);
    }

    /// Let handler panics unwind through [`dispatch`](Self::dispatch).
    #[must_use]
    pub fn without_panic_containment(mut self) -> Self {
        self.contain_panics = false;
        self
    }

    /// Number of handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if the chain has no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handler names in run order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }

    /// Run the handlers in order for one interaction.
    ///
    /// # Errors
    ///
    /// Returns the first handler error. With panic containment enabled, a
    /// panicking handler yields [`MiddlewareError::HandlerPanicked`].
    pub async fn dispatch(&self, interaction: &Interaction, state: &S) -> MiddlewareResult<Dispatch> {
        let started = Instant::now();
        let kind = interaction.kind.kind_name();
        debug!(
            "-> {} in {} {kind}",
            interaction.sender_id, interaction.channel_id
        );

        let result = self.run_handlers(interaction, state).await;

        let elapsed = started.elapsed();
        debug!(
            "<- {} in {} {kind} {elapsed:?}",
            interaction.sender_id, interaction.channel_id
        );

        result.map(|(handlers_run, stopped_by)| Dispatch {
            handlers_run,
            stopped_by,
            elapsed,
        })
    }

    async fn run_handlers(
        &self,
        interaction: &Interaction,
        state: &S,
    ) -> MiddlewareResult<(usize, Option<String>)> {
        let mut handlers_run = 0;
        for handler in &self.handlers {
            handlers_run += 1;
            let future = handler.handle(interaction, state);
            let flow = if self.contain_panics {
                match AssertUnwindSafe(future).catch_unwind().await {
                    Ok(result) => result,
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        error!(
                            handler = handler.name(),
                            token = interaction.token.as_str(),
                            panic = message.as_str(),
                            "handler panicked"
                        );
                        Err(MiddlewareError::handler_panicked(handler.name(), message))
                    }
                }
            } else {
                future.await
            }?;

            if flow == Flow::Stop {
                return Ok((handlers_run, Some(handler.name().to_string())));
            }
        }
        Ok((handlers_run, None))
    }
}

impl<S: Sync> fmt::Debug for HandlerChain<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerChain")
            .field(
                "handlers",
                &self.handlers.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .field("contain_panics", &self.contain_panics)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
