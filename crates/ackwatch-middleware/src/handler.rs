//! Handler abstraction.

use async_trait::async_trait;
use std::fmt;

use crate::error::MiddlewareResult;
use crate::interaction::Interaction;

/// Whether the chain should run the next handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next handler.
    Continue,
    /// Skip the remaining handlers.
    Stop,
}

/// One step of a [`HandlerChain`](crate::HandlerChain).
///
/// `S` is application state shared by every handler of a chain.
#[async_trait]
pub trait Handler<S: Sync>: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Process an interaction.
    async fn handle(&self, interaction: &Interaction, state: &S) -> MiddlewareResult<Flow>;
}

/// Adapts a synchronous closure into a [`Handler`].
pub struct FnHandler<F> {
    name: String,
    f: F,
}

impl<F> FnHandler<F> {
    /// Wrap `f` under `name`.
    pub fn new<S>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Interaction, &S) -> MiddlewareResult<Flow>,
    {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<S, F> Handler<S> for FnHandler<F>
where
    S: Sync,
    F: Fn(&Interaction, &S) -> MiddlewareResult<Flow> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, interaction: &Interaction, state: &S) -> MiddlewareResult<Flow> {
        (self.f)(interaction, state)
    }
}
