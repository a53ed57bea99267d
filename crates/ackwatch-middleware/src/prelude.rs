//! Prelude for ackwatch-middleware.

pub use crate::chain::{Dispatch, HandlerChain};
pub use crate::error::{MiddlewareError, MiddlewareResult};
pub use crate::handler::{FnHandler, Flow, Handler};
pub use crate::interaction::{
    AutocompleteData, ButtonData, CommandData, CommandOption, Interaction, InteractionData,
    InteractionKind, ModalData, PingData, StringSelectData, UnknownData,
};
pub use crate::timeout_detection::TimeoutDetectionHandler;
