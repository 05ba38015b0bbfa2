//! # Flowdeck Engine
//!
//! Client-side controller for workflow executions. The engine keeps the list
//! of executions a user is looking at, forwards retry and cancel requests to
//! the execution service, and turns every outcome into a notification.
//!
//! ## Architecture
//!
//! - **`store`**: the single-writer record set, filter and selection
//! - **`in_flight`**: per-record guard against duplicate retry/cancel submissions
//! - **`notifications`**: bounded, expiring queue of user-facing messages
//! - **`confirm`**: the confirmation prompt seam used before cancelling
//! - **`controller`**: the read/act/refresh loop tying the above to an
//!   [`ExecutionService`](flowdeck_api::ExecutionService)

pub mod confirm;
pub mod controller;
pub mod in_flight;
pub mod notifications;
pub mod store;

pub use confirm::{AlwaysConfirm, AlwaysDecline, ConfirmationPrompt, ConfirmationRequest};
pub use controller::{ActionError, ActionRejected, ActionTicket, ExecutionListController, LoadOutcome, LoadTicket};
pub use in_flight::{ActionKind, InFlightActions};
pub use notifications::NotificationCenter;
pub use store::{ExecutionStore, MergeOutcome};
