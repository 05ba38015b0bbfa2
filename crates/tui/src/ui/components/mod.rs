//! UI components: execution table, detail pane, toasts, hint bar, modals.

pub mod common;
pub mod component;
pub mod detail;
pub mod executions;
pub mod hint_bar;
pub mod toasts;

pub(crate) use component::Component;
pub use detail::DetailComponent;
pub use executions::ExecutionsComponent;
pub use hint_bar::{HintBarComponent, build_hint_spans};
pub use toasts::ToastsComponent;
