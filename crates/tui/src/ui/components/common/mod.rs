pub mod confirmation_modal;

pub use confirmation_modal::{ConfirmationModal, ConfirmationModalState};
