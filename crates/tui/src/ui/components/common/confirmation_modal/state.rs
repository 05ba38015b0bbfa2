use flowdeck_engine::ConfirmationRequest;
use flowdeck_types::Severity;

/// Buttons offered by the confirmation modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalButton {
    Confirm,
    /// Focused when the modal opens so a stray Enter never confirms.
    #[default]
    Dismiss,
}

#[derive(Debug, Default, Clone)]
pub struct ConfirmationModalState {
    title: Option<String>,
    message: Option<String>,
    confirm_label: String,
    dismiss_label: String,
    severity: Severity,
    focused: ModalButton,
}

impl ConfirmationModalState {
    /// Resets the modal to show `request` with the given button labels.
    pub fn open_for(&mut self, request: &ConfirmationRequest, confirm_label: &str, dismiss_label: &str) {
        self.title = Some(request.title.clone());
        self.message = Some(request.message.clone());
        self.confirm_label = confirm_label.to_string();
        self.dismiss_label = dismiss_label.to_string();
        self.severity = Severity::Warning;
        self.focused = ModalButton::Dismiss;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Buttons in display order with their labels.
    pub fn buttons(&self) -> [(ModalButton, &str); 2] {
        [
            (ModalButton::Confirm, self.confirm_label.as_str()),
            (ModalButton::Dismiss, self.dismiss_label.as_str()),
        ]
    }

    pub fn is_button_focused(&self, button: ModalButton) -> bool {
        self.focused == button
    }

    pub fn focus(&mut self, button: ModalButton) {
        self.focused = button;
    }

    pub fn toggle_focus(&mut self) {
        self.focused = match self.focused {
            ModalButton::Confirm => ModalButton::Dismiss,
            ModalButton::Dismiss => ModalButton::Confirm,
        };
    }
}
