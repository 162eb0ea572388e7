use crate::domain::DialogRequest;

/// Single-slot modal: showing a new dialog dismisses whatever is up.
#[derive(Debug, Default)]
pub struct DialogPresenter {
    live: Option<DialogRequest>,
}

impl DialogPresenter {
    /// Present `request`, returning the dialog it replaced, if any.
    pub fn show(&mut self, request: DialogRequest) -> Option<DialogRequest> {
        tracing::debug!("Dialog: {} - {}", request.title, request.body);
        self.live.replace(request)
    }

    /// The user acknowledged the dialog.
    pub fn dismiss(&mut self) -> Option<DialogRequest> {
        self.live.take()
    }

    pub fn live(&self) -> Option<&DialogRequest> {
        self.live.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_replaces_live_dialog() {
        let mut dialogs = DialogPresenter::default();
        assert!(dialogs.show(DialogRequest::new("First", "one")).is_none());

        let replaced = dialogs.show(DialogRequest::new("Second", "two"));
        assert_eq!(replaced.unwrap().title, "First");
        assert_eq!(dialogs.live().unwrap().title, "Second");
    }

    #[test]
    fn test_dismiss() {
        let mut dialogs = DialogPresenter::default();
        dialogs.show(DialogRequest::new("Error", "boom"));
        assert_eq!(dialogs.dismiss().unwrap().body, "boom");
        assert!(dialogs.live().is_none());
        assert!(dialogs.dismiss().is_none());
    }
}
