/// Visibility of the chatbot suggestion popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatbotState {
    #[default]
    Hidden,
    Visible,
}

/// Presenter for the chatbot suggestion popup.
///
/// Visibility and content derive purely from the latest analysis result's
/// `chatbot_reply`. A fresh non-empty reply always (re-)opens the popup;
/// only an explicit user toggle hides it again. With no message there is
/// nothing to show and nothing to dismiss.
#[derive(Debug, Clone, Default)]
pub struct ChatbotPresenter {
    state: ChatbotState,
    message: Option<String>,
}

impl ChatbotPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called whenever a new analysis result is committed.
    pub fn observe(&mut self, reply: Option<&str>) {
        match reply {
            Some(message) if !message.trim().is_empty() => {
                self.message = Some(message.to_string());
                self.state = ChatbotState::Visible;
            }
            _ => {
                self.message = None;
                self.state = ChatbotState::Hidden;
            }
        }
    }

    /// Explicit user toggle. Only ever moves between Hidden and Visible,
    /// and only while a message exists.
    pub fn toggle(&mut self) {
        if self.message.is_none() {
            return;
        }
        self.state = match self.state {
            ChatbotState::Hidden => ChatbotState::Visible,
            ChatbotState::Visible => ChatbotState::Hidden,
        };
    }

    pub fn state(&self) -> ChatbotState {
        self.state
    }

    /// The message to render, or `None` while hidden or empty.
    pub fn visible_message(&self) -> Option<&str> {
        match self.state {
            ChatbotState::Visible => self.message.as_deref(),
            ChatbotState::Hidden => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_or_empty_reply_never_shows() {
        let mut presenter = ChatbotPresenter::new();

        presenter.observe(None);
        assert_eq!(presenter.state(), ChatbotState::Hidden);
        assert!(presenter.visible_message().is_none());

        presenter.observe(Some(""));
        assert_eq!(presenter.state(), ChatbotState::Hidden);

        presenter.observe(Some("   "));
        assert_eq!(presenter.state(), ChatbotState::Hidden);
    }

    #[test]
    fn test_reply_then_dismiss_then_new_reply() {
        let mut presenter = ChatbotPresenter::new();

        presenter.observe(Some("try journaling"));
        assert_eq!(presenter.state(), ChatbotState::Visible);
        assert_eq!(presenter.visible_message(), Some("try journaling"));

        presenter.toggle();
        assert_eq!(presenter.state(), ChatbotState::Hidden);
        assert!(presenter.visible_message().is_none());

        presenter.observe(Some("take a short walk"));
        assert_eq!(presenter.state(), ChatbotState::Visible);
        assert_eq!(presenter.visible_message(), Some("take a short walk"));
    }

    #[test]
    fn test_fresh_reply_reopens_even_if_visible() {
        let mut presenter = ChatbotPresenter::new();

        presenter.observe(Some("first"));
        presenter.observe(Some("second"));
        assert_eq!(presenter.state(), ChatbotState::Visible);
        assert_eq!(presenter.visible_message(), Some("second"));
    }

    #[test]
    fn test_toggle_reopens_after_dismissal() {
        let mut presenter = ChatbotPresenter::new();

        presenter.observe(Some("hello"));
        presenter.toggle();
        presenter.toggle();
        assert_eq!(presenter.state(), ChatbotState::Visible);
    }

    #[test]
    fn test_toggle_without_message_is_ignored() {
        let mut presenter = ChatbotPresenter::new();

        presenter.toggle();
        assert_eq!(presenter.state(), ChatbotState::Hidden);

        // An empty reply clears the message; dismissal stays a no-op.
        presenter.observe(Some("something"));
        presenter.observe(None);
        presenter.toggle();
        assert_eq!(presenter.state(), ChatbotState::Hidden);
    }
}
