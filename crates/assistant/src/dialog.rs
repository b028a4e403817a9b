//! User decisions (confirmations and free-text prompts) as async calls.
//!
//! Operations that need a decision take a [`Dialogs`] so they can run
//! against a terminal, scripted answers from command-line flags, or tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

#[async_trait]
pub trait Dialogs: Send + Sync {
    /// Ask a yes/no question. `false` means the user declined.
    async fn confirm(&self, message: &str) -> bool;

    /// Ask for free text. `None` means the user cancelled.
    async fn prompt(&self, message: &str) -> Option<String>;
}

/// Answers queued up front, consumed in order.
///
/// An exhausted queue declines every confirmation and cancels every prompt.
#[derive(Debug, Default)]
pub struct ScriptedDialogs {
    confirms: Mutex<VecDeque<bool>>,
    answers: Mutex<VecDeque<Option<String>>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirming(self, answer: bool) -> Self {
        lock(&self.confirms).push_back(answer);
        self
    }

    pub fn answering(self, answer: Option<&str>) -> Self {
        lock(&self.answers).push_back(answer.map(str::to_string));
        self
    }

    /// Every message shown so far, confirmations and prompts interleaved.
    pub fn asked(&self) -> Vec<String> {
        lock(&self.asked).clone()
    }
}

#[async_trait]
impl Dialogs for ScriptedDialogs {
    async fn confirm(&self, message: &str) -> bool {
        lock(&self.asked).push(message.to_string());
        lock(&self.confirms).pop_front().unwrap_or(false)
    }

    async fn prompt(&self, message: &str) -> Option<String> {
        lock(&self.asked).push(message.to_string());
        lock(&self.answers).pop_front().flatten()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_answers_are_consumed_in_order() {
        let dialogs = ScriptedDialogs::new()
            .confirming(true)
            .answering(Some("2"))
            .answering(None);

        assert!(dialogs.confirm("Delete milk?").await);
        assert!(!dialogs.confirm("Delete bread?").await);
        assert_eq!(dialogs.prompt("How much?").await.as_deref(), Some("2"));
        assert_eq!(dialogs.prompt("How much?").await, None);
        assert_eq!(dialogs.prompt("How much?").await, None);
        assert_eq!(dialogs.asked().len(), 5);
        assert_eq!(dialogs.asked()[0], "Delete milk?");
    }
}
