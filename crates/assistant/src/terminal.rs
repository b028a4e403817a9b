//! Line-oriented terminal dialogs over stdin/stdout.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::dialog::Dialogs;

pub struct TerminalDialogs {
    input: Mutex<Lines<BufReader<Stdin>>>,
}

impl Default for TerminalDialogs {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalDialogs {
    pub fn new() -> Self {
        Self {
            input: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Print `prompt` and read one line. `None` on end of input.
    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        let mut stdout = tokio::io::stdout();
        if let Err(err) = async {
            stdout.write_all(prompt.as_bytes()).await?;
            stdout.flush().await
        }
        .await
        {
            tracing::warn!(error = %err, "writing prompt failed");
        }

        let mut input = self.input.lock().await;
        match input.next_line().await {
            Ok(line) => line.map(|l| l.trim().to_string()),
            Err(err) => {
                tracing::warn!(error = %err, "reading stdin failed");
                None
            }
        }
    }

    /// Like [`TerminalDialogs::read_line`], but a blank answer keeps `current`.
    pub async fn read_with_default(&self, label: &str, current: &str) -> Option<String> {
        let answer = self.read_line(&format!("{label} [{current}]: ")).await?;
        Some(if answer.is_empty() {
            current.to_string()
        } else {
            answer
        })
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl Dialogs for TerminalDialogs {
    async fn confirm(&self, message: &str) -> bool {
        self.read_line(&format!("{message} [y/N] "))
            .await
            .is_some_and(|answer| is_yes(&answer))
    }

    async fn prompt(&self, message: &str) -> Option<String> {
        self.read_line(&format!("{message} ")).await
    }
}
