use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use flowdeck_engine::{ConfirmationPrompt, ConfirmationRequest};
use tracing::warn;

/// Asks on the terminal and reads the answer from stdin. Anything but an
/// explicit `y`/`yes` declines.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl ConfirmationPrompt for StdinPrompt {
    async fn confirm(&self, request: &ConfirmationRequest) -> bool {
        let question = format!("{}\n{} [y/N] ", request.title, request.message);
        let answer = tokio::task::spawn_blocking(move || -> io::Result<String> {
            let mut stderr = io::stderr();
            stderr.write_all(question.as_bytes())?;
            stderr.flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => is_affirmative(&line),
            Ok(Err(error)) => {
                warn!(error = %error, "failed to read confirmation");
                false
            }
            Err(error) => {
                warn!(error = %error, "confirmation prompt task failed");
                false
            }
        }
    }
}
