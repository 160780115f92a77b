//! Terminal permission prompt.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use domain::models::Permission;
use domain::services::PermissionPrompt;

/// Prompt that reads the user's decision from the terminal.
///
/// An explicit `y` grants, an explicit `n` denies; anything else counts as
/// dismissing the banner and leaves the decision open.
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        Self
    }

    fn decision_from_line(line: &str) -> Permission {
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Permission::Granted,
            "n" | "no" => Permission::Denied,
            _ => Permission::Default,
        }
    }
}

#[async_trait::async_trait]
impl PermissionPrompt for ConsolePrompt {
    async fn request(&self) -> Permission {
        println!("Enable notifications? Get real-time alerts when someone is at your door. [y/n]");

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        match reader.read_line(&mut line).await {
            Ok(_) => Self::decision_from_line(&line),
            Err(e) => {
                warn!(error = %e, "Could not read permission decision");
                Permission::Default
            }
        }
    }
}
