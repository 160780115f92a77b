//! Permission prompt abstraction.
//!
//! The prompt is only ever invoked after the user has seen an explicit
//! "Enable" affordance; it never fires automatically.

use crate::models::Permission;

/// Asks the user to decide on notification permission.
#[async_trait::async_trait]
pub trait PermissionPrompt: Send + Sync {
    /// Return the user's decision. `Permission::Default` means the prompt
    /// was dismissed without a decision.
    async fn request(&self) -> Permission;
}

/// Mock prompt returning a fixed decision.
#[derive(Debug, Clone, Copy)]
pub struct MockPrompt {
    pub decision: Permission,
}

impl MockPrompt {
    pub fn granting() -> Self {
        Self {
            decision: Permission::Granted,
        }
    }

    pub fn denying() -> Self {
        Self {
            decision: Permission::Denied,
        }
    }

    pub fn dismissing() -> Self {
        Self {
            decision: Permission::Default,
        }
    }
}

#[async_trait::async_trait]
impl PermissionPrompt for MockPrompt {
    async fn request(&self) -> Permission {
        self.decision
    }
}
