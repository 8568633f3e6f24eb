// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability for resolving the running tool's source revision.

use async_trait::async_trait;

/// Resolves the build identity (e.g. a commit hash) of the running tool.
///
/// Resolution is best-effort: `None` means "unknown" and must never fail a run.
#[async_trait]
pub trait BuildIdentity: Send + Sync {
    async fn resolve(&self) -> Option<String>;
}

/// A build identity fixed at construction time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedBuildIdentity(pub Option<String>);

#[async_trait]
impl BuildIdentity for FixedBuildIdentity {
    async fn resolve(&self) -> Option<String> {
        self.0.clone()
    }
}
