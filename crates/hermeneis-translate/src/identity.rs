// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation parameter identity: which tool, at which revision, with which
//! model and configuration produced a translation.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use hermeneis_core::{
    BuildIdentity, HermeneisError, NewParameterIdentity, ParameterIdentity, StorageAdapter,
};
use tokio::process::Command;
use tracing::{debug, info, instrument};

use crate::fingerprint::ConfigSnapshot;

/// Name recorded as the producing tool of every translation.
pub const TOOL_NAME: &str = "hermeneis";

/// Resolves the tool revision with `git rev-parse HEAD`.
///
/// Any failure (git missing, not a checkout, non-zero exit) resolves to `None`.
#[derive(Debug, Clone, Default)]
pub struct GitRevision {
    dir: Option<PathBuf>,
}

impl GitRevision {
    /// Resolve in the current working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve in `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }
}

#[async_trait]
impl BuildIdentity for GitRevision {
    async fn resolve(&self) -> Option<String> {
        let mut cmd = Command::new("git");
        cmd.args(["rev-parse", "HEAD"]);
        cmd.kill_on_drop(true);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) => {
                debug!(error = %e, "git not available, tool revision unknown");
                return None;
            }
        };
        if !output.status.success() {
            debug!(status = %output.status, "git rev-parse failed, tool revision unknown");
            return None;
        }
        let revision = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!revision.is_empty()).then_some(revision)
    }
}

/// Build the identity tuple for a run from an already resolved revision.
pub fn parameter_tuple(
    tool_commit: Option<String>,
    model: &str,
    snapshot: &ConfigSnapshot,
) -> NewParameterIdentity {
    NewParameterIdentity {
        tool_name: TOOL_NAME.to_string(),
        tool_commit,
        model: model.to_string(),
        config_sha256: snapshot.sha256.clone(),
        config_text: snapshot.text.clone(),
    }
}

/// Registers parameter identities in the store.
pub struct ParameterRegistry {
    storage: Arc<dyn StorageAdapter>,
    build: Arc<dyn BuildIdentity>,
}

impl ParameterRegistry {
    pub fn new(storage: Arc<dyn StorageAdapter>, build: Arc<dyn BuildIdentity>) -> Self {
        Self { storage, build }
    }

    /// Resolve the tool revision and return the identity for this run,
    /// creating it on first sight.
    #[instrument(skip(self, snapshot), fields(config_sha256 = %snapshot.sha256))]
    pub async fn get_or_create(
        &self,
        model: &str,
        snapshot: &ConfigSnapshot,
    ) -> Result<ParameterIdentity, HermeneisError> {
        let tool_commit = self.build.resolve().await;
        let tuple = parameter_tuple(tool_commit, model, snapshot);
        if tuple.tool_commit.is_none() {
            debug!("registering parameters without a tool revision");
        }
        let identity = self.storage.get_or_create_parameters(&tuple).await?;
        info!(
            parameters_id = %identity.id,
            tool_commit = identity.tool_commit.as_deref().unwrap_or("unknown"),
            "translation parameters registered"
        );
        Ok(identity)
    }
}
