//! # Command Layer
//!
//! This module contains the **core logic** of volumizer. Each component lives in its
//! own submodule and is a plain function over the client traits in [`crate::cluster`].
//!
//! ## Role and Responsibilities
//!
//! - Decide what to do with each volume instance from its observed status
//! - Drive the external clients (create, mount, remove, chown)
//! - Capture every per-instance result into an [`InstanceOutcome`]
//! - Emit `tracing` events with a `volume` field for every decision
//!
//! ## What Commands Do NOT Do
//!
//! - **Shell out**: all external calls go through the client traits
//! - **Print**: no stdout or stderr; the CLI renders the returned outcomes
//! - **Abort a pass**: a failure on one instance is recorded and the pass moves on
//! - **Retry**: convergence comes from the next scheduled pass re-probing
//!
//! ## Testing Strategy
//!
//! Command tests run against [`InMemoryCluster`](crate::cluster::memory::InMemoryCluster),
//! which records every call. That makes properties like "no create after a failed mirror
//! lookup" or "a second pass issues no create or mount" directly assertable.
//!
//! ## Command Modules
//!
//! - [`probe`]: volume status prober
//! - [`resolve`]: mirror source resolver
//! - [`permissions`]: recursive ownership setter
//! - [`reconcile`]: create/mount state machine
//! - [`sweep`]: retention sweeper
//! - [`plan`]: side-effect free listing of what a pass would visit

use crate::model::VolumeInstance;
use serde::Serialize;

pub mod permissions;
pub mod plan;
pub mod probe;
pub mod reconcile;
pub mod resolve;
pub mod sweep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What happened to one instance during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Created,
    Mounted,
    /// Already mounted, nothing to do
    Verified,
    Removed,
    /// Not present, nothing to sweep
    Absent,
    /// Status unknown or an external call failed; skipped for this pass
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceOutcome {
    pub instance: VolumeInstance,
    pub action: Action,
    pub messages: Vec<CmdMessage>,
}

impl InstanceOutcome {
    pub fn new(instance: VolumeInstance, action: Action) -> Self {
        Self {
            instance,
            action,
            messages: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| matches!(m.level, MessageLevel::Warning | MessageLevel::Error))
    }
}

/// Outcomes of one reconciliation and retention pass.
#[derive(Debug, Default, Clone, Serialize)]
pub struct PassReport {
    pub reconciled: Vec<InstanceOutcome>,
    pub swept: Vec<InstanceOutcome>,
}

impl PassReport {
    pub fn count(&self, action: Action) -> usize {
        self.outcomes().filter(|o| o.action == action).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &InstanceOutcome> {
        self.outcomes().filter(|o| o.action == Action::Failed)
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &InstanceOutcome> {
        self.reconciled.iter().chain(self.swept.iter())
    }

    pub fn is_clean(&self) -> bool {
        self.outcomes().all(|o| !o.has_warnings())
    }
}
