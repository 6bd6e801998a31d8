use std::fmt;
use std::ops::Index;

use docvault_model::DocumentId;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::SanityError;

pub const LOG_TARGET: &str = "docvault::sanity";
pub const NO_ISSUES_MESSAGE: &str = "Sanity checker detected no issues.";

/// Severity of a sanity check finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    /// Benign observation.
    Info,
    /// Anomaly that does not corrupt any document.
    Warning,
    /// A stored artifact can no longer be trusted.
    Error,
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MessageLevel::Info => "info",
            MessageLevel::Warning => "warning",
            MessageLevel::Error => "error",
        })
    }
}

/// One finding, optionally attributed to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanityMessage {
    pub level: MessageLevel,
    pub document: Option<DocumentId>,
    pub message: String,
}

/// How a finished run should be reported to whoever scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanityOutcome {
    Clean,
    Infos,
    Warnings,
}

impl SanityOutcome {
    pub fn summary(&self) -> &'static str {
        match self {
            SanityOutcome::Clean => "No issues detected.",
            SanityOutcome::Infos => "Sanity check exited with infos. See log.",
            SanityOutcome::Warnings => "Sanity check exited with warnings. See log.",
        }
    }
}

pub const CHECKS_FAILED_MESSAGE: &str = "Sanity check failed with errors. See log.";

/// Ordered log of findings produced by one sanity check run.
///
/// Insertion order is kept: findings for one document are appended
/// together, and callers index into the log positionally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SanityCheckMessages {
    messages: Vec<SanityMessage>,
}

impl SanityCheckMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        level: MessageLevel,
        document: impl Into<Option<DocumentId>>,
        message: impl Into<String>,
    ) {
        self.messages.push(SanityMessage {
            level,
            document: document.into(),
            message: message.into(),
        });
    }

    pub fn info(&mut self, document: impl Into<Option<DocumentId>>, message: impl Into<String>) {
        self.push(MessageLevel::Info, document, message);
    }

    pub fn warning(
        &mut self,
        document: impl Into<Option<DocumentId>>,
        message: impl Into<String>,
    ) {
        self.push(MessageLevel::Warning, document, message);
    }

    pub fn error(&mut self, document: impl Into<Option<DocumentId>>, message: impl Into<String>) {
        self.push(MessageLevel::Error, document, message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SanityMessage> {
        self.messages.iter()
    }

    pub fn get(&self, index: usize) -> Option<&SanityMessage> {
        self.messages.get(index)
    }

    pub fn count(&self, level: MessageLevel) -> usize {
        self.messages.iter().filter(|m| m.level == level).count()
    }

    pub fn has_error(&self) -> bool {
        self.messages.iter().any(|m| m.level == MessageLevel::Error)
    }

    pub fn has_warning(&self) -> bool {
        self.messages.iter().any(|m| m.level == MessageLevel::Warning)
    }

    pub fn highest_level(&self) -> Option<MessageLevel> {
        self.messages.iter().map(|m| m.level).max()
    }

    pub fn for_document(&self, document: DocumentId) -> impl Iterator<Item = &SanityMessage> {
        self.messages
            .iter()
            .filter(move |m| m.document == Some(document))
    }

    /// Append every message of `other`, keeping its order.
    pub fn extend(&mut self, other: SanityCheckMessages) {
        self.messages.extend(other.messages);
    }

    /// Emit every finding through `tracing` at its own level, or a single
    /// info event when there is nothing to report.
    pub fn log_messages(&self) {
        if self.messages.is_empty() {
            info!(target: LOG_TARGET, "{}", NO_ISSUES_MESSAGE);
            return;
        }

        for msg in &self.messages {
            let document = msg.document.map(|id| id.get());
            match msg.level {
                MessageLevel::Info => info!(target: LOG_TARGET, document, "{}", msg.message),
                MessageLevel::Warning => warn!(target: LOG_TARGET, document, "{}", msg.message),
                MessageLevel::Error => error!(target: LOG_TARGET, document, "{}", msg.message),
            }
        }
    }

    /// Map the findings onto a run result: any error fails the run,
    /// otherwise the worst level decides the summary.
    pub fn conclude(&self) -> Result<SanityOutcome, SanityError> {
        match self.highest_level() {
            Some(MessageLevel::Error) => {
                Err(SanityError::ChecksFailed(CHECKS_FAILED_MESSAGE.to_string()))
            }
            Some(MessageLevel::Warning) => Ok(SanityOutcome::Warnings),
            Some(MessageLevel::Info) => Ok(SanityOutcome::Infos),
            None => Ok(SanityOutcome::Clean),
        }
    }
}

impl Index<usize> for SanityCheckMessages {
    type Output = SanityMessage;

    fn index(&self, index: usize) -> &Self::Output {
        &self.messages[index]
    }
}

impl<'a> IntoIterator for &'a SanityCheckMessages {
    type Item = &'a SanityMessage;
    type IntoIter = std::slice::Iter<'a, SanityMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl IntoIterator for SanityCheckMessages {
    type Item = SanityMessage;
    type IntoIter = std::vec::IntoIter<SanityMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}
