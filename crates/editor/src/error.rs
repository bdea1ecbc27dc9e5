use thiserror::Error;

use crate::host::HostError;

/// Errors surfaced by loop snippet commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoopSnippetError {
	/// The host rejected an insertion. The session has already been torn down.
	#[error("loop snippet insertion failed: {0}")]
	Insert(#[from] HostError),
}
