use wand_store::StoreError;

/// Errors from the run service.
///
/// Graph and node failures are not errors here; they are recorded on the
/// run. Only bookkeeping failures surface.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
  #[error("run store error: {0}")]
  Store(#[from] StoreError),
}
