use std::{fs, marker::PhantomData, path::PathBuf};

/// Undo steps for changes made on disk.
#[derive(Debug)]
pub enum RollbackOperation {
    RemoveFile(PathBuf),
    RemoveDir(PathBuf),
}
impl RollbackOperation {
    fn undo(&self) -> std::io::Result<()> {
        match self {
            Self::RemoveFile(path) => fs::remove_file(path),
            Self::RemoveDir(path) => fs::remove_dir_all(path),
        }
    }
}
/// Transaction still collecting changes
pub struct Active;
/// Transaction whose changes are kept
pub struct Committed;
/// Decides whether registered operations are replayed on drop.
pub trait TransactionState {
    const SHOULD_ROLLBACK: bool;
}
impl TransactionState for Active {
    const SHOULD_ROLLBACK: bool = true;
}
impl TransactionState for Committed {
    const SHOULD_ROLLBACK: bool = false;
}
/// Tracks the disk changes of a single write so they can be undone.
///
/// A `Transaction<Active>` that is dropped, for example because an error was propagated with
/// `?` halfway through, replays its rollback operations in reverse order. Calling
/// [`Transaction::commit`] turns it into a `Transaction<Committed>` which leaves everything in
/// place.
///
/// # Example
///
/// ```rust
/// use pluma::transactions::{Active, RollbackOperation, Transaction};
///
/// let mut trx = Transaction::<Active>::new();
/// trx.add_operation(RollbackOperation::RemoveDir("some/new/dir".into()));
/// trx.commit(); // nothing is removed
/// ```
pub struct Transaction<State: TransactionState> {
    rollback_operations: Vec<RollbackOperation>,
    state: PhantomData<State>,
}
impl Default for Transaction<Active> {
    fn default() -> Self {
        Self::new()
    }
}
impl Transaction<Active> {
    pub fn new() -> Self {
        Transaction {
            rollback_operations: vec![],
            state: PhantomData,
        }
    }
    /// Registers a step that undoes a change made within this transaction.
    pub fn add_operation(&mut self, operation: RollbackOperation) {
        self.rollback_operations.push(operation);
    }
    /// Keeps every change. The returned transaction does nothing on drop.
    pub fn commit(mut self) -> Transaction<Committed> {
        let kept = std::mem::take(&mut self.rollback_operations).len();
        log::debug!("keeping {kept} change(s)");

        Transaction {
            rollback_operations: vec![],
            state: PhantomData,
        }
    }
}
impl<S: TransactionState> Drop for Transaction<S> {
    fn drop(&mut self) {
        if !S::SHOULD_ROLLBACK {
            return;
        }

        // newest first, files go before the directories holding them
        for operation in self.rollback_operations.drain(..).rev() {
            log::debug!("rollback: {operation:?}");

            if let Err(error) = operation.undo() {
                log::warn!("rollback step {operation:?} failed: {error}");
            }
        }
    }
}
