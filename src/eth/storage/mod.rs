mod inmemory;
mod ledger_storage;
mod state_view;
mod storage_error;

pub use inmemory::InMemoryLedgerStorage;
pub use ledger_storage::LedgerStorage;
pub use state_view::StateView;
pub use state_view::StateWrite;
pub use storage_error::StorageError;
