//! Type aliases for external crates types that conflict with our own types or are too verbose.

// -----------------------------------------------------------------------------
// REVM
// -----------------------------------------------------------------------------
pub type RevmAccount = revm::primitives::Account;
pub type RevmAccountInfo = revm::primitives::AccountInfo;
pub type RevmAddress = revm::primitives::Address;
pub type RevmB256 = revm::primitives::B256;
pub type RevmBytecode = revm::primitives::Bytecode;
pub type RevmBytes = revm::primitives::Bytes;
pub type RevmExecutionResult = revm::primitives::ExecutionResult;
pub type RevmOutput = revm::primitives::Output;
pub type RevmState = revm::primitives::State;
pub type RevmU256 = revm::primitives::U256;
