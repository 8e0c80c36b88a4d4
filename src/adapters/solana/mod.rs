pub mod rpc;
pub mod wallet;
pub mod parsed_account;
pub mod log_stream;

pub use rpc::SolanaClient;
pub use wallet::{OperatorWallet, WalletError};
pub use parsed_account::TokenAccountReader;
pub use log_stream::{LogStreamConfig, LogStreamSubscriber};
