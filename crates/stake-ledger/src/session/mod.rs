/*
[INPUT]:  Wallet providers and connect/disconnect requests
[OUTPUT]: Session state, connect attempts and authorization checks
[POS]:    Session layer - gates every ledger mutation
[UPDATE]: When adding wallet types or changing the session lifecycle
*/

pub mod gate;
pub mod wallet;

pub use gate::{ConnectAttempt, Session, SessionGate};
pub use wallet::{DEFAULT_WALLET_ADDRESS, SimulatedWallet, WalletProvider, short_address};
