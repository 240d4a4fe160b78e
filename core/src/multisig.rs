//! Multisig wallet owners.

mod gnosis;

pub use gnosis::{
    DefaultSafeFactory, EthAdapter, MultisigGnosisOwner, SafeFactory, SafeSession,
    adjust_recovery_byte, safe_message_hash,
};
