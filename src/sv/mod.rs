pub mod account;
pub mod referral;
pub mod storage;
#[cfg(test)]
pub mod test_utils;

pub use account::Account;
pub use referral::Referral;
pub use storage::Storage;
