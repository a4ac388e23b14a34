pub mod account;
pub mod referral_code;
pub mod referral_event;

pub use account::AccountTier;
pub use referral_event::ReferralSource;
