pub mod identity;
pub mod public_id;

pub use identity::CurrentIdentity;
