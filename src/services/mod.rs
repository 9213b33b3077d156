pub mod credentials;
pub mod settlement;
