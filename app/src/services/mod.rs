pub mod generation;
pub mod logo;
pub mod session;
