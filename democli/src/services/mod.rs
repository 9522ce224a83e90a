pub mod breakdown;
pub mod projects;
pub mod session;
