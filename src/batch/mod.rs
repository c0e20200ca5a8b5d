pub mod controller;
pub mod naming;
pub mod settings;
pub mod store;
