pub mod rest;
pub mod state;
