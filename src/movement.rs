pub mod attachment;
pub mod config;
pub mod controller;
pub mod motor;
pub mod pid;
pub mod spec;
