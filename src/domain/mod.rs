pub mod cart;
pub mod catalog;
pub mod command;
pub mod ports;
