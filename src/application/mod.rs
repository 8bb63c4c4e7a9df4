//! Application layer orchestrating the pure cart logic over the ports.
//!
//! This module defines the `CartService`, the entry point for every cart
//! operation. It follows a strict load / pure-transform / save protocol so
//! the domain logic stays testable without any storage attached.

pub mod service;
