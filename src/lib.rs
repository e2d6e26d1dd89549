//! Forecourt - WhatsApp sales assistant for a vehicle dealership.
//!
//! This crate implements a menu-driven conversation flow over a
//! webhook-based messaging provider: browse the vehicle stock by price or
//! body type, view details with photos, and hand off to a human seller.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
