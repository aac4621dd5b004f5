// src/handlers/mod.rs

pub mod notifications;
pub mod quiz;
pub mod staff;
