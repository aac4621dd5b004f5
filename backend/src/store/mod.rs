// src/store/mod.rs

pub mod kv;
pub mod notifications;
