// src/models/mod.rs

pub mod notification;
pub mod question;
pub mod quiz_attempt;
pub mod quiz_session;
