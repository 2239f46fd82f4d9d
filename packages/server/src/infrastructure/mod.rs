//! Infrastructure layer: connection registry, broadcaster, in-memory stores
//! and HTTP DTOs.

pub mod broadcast;
pub mod dto;
pub mod repository;
