//! Directory use-case services.
//!
//! # Responsibility
//! - Orchestrate normalization, import and persistence into use-case APIs.
//! - Keep front ends (CLI, UI bindings) decoupled from storage details.

pub mod directory_service;
pub mod drafts;
