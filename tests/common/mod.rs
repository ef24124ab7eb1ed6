//! Shared helpers for integration tests

pub mod fixtures;
pub mod mock_pages;
pub mod mock_service;
