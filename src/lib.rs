//! Retenção na Fonte - Municipal Source-Withholding Engine
//!
//! This crate computes the income-tax (IRRF), municipal-service-tax (ISS)
//! and social-security (INSS) amounts a municipal accounting office must
//! withhold from supplier invoices, apportions them across budget
//! commitments, and drives batches of source documents through an
//! asynchronous extraction collaborator.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
