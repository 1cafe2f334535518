//! # BrandHouse
//!
//! A brand asset generation and valuation service.
//!
//! This library provides:
//! - An HTTP API for submitting, monitoring, and retrying brand tasks
//! - An LLM-backed pipeline that turns free-text brand descriptions into a
//!   structured asset tree
//! - A deterministic scoring engine combining Kantar BrandZ-style valuation
//!   with a 55-metric brand consistency grid
//!
//! ## Task Flow
//! 1. Receive a generation or evaluation task via the API
//! 2. Run the pipeline stages, streaming progress over SSE
//! 3. Checkpoint stage outputs so failed tasks resume instead of restarting
//! 4. Persist the final asset or valuation report
//!
//! ## Modules
//! - `pipeline`: task orchestration, progress streaming, retry/resume
//! - `generator` / `analyzer`: the LLM-facing pipeline stages
//! - `scoring`: the pure valuation and consistency arithmetic
//! - `store`: durable task records

pub mod analyzer;
pub mod api;
pub mod brand;
pub mod config;
pub mod generator;
pub mod llm;
pub mod pipeline;
pub mod scoring;
pub mod store;
pub mod tools;
