//! Campus shuttle arrival and journey planning server.
//!
//! Computes next-bus arrival predictions and multi-route journey plans for a
//! campus shuttle network from its static weekly schedule, and renders the
//! results as widget JSON for the content-management front end.

pub mod cache;
pub mod domain;
pub mod planner;
pub mod schedule;
pub mod source;
pub mod web;
