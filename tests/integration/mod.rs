//! Integration tests for the xibe bridge

mod catalog_resolution;
mod dispatch_flow;
mod settings_lifecycle;
mod support;
