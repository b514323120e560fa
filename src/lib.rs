pub mod changes;
pub mod config;
pub mod error_utils;
pub mod json_ast;
pub mod locator;
pub mod registry;
pub mod report;
pub mod validation;
