//! Quill Core Types
//!
//! This crate provides the data model shared by the Quill analysis
//! front end and its consumers. It includes:
//!
//! - **Spans**: Byte ranges into the analyzed source ([`span::Span`])
//! - **Tokens**: Classified lexemes with line/column positions ([`token`] module)
//! - **Statistics**: Per-call token frequency counts ([`stats::TokenStatistics`])
//! - **Syntax trees**: Tagged AST nodes and the indentation printer ([`ast`] module)

pub mod ast;
pub mod span;
pub mod stats;
pub mod token;
