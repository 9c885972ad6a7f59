#![forbid(unsafe_code)]
#![warn(
    clippy::cognitive_complexity,
    clippy::dbg_macro,
    clippy::debug_assert_with_mut_call,
    clippy::doc_link_with_quotes,
    clippy::doc_markdown,
    clippy::empty_line_after_outer_attr,
    clippy::empty_structs_with_brackets,
    clippy::float_cmp,
    clippy::float_cmp_const,
    clippy::float_equality_without_abs,
    keyword_idents,
    clippy::missing_const_for_fn,
    missing_copy_implementations,
    missing_debug_implementations,
    // clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::mod_module_files,
    non_ascii_idents,
    noop_method_call,
    clippy::option_if_let_else,
    clippy::print_stderr,
    clippy::print_stdout,
    clippy::semicolon_if_nothing_returned,
    clippy::unseparated_literal_suffix,
    clippy::shadow_unrelated,
    clippy::similar_names,
    clippy::suspicious_operation_groupings,
    unused_crate_dependencies,
    unused_extern_crates,
    unused_import_braces,
    clippy::unused_self,
    clippy::use_debug,
    clippy::used_underscore_binding,
    clippy::useless_let_if_seq,
    clippy::wildcard_dependencies,
    clippy::wildcard_imports
)]

//! **Wikidata MCP** exposes the [Wikidata](https://www.wikidata.org) knowledge
//! graph as a set of [Model Context Protocol](https://modelcontextprotocol.io)
//! tools: keyword and vector search, statement lookup with labels resolved,
//! instance/subclass hierarchies and SPARQL queries. Every tool answers with
//! plain text meant to be read by an agent.

pub mod config;
pub mod coordinate;
pub mod data_type;
pub mod entity;
pub mod entity_id;
pub mod entity_source;
pub mod entity_table;
pub mod error;
pub mod hierarchy;
pub mod jsonrpc;
pub mod language;
pub mod mcp_server;
pub mod prelude;
pub mod property_value;
pub mod quantity;
pub mod reference;
pub mod render;
pub mod search;
pub mod sparql;
pub mod statement;
pub mod statement_parser;
pub mod statement_rank;
pub mod statement_value;
pub mod time_value;
pub mod tools;
pub mod wikidata_api;
pub mod wikidata_api_builder;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use data_type::DataType;
pub use entity::Entity;
pub use entity_id::EntityId;
pub use entity_source::EntitySource;
pub use entity_table::{EntityRef, EntityTable};
pub use error::WikidataError;
pub use hierarchy::Hierarchy;
pub use language::Language;
pub use mcp_server::McpServer;
pub use property_value::PropertyValue;
pub use reference::Reference;
pub use statement::Statement;
pub use statement_parser::{ParseOptions, ParsedEntity, StatementParser};
pub use statement_rank::StatementRank;
pub use statement_value::StatementValue;
pub use tools::WikidataTools;
pub use wikidata_api::WikidataApi;
pub use wikidata_api_builder::WikidataApiBuilder;
