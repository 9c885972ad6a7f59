// Traits
pub use crate::entity_source::EntitySource;

// Structs and enums
pub use crate::config::Config;
pub use crate::entity_id::EntityId;
pub use crate::entity_table::{EntityRef, EntityTable};
pub use crate::error::WikidataError;
pub use crate::hierarchy::Hierarchy;
pub use crate::language::Language;
pub use crate::mcp_server::McpServer;
pub use crate::search::{Search, SearchLimit, SearchType, VectorSearch};
pub use crate::sparql::SparqlResult;
pub use crate::statement::Statement;
pub use crate::statement_parser::{ParseOptions, StatementParser};
pub use crate::statement_value::StatementValue;
pub use crate::tools::WikidataTools;
pub use crate::wikidata_api::WikidataApi;
