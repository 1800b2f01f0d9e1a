// Adapters layer: concrete implementations for external systems (SPARQL endpoint, delimited files).

pub mod sparql;
pub mod table;

pub use sparql::SparqlClient;
