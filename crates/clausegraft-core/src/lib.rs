pub mod node;
pub mod ops;
pub mod schema;

pub use node::{AnType, ClauseNode, ClauseType};
pub use ops::EditOp;
pub use schema::{clause_batch, clause_table_schema};
