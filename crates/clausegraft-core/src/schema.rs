//! Arrow schema for flattened clause trees.
//!
//! One row per non-root node in document order. This is the row shape
//! handed to a similarity index or written out as Arrow IPC.

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::node::ClauseNode;

/// Schema for flattened clause rows.
pub fn clause_table_schema() -> Schema {
    Schema::new(vec![
        Field::new("node_id", DataType::Utf8, false),
        Field::new("parent_id", DataType::Utf8, false),
        Field::new("depth", DataType::UInt32, false),
        Field::new("position", DataType::UInt32, false),
        Field::new("an_type", DataType::Utf8, false),
        Field::new("an_num", DataType::Utf8, true),
        Field::new("clause_type", DataType::Utf8, true),
        Field::new("structural_id", DataType::Utf8, true),
        Field::new("text", DataType::Utf8, false),
    ])
}

struct Row<'a> {
    node: &'a ClauseNode,
    parent_id: &'a str,
    depth: u32,
}

/// Flatten every non-root node of `tree` into a single RecordBatch.
pub fn clause_batch(tree: &ClauseNode) -> Result<RecordBatch, ArrowError> {
    let mut rows = Vec::new();
    collect_rows(tree, 0, &mut rows);
    let count = row_count(rows.len())?;

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.node.id.as_str()))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.parent_id))),
        Arc::new(UInt32Array::from_iter_values(rows.iter().map(|r| r.depth))),
        Arc::new(UInt32Array::from_iter_values(0..count)),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.node.an_type.as_str()),
        )),
        Arc::new(StringArray::from(
            rows.iter()
                .map(|r| r.node.an_num.as_deref())
                .collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            rows.iter()
                .map(|r| r.node.clause_type.map(|c| c.as_str()))
                .collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            rows.iter()
                .map(|r| r.node.original_structural_id.as_deref())
                .collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.node.text_content.as_str()),
        )),
    ];

    tracing::debug!(rows = rows.len(), "flattened clause tree");
    RecordBatch::try_new(Arc::new(clause_table_schema()), columns)
}

/// Row count as the `position` column's type.
fn row_count(len: usize) -> Result<u32, ArrowError> {
    u32::try_from(len).map_err(|_| {
        ArrowError::InvalidArgumentError(format!(
            "clause tree has {len} rows, more than a UInt32 position column holds"
        ))
    })
}

fn collect_rows<'a>(node: &'a ClauseNode, depth: u32, rows: &mut Vec<Row<'a>>) {
    for child in &node.children {
        rows.push(Row {
            node: child,
            parent_id: &node.id,
            depth: depth + 1,
        });
        collect_rows(child, depth + 1, rows);
    }
}
