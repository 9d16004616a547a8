//! Input synthesis for a node from its upstream outputs.
//!
//! Rules, applied per incoming edge in edge-list order:
//! - edge with a `mapping`: copy only the mapped fields, renamed; a mapped
//!   field absent from the producer's output is skipped.
//! - edge without a `mapping`, producer output is an object: shallow-merge all
//!   fields; later edges win on key collisions.
//! - edge without a `mapping`, producer output is anything else (scalar,
//!   array, `null`): store it verbatim under the producer's node id.
//!
//! The last rule is an implicit contract: a consumer of a non-object producer
//! has to know to look for the producer's id in its own input.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use nodes::ResultStore;

use crate::models::Edge;

/// Build the input object for `node_id` from the outputs of its `incoming`
/// edges. A node with no incoming edges gets an empty object.
pub fn merge_inputs<'a, I>(node_id: &str, incoming: I, results: &ResultStore) -> Value
where
    I: IntoIterator<Item = &'a Edge>,
{
    let mut input = Map::new();

    for edge in incoming {
        let Some(output) = results.get(&edge.from) else {
            // Unreachable when the executor orders nodes topologically.
            warn!("node '{}' has no recorded output for edge into '{}'", edge.from, node_id);
            continue;
        };

        match (&edge.mapping, output) {
            (Some(mapping), Value::Object(fields)) => {
                for (source, target) in mapping {
                    match fields.get(source) {
                        Some(value) => {
                            input.insert(target.clone(), value.clone());
                        }
                        None => debug!(
                            "mapped field '{}' missing from '{}' output, skipped",
                            source, edge.from
                        ),
                    }
                }
            }
            (Some(_), _) => debug!(
                "mapping on edge '{}' -> '{}' ignored: upstream output is not an object",
                edge.from, node_id
            ),
            (None, Value::Object(fields)) => {
                for (key, value) in fields {
                    input.insert(key.clone(), value.clone());
                }
            }
            (None, other) => {
                debug!(
                    "upstream '{}' output is not an object, keyed by its node id",
                    edge.from
                );
                input.insert(edge.from.clone(), other.clone());
            }
        }
    }

    Value::Object(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn results(entries: &[(&str, Value)]) -> ResultStore {
        let mut store = ResultStore::new();
        for (id, value) in entries {
            store.insert(*id, value.clone());
        }
        store
    }

    #[test]
    fn no_incoming_edges_gives_empty_object() {
        let input = merge_inputs("src", std::iter::empty::<&Edge>(), &ResultStore::new());
        assert_eq!(input, json!({}));
    }

    #[test]
    fn unmapped_object_outputs_merge_with_later_edges_winning() {
        let store = results(&[
            ("a", json!({ "price": 10, "currency": "EUR" })),
            ("b", json!({ "price": 12, "fees": 3 })),
        ]);
        let edges = [Edge::new("a", "c"), Edge::new("b", "c")];

        let input = merge_inputs("c", &edges, &store);
        assert_eq!(input, json!({ "price": 12, "currency": "EUR", "fees": 3 }));
    }

    #[test]
    fn mapping_copies_and_renames_only_listed_fields() {
        let store = results(&[("a", json!({ "value": 10, "noise": true }))]);
        let edges = [Edge::mapped("a", "s", [("value", "a")])];

        let input = merge_inputs("s", &edges, &store);
        assert_eq!(input, json!({ "a": 10 }));
    }

    #[test]
    fn mapped_field_missing_upstream_is_skipped() {
        let store = results(&[("a", json!({ "value": 1 }))]);
        let edges = [Edge::mapped("a", "s", [("value", "x"), ("absent", "y")])];

        assert_eq!(merge_inputs("s", &edges, &store), json!({ "x": 1 }));
    }

    #[test]
    fn non_object_output_is_keyed_by_producer_id() {
        let store = results(&[
            ("score", json!(0.75)),
            ("tags", json!(["sale", "fee"])),
            ("nothing", Value::Null),
        ]);
        let edges = [
            Edge::new("score", "report"),
            Edge::new("tags", "report"),
            Edge::new("nothing", "report"),
        ];

        let input = merge_inputs("report", &edges, &store);
        assert_eq!(
            input,
            json!({ "score": 0.75, "tags": ["sale", "fee"], "nothing": null })
        );
    }

    #[test]
    fn mapping_on_non_object_output_copies_nothing() {
        let store = results(&[("score", json!(3))]);
        let edges = [Edge::mapped("score", "r", [("value", "v")])];

        assert_eq!(merge_inputs("r", &edges, &store), json!({}));
    }
}
