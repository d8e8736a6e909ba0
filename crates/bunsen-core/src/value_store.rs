//! Persistent, path-addressable storage for form values.
//!
//! A [`ValueStore`] is an immutable JSON tree. Containers sit behind `Arc`s and
//! updates copy only the nodes on the addressed path, so an updated store shares
//! every untouched subtree with the store it came from.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use bunsen_model::{BunsenId, Segment};

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf(Value),
    Array(Arc<Vec<Node>>),
    Object(Arc<BTreeMap<String, Node>>),
}

impl Node {
    fn from_json(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                Node::Array(Arc::new(items.into_iter().map(Node::from_json).collect()))
            }
            Value::Object(map) => Node::Object(Arc::new(
                map.into_iter()
                    .map(|(key, value)| (key, Node::from_json(value)))
                    .collect(),
            )),
            leaf => Node::Leaf(leaf),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Node::Leaf(value) => value.clone(),
            Node::Array(items) => Value::Array(items.iter().map(Node::to_json).collect()),
            Node::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, node)| (key.clone(), node.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    fn empty_object() -> Self {
        Node::Object(Arc::new(BTreeMap::new()))
    }

    fn child(&self, segment: Segment<'_>) -> Option<&Node> {
        match (self, segment) {
            (Node::Array(items), Segment::Index(index)) => items.get(index),
            (Node::Object(map), segment) => map.get(&segment.as_key()),
            _ => None,
        }
    }

    fn is_empty_container(&self) -> bool {
        match self {
            Node::Leaf(_) => false,
            Node::Array(items) => items.is_empty(),
            Node::Object(map) => map.is_empty(),
        }
    }

    /// Make `self` a container that `segment` can address, keeping existing
    /// children where possible.
    ///
    /// An index is only addressable in an array when it is at most one past
    /// the end. Any other index turns the container into an object so that no
    /// padding entries are created.
    fn coerce_for(&mut self, segment: Segment<'_>) {
        let replacement = match (&*self, segment) {
            (Node::Leaf(_), Segment::Index(0)) => Some(Node::Array(Arc::new(Vec::new()))),
            (Node::Leaf(_), _) => Some(Node::empty_object()),
            (Node::Array(items), Segment::Index(index)) if index <= items.len() => None,
            (Node::Array(items), _) => Some(Node::Object(Arc::new(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, node)| (index.to_string(), node.clone()))
                    .collect(),
            ))),
            (Node::Object(_), _) => None,
        };
        if let Some(node) = replacement {
            *self = node;
        }
    }
}

fn set_in(node: &mut Node, segments: &[Segment<'_>], value: Node) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };
    node.coerce_for(*head);
    match (node, *head) {
        (Node::Array(items), Segment::Index(index)) => {
            let items = Arc::make_mut(items);
            if index == items.len() {
                items.push(Node::Leaf(Value::Null));
            }
            if let Some(child) = items.get_mut(index) {
                set_in(child, rest, value);
            }
        }
        (Node::Object(map), segment) => {
            let child = Arc::make_mut(map)
                .entry(segment.as_key())
                .or_insert(Node::Leaf(Value::Null));
            set_in(child, rest, value);
        }
        // `coerce_for` leaves no other shape.
        _ => {}
    }
}

/// Remove the entry at `segments`, then drop every container the removal
/// left empty.
fn remove_in(node: &mut Node, segments: &[Segment<'_>]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    match (node, *head) {
        (Node::Array(items), Segment::Index(index)) if index < items.len() => {
            let items = Arc::make_mut(items);
            if !rest.is_empty() {
                remove_in(&mut items[index], rest);
            }
            if rest.is_empty() || items[index].is_empty_container() {
                items.remove(index);
            }
        }
        (Node::Object(map), segment) => {
            let key = segment.as_key();
            if !map.contains_key(&key) {
                return;
            }
            let map = Arc::make_mut(map);
            let emptied = match map.get_mut(&key) {
                Some(child) if !rest.is_empty() => {
                    remove_in(child, rest);
                    child.is_empty_container()
                }
                _ => true,
            };
            if emptied {
                map.remove(&key);
            }
        }
        _ => {}
    }
}

/// Immutable form value keyed by bunsenId.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueStore {
    root: Node,
}

impl Default for ValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueStore {
    /// An empty object.
    pub fn new() -> Self {
        Self {
            root: Node::empty_object(),
        }
    }

    /// Build a store from a plain JSON value. `null` yields an empty store.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::new(),
            value => Self {
                root: Node::from_json(value),
            },
        }
    }

    pub fn to_json(&self) -> Value {
        self.root.to_json()
    }

    pub fn is_empty(&self) -> bool {
        match &self.root {
            Node::Leaf(value) => value.is_null(),
            Node::Array(items) => items.is_empty(),
            Node::Object(map) => map.is_empty(),
        }
    }

    fn node_at(&self, id: &BunsenId) -> Option<&Node> {
        id.segments()
            .try_fold(&self.root, |node, segment| node.child(segment))
    }

    /// Snapshot of the value at `id`.
    pub fn get(&self, id: &BunsenId) -> Option<Value> {
        self.node_at(id).map(Node::to_json)
    }

    pub fn contains(&self, id: &BunsenId) -> bool {
        self.node_at(id).is_some()
    }

    /// A new store with `value` at `id`. Missing containers along the way are
    /// created: an array when the next segment is `0`, an object otherwise.
    /// Arrays never grow by more than one item; an index further out addresses
    /// an object key instead.
    #[must_use]
    pub fn set(&self, id: &BunsenId, value: Value) -> ValueStore {
        let segments: Vec<Segment<'_>> = id.segments().collect();
        let mut root = self.root.clone();
        set_in(&mut root, &segments, Node::from_json(value));
        Self { root }
    }

    /// A new store without the entry at `id`. Array items are spliced out and
    /// containers emptied by the removal are dropped from their parents.
    #[must_use]
    pub fn without(&self, id: &BunsenId) -> ValueStore {
        if !self.contains(id) {
            return self.clone();
        }
        let segments: Vec<Segment<'_>> = id.segments().collect();
        let mut root = self.root.clone();
        remove_in(&mut root, &segments);
        Self { root }
    }

    /// Whether the containers at `id` in both stores are the same allocation.
    pub fn shares_subtree(&self, other: &ValueStore, id: &BunsenId) -> bool {
        match (self.node_at(id), other.node_at(id)) {
            (Some(Node::Object(left)), Some(Node::Object(right))) => Arc::ptr_eq(left, right),
            (Some(Node::Array(left)), Some(Node::Array(right))) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl From<Value> for ValueStore {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

impl Serialize for ValueStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValueStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_json)
    }
}
