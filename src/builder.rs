//! The mutable tree assembled during parsing.
//!
//! Builder nodes live in an index-based arena so the parser can keep a
//! handle on the current table across statements while any ancestor is
//! still being extended. Objects and arrays carry the `defined`/`closed`
//! flags that drive redefinition and sealing checks; none of that survives
//! into the finished [`Value`] tree.

#[cfg(test)]
#[path = "./builder_tests.rs"]
mod tests;

use crate::value::{Object, Value};

pub(crate) type NodeId = u32;

/// Objects with more than this many entries use a hash index for lookups.
const INDEXED_TABLE_THRESHOLD: usize = 6;

pub(crate) enum BuilderNode {
    Object(ObjectBuilder),
    Array(ArrayBuilder),
    Scalar(Value),
}

#[derive(Default)]
pub(crate) struct ObjectBuilder {
    entries: Vec<(String, NodeId)>,
    /// Built in bulk when the object crosses the threshold, then maintained
    /// incrementally.
    index: Option<foldhash::HashMap<String, usize>>,
    /// No further mutation permitted through any path. Set for inline
    /// tables.
    pub(crate) closed: bool,
    /// Explicitly introduced by a table header or traversed by a dotted
    /// assignment; a second `[header]` for a defined table is an error.
    pub(crate) defined: bool,
}

impl ObjectBuilder {
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn find(&self, key: &str) -> Option<NodeId> {
        if let Some(index) = &self.index {
            index.get(key).map(|&i| self.entries[i].1)
        } else {
            self.entries
                .iter()
                .find(|(name, _)| name == key)
                .map(|&(_, id)| id)
        }
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Appends an entry. Does **not** check for duplicates; the parser
    /// does that first.
    pub(crate) fn insert(&mut self, key: String, node: NodeId) {
        let position = self.entries.len();
        if let Some(index) = &mut self.index {
            index.insert(key.clone(), position);
        } else if position == INDEXED_TABLE_THRESHOLD {
            let mut index: foldhash::HashMap<String, usize> = self
                .entries
                .iter()
                .enumerate()
                .map(|(i, (name, _))| (name.clone(), i))
                .collect();
            index.insert(key.clone(), position);
            self.index = Some(index);
        }
        self.entries.push((key, node));
    }
}

pub(crate) struct ArrayBuilder {
    pub(crate) items: Vec<NodeId>,
    /// Set once an inline `[…]` literal finishes. Arrays built from
    /// `[[header]]` entries stay open so later headers can append.
    pub(crate) closed: bool,
}

/// Arena of builder nodes for one document.
pub(crate) struct DocumentBuilder {
    nodes: Vec<BuilderNode>,
}

impl DocumentBuilder {
    pub(crate) fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn alloc(&mut self, node: BuilderNode) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    pub(crate) fn new_object(&mut self) -> NodeId {
        self.alloc(BuilderNode::Object(ObjectBuilder::default()))
    }

    pub(crate) fn new_array(&mut self) -> NodeId {
        self.alloc(BuilderNode::Array(ArrayBuilder {
            items: Vec::new(),
            closed: false,
        }))
    }

    pub(crate) fn new_scalar(&mut self, value: Value) -> NodeId {
        self.alloc(BuilderNode::Scalar(value))
    }

    pub(crate) fn node(&self, id: NodeId) -> &BuilderNode {
        &self.nodes[id as usize]
    }

    pub(crate) fn object(&self, id: NodeId) -> &ObjectBuilder {
        match &self.nodes[id as usize] {
            BuilderNode::Object(object) => object,
            _ => unreachable!("node {id} is not an object"),
        }
    }

    pub(crate) fn object_mut(&mut self, id: NodeId) -> &mut ObjectBuilder {
        match &mut self.nodes[id as usize] {
            BuilderNode::Object(object) => object,
            _ => unreachable!("node {id} is not an object"),
        }
    }

    pub(crate) fn array(&self, id: NodeId) -> &ArrayBuilder {
        match &self.nodes[id as usize] {
            BuilderNode::Array(array) => array,
            _ => unreachable!("node {id} is not an array"),
        }
    }

    pub(crate) fn array_mut(&mut self, id: NodeId) -> &mut ArrayBuilder {
        match &mut self.nodes[id as usize] {
            BuilderNode::Array(array) => array,
            _ => unreachable!("node {id} is not an array"),
        }
    }

    /// Creates an empty object child under `parent`.
    pub(crate) fn put_object(&mut self, parent: NodeId, key: String) -> NodeId {
        let child = self.new_object();
        self.object_mut(parent).insert(key, child);
        child
    }

    /// Creates an empty (open) array child under `parent`.
    pub(crate) fn put_array(&mut self, parent: NodeId, key: String) -> NodeId {
        let child = self.new_array();
        self.object_mut(parent).insert(key, child);
        child
    }

    /// Appends a fresh object element to an array-of-tables.
    pub(crate) fn push_object(&mut self, array: NodeId) -> NodeId {
        let child = self.new_object();
        self.array_mut(array).items.push(child);
        child
    }

    /// Consumes the arena, materializing the immutable tree under `root`.
    pub(crate) fn finalize(mut self, root: NodeId) -> Value {
        self.build(root)
    }

    fn build(&mut self, id: NodeId) -> Value {
        let node = std::mem::replace(
            &mut self.nodes[id as usize],
            BuilderNode::Scalar(Value::Boolean(false)),
        );
        match node {
            BuilderNode::Scalar(value) => value,
            BuilderNode::Object(object) => {
                let mut out = Object::with_capacity(object.entries.len());
                for (key, child) in object.entries {
                    let value = self.build(child);
                    out.insert(key, value);
                }
                Value::Object(out)
            }
            BuilderNode::Array(array) => {
                let mut out = Vec::with_capacity(array.items.len());
                for child in array.items {
                    out.push(self.build(child));
                }
                Value::Array(out)
            }
        }
    }
}
