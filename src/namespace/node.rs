use std::collections::BTreeMap;

use derive_more::{Display, From};

/// Kind of a namespace node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeKind {
    #[display("directory")]
    Container,
    #[display("file")]
    Leaf,
}

/// A node owned by its parent container.
///
/// The node's name is the key it is stored under in the parent, so a node
/// never needs to know its own name.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub(crate) enum Node {
    Container(Container),
    Leaf(Leaf),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Container(_) => NodeKind::Container,
            Node::Leaf(_) => NodeKind::Leaf,
        }
    }
}

/// Interior node. Children are kept sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Container {
    children: BTreeMap<String, Node>,
}

impl Container {
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Immediate children in lexicographic order of their names
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children
            .iter()
            .map(|(name, node)| (name.as_str(), node))
    }

    /// Returns the child container `name`, creating it when absent.
    /// `None` when the child exists as a leaf.
    pub(super) fn container_entry(&mut self, name: &str) -> Option<&mut Container> {
        let node = self
            .children
            .entry(name.to_owned())
            .or_insert_with(|| Container::default().into());
        match node {
            Node::Container(container) => Some(container),
            Node::Leaf(_) => None,
        }
    }

    /// Returns the child leaf `name`, creating an empty one when absent.
    /// `None` when the child exists as a container.
    pub(super) fn leaf_entry(&mut self, name: &str) -> Option<&mut Leaf> {
        let node = self
            .children
            .entry(name.to_owned())
            .or_insert_with(|| Leaf::default().into());
        match node {
            Node::Leaf(leaf) => Some(leaf),
            Node::Container(_) => None,
        }
    }
}

/// Terminal node holding append-only content
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Leaf {
    content: String,
}

impl Leaf {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub(super) fn append(&mut self, text: &str) {
        self.content.push_str(text);
    }
}

/// Borrowed view of a resolved node. The root is a bare [`Container`] rather
/// than a [`Node`], so resolution hands out this instead of `&Node`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeRef<'a> {
    Container(&'a Container),
    Leaf(&'a Leaf),
}

impl NodeRef<'_> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Container(_) => NodeKind::Container,
            NodeRef::Leaf(_) => NodeKind::Leaf,
        }
    }
}

impl<'a> From<&'a Node> for NodeRef<'a> {
    fn from(node: &'a Node) -> Self {
        match node {
            Node::Container(container) => NodeRef::Container(container),
            Node::Leaf(leaf) => NodeRef::Leaf(leaf),
        }
    }
}
