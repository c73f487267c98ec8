use snafu::{OptionExt, ResultExt, Snafu};
use tracing::debug;

use super::node::{Container, NodeKind, NodeRef};
use super::path::{NamespacePath, PathParseError};

/// A single line of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: NodeKind,
}

/// The whole addressable tree.
///
/// Owns the root container for its entire lifetime. Every operation is a
/// single top-down walk bounded by the depth of the path.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    root: Container,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names at `path`: the sorted children of a directory, or the file's
    /// own name when `path` is a file.
    pub fn list(&self, path: &str) -> Result<Vec<String>, NamespaceError> {
        Ok(self
            .entries(path)?
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    /// Like [`Namespace::list`], also reporting the kind of every entry.
    pub fn entries(&self, path: &str) -> Result<Vec<DirEntry>, NamespaceError> {
        let path = parse_path(path)?;
        let entries = match self.resolve(&path)? {
            NodeRef::Container(container) => container
                .entries()
                .map(|(name, node)| DirEntry {
                    name: name.to_owned(),
                    kind: node.kind(),
                })
                .collect(),
            NodeRef::Leaf(_) => vec![DirEntry {
                name: path.file_name().unwrap_or_default().to_owned(),
                kind: NodeKind::Leaf,
            }],
        };
        Ok(entries)
    }

    /// Creates every missing directory along `path`. Idempotent.
    pub fn make_container(&mut self, path: &str) -> Result<(), NamespaceError> {
        let path = parse_path(path)?;
        Self::walk_creating(&mut self.root, &path, path.segments().len())?;
        debug!("Ensured directory {}", path);
        Ok(())
    }

    /// Appends `text` to the file at `path`, creating the file and its parent
    /// directories when missing.
    pub fn append_to_file(&mut self, path: &str, text: &str) -> Result<(), NamespaceError> {
        let path = parse_path(path)?;
        let Some((name, parents)) = path.segments().split_last() else {
            return KindConflictSnafu {
                path: path.to_string(),
                expected: NodeKind::Leaf,
                found: NodeKind::Container,
            }
            .fail();
        };

        let parent = Self::walk_creating(&mut self.root, &path, parents.len())?;
        let leaf = parent
            .leaf_entry(name)
            .with_context(|| KindConflictSnafu {
                path: path.to_string(),
                expected: NodeKind::Leaf,
                found: NodeKind::Container,
            })?;
        leaf.append(text);

        debug!(
            "Appended {} bytes to {}, now {} bytes",
            text.len(),
            path,
            leaf.len()
        );
        Ok(())
    }

    /// Full content of the file at `path`
    pub fn read_file(&self, path: &str) -> Result<&str, NamespaceError> {
        let path = parse_path(path)?;
        match self.resolve(&path)? {
            NodeRef::Leaf(leaf) => Ok(leaf.content()),
            NodeRef::Container(_) => KindConflictSnafu {
                path: path.to_string(),
                expected: NodeKind::Leaf,
                found: NodeKind::Container,
            }
            .fail(),
        }
    }

    pub fn kind(&self, path: &str) -> Result<NodeKind, NamespaceError> {
        let path = parse_path(path)?;
        Ok(self.resolve(&path)?.kind())
    }

    pub fn exists(&self, path: &str) -> bool {
        self.kind(path).is_ok()
    }

    /// Read-only walk from the root. Never creates nodes.
    fn resolve(&self, path: &NamespacePath) -> Result<NodeRef<'_>, NamespaceError> {
        let mut current = NodeRef::Container(&self.root);

        for (index, segment) in path.segments().iter().enumerate() {
            let next = match current {
                NodeRef::Container(container) => container.get(segment),
                // Cannot descend into a file
                NodeRef::Leaf(_) => None,
            };
            current = next.map(NodeRef::from).with_context(|| LookupMissSnafu {
                path: path.prefix(index + 1).to_string(),
            })?;
        }

        Ok(current)
    }

    /// Descends through the first `depth` segments of `path`, creating missing
    /// directories on the way.
    ///
    /// A conflict can only be met while walking nodes that already exist: once
    /// a directory has been created, everything below it is new. A failed walk
    /// therefore leaves the tree untouched.
    fn walk_creating<'a>(
        root: &'a mut Container,
        path: &NamespacePath,
        depth: usize,
    ) -> Result<&'a mut Container, NamespaceError> {
        let mut current = root;

        for (index, segment) in path.segments()[..depth].iter().enumerate() {
            current = current
                .container_entry(segment)
                .with_context(|| KindConflictSnafu {
                    path: path.prefix(index + 1).to_string(),
                    expected: NodeKind::Container,
                    found: NodeKind::Leaf,
                })?;
        }

        Ok(current)
    }
}

fn parse_path(path: &str) -> Result<NamespacePath, NamespaceError> {
    path.parse().context(MalformedPathSnafu)
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum NamespaceError {
    #[snafu(display("Malformed path"))]
    MalformedPath { source: PathParseError },
    #[snafu(display("No such file or directory: {}", path))]
    LookupMiss { path: String },
    #[snafu(display("Expected a {} at '{}', found a {}", expected, path, found))]
    KindConflict {
        path: String,
        expected: NodeKind,
        found: NodeKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn namespace() -> Namespace {
        Namespace::new()
    }

    #[rstest]
    fn fresh_namespace_lists_empty_root(namespace: Namespace) {
        assert_eq!(namespace.list("/").unwrap(), Vec::<String>::new());
        assert_eq!(namespace.kind("/").unwrap(), NodeKind::Container);
    }

    #[rstest]
    fn hello_world_scenario(mut namespace: Namespace) {
        namespace.make_container("/a/b/c").unwrap();
        namespace.make_container("/a/b/d").unwrap();
        namespace
            .append_to_file("/a/b/c/file1.txt", "Hello ")
            .unwrap();
        namespace
            .append_to_file("/a/b/c/file1.txt", "World!")
            .unwrap();

        assert_eq!(
            namespace.read_file("/a/b/c/file1.txt").unwrap(),
            "Hello World!"
        );
        assert_eq!(namespace.list("/a/b").unwrap(), ["c", "d"]);
    }

    #[rstest]
    fn file_in_root_is_listed(mut namespace: Namespace) {
        namespace.append_to_file("/root_file.txt", "hi").unwrap();
        assert_eq!(namespace.list("/").unwrap(), ["root_file.txt"]);
    }

    #[rstest]
    fn append_creates_missing_parents(mut namespace: Namespace) {
        namespace.append_to_file("/a/b/c", "x").unwrap();

        assert_eq!(namespace.list("/a").unwrap(), ["b"]);
        assert_eq!(namespace.list("/a/b").unwrap(), ["c"]);
        assert_eq!(namespace.kind("/a/b").unwrap(), NodeKind::Container);
        assert_eq!(namespace.kind("/a/b/c").unwrap(), NodeKind::Leaf);
    }

    #[rstest]
    fn make_container_is_idempotent(mut namespace: Namespace) {
        namespace.make_container("/a/b").unwrap();
        let once = namespace.clone();
        namespace.make_container("/a/b").unwrap();

        assert_eq!(namespace.root, once.root);
    }

    #[rstest]
    fn make_container_on_root_is_noop(mut namespace: Namespace) {
        namespace.make_container("/").unwrap();
        assert!(namespace.list("/").unwrap().is_empty());
    }

    #[rstest]
    fn make_container_keeps_existing_children(mut namespace: Namespace) {
        namespace.append_to_file("/a/f.txt", "data").unwrap();
        namespace.make_container("/a").unwrap();

        assert_eq!(namespace.read_file("/a/f.txt").unwrap(), "data");
    }

    #[rstest]
    fn listing_is_sorted_regardless_of_creation_order(mut namespace: Namespace) {
        for name in ["/d/zeta", "/d/beta", "/d/alpha"] {
            namespace.make_container(name).unwrap();
        }
        namespace.append_to_file("/d/gamma", "").unwrap();

        assert_eq!(
            namespace.list("/d").unwrap(),
            ["alpha", "beta", "gamma", "zeta"]
        );
    }

    #[rstest]
    fn listing_a_file_yields_its_name(mut namespace: Namespace) {
        namespace.append_to_file("/a/b/notes.md", "content").unwrap();
        assert_eq!(namespace.list("/a/b/notes.md").unwrap(), ["notes.md"]);
    }

    #[rstest]
    fn entries_report_kinds(mut namespace: Namespace) {
        namespace.make_container("/dir").unwrap();
        namespace.append_to_file("/file", "x").unwrap();

        assert_eq!(
            namespace.entries("/").unwrap(),
            [
                DirEntry {
                    name: "dir".into(),
                    kind: NodeKind::Container
                },
                DirEntry {
                    name: "file".into(),
                    kind: NodeKind::Leaf
                },
            ]
        );
    }

    #[rstest]
    #[case(&["a"])]
    #[case(&["Hello ", "World!"])]
    #[case(&["", "x", "", "y"])]
    #[case(&["line one\n", "line two\n", "🚀 ünïcödé"])]
    fn append_accumulates_in_call_order(mut namespace: Namespace, #[case] parts: &[&str]) {
        for part in parts {
            namespace.append_to_file("/log.txt", part).unwrap();
        }
        assert_eq!(namespace.read_file("/log.txt").unwrap(), parts.concat());
    }

    #[rstest]
    fn empty_append_creates_empty_file(mut namespace: Namespace) {
        namespace.append_to_file("/empty", "").unwrap();
        assert_eq!(namespace.read_file("/empty").unwrap(), "");
        assert_eq!(namespace.list("/").unwrap(), ["empty"]);
    }

    #[rstest]
    fn read_is_idempotent(mut namespace: Namespace) {
        namespace.append_to_file("/f", "abc").unwrap();
        let first = namespace.read_file("/f").unwrap().to_owned();
        assert_eq!(namespace.read_file("/f").unwrap(), first);
    }

    #[rstest]
    fn redundant_separators_address_the_same_node(mut namespace: Namespace) {
        namespace.append_to_file("/a//b/", "x").unwrap();
        namespace.append_to_file("/a/b", "y").unwrap();

        assert_eq!(namespace.read_file("//a/b//").unwrap(), "xy");
        assert_eq!(namespace.list("/a/").unwrap(), ["b"]);
    }

    #[rstest]
    #[case("/missing")]
    #[case("/a/missing")]
    #[case("/a/b/c/d")]
    fn list_of_missing_path_is_lookup_miss(mut namespace: Namespace, #[case] path: &str) {
        namespace.make_container("/a/b").unwrap();
        assert!(matches!(
            namespace.list(path),
            Err(NamespaceError::LookupMiss { .. })
        ));
    }

    #[rstest]
    fn lookup_miss_names_first_missing_prefix(mut namespace: Namespace) {
        namespace.make_container("/a").unwrap();
        assert_eq!(
            namespace.read_file("/a/b/c"),
            Err(NamespaceError::LookupMiss {
                path: "/a/b".into()
            })
        );
    }

    #[rstest]
    fn cannot_descend_into_a_file(mut namespace: Namespace) {
        namespace.append_to_file("/f", "x").unwrap();
        assert_eq!(
            namespace.list("/f/inner"),
            Err(NamespaceError::LookupMiss {
                path: "/f/inner".into()
            })
        );
        assert!(!namespace.exists("/f/inner"));
    }

    #[rstest]
    fn reading_a_directory_is_kind_conflict(mut namespace: Namespace) {
        namespace.make_container("/dir").unwrap();
        assert_eq!(
            namespace.read_file("/dir"),
            Err(NamespaceError::KindConflict {
                path: "/dir".into(),
                expected: NodeKind::Leaf,
                found: NodeKind::Container,
            })
        );
    }

    #[rstest]
    fn reading_root_is_kind_conflict(namespace: Namespace) {
        assert!(matches!(
            namespace.read_file("/"),
            Err(NamespaceError::KindConflict { .. })
        ));
    }

    #[rstest]
    fn make_container_through_file_is_kind_conflict(mut namespace: Namespace) {
        namespace.append_to_file("/a/f", "x").unwrap();
        let before = namespace.clone();

        assert_eq!(
            namespace.make_container("/a/f/g/h"),
            Err(NamespaceError::KindConflict {
                path: "/a/f".into(),
                expected: NodeKind::Container,
                found: NodeKind::Leaf,
            })
        );
        assert_eq!(namespace.root, before.root);
    }

    #[rstest]
    fn make_container_over_file_is_kind_conflict(mut namespace: Namespace) {
        namespace.append_to_file("/f", "x").unwrap();
        assert!(matches!(
            namespace.make_container("/f"),
            Err(NamespaceError::KindConflict { .. })
        ));
        assert_eq!(namespace.read_file("/f").unwrap(), "x");
    }

    #[rstest]
    fn append_to_directory_is_kind_conflict(mut namespace: Namespace) {
        namespace.make_container("/a/dir").unwrap();
        let before = namespace.clone();

        assert_eq!(
            namespace.append_to_file("/a/dir", "x"),
            Err(NamespaceError::KindConflict {
                path: "/a/dir".into(),
                expected: NodeKind::Leaf,
                found: NodeKind::Container,
            })
        );
        assert_eq!(namespace.root, before.root);
    }

    #[rstest]
    fn append_through_file_leaves_tree_untouched(mut namespace: Namespace) {
        namespace.append_to_file("/a/f", "x").unwrap();
        let before = namespace.clone();

        assert!(matches!(
            namespace.append_to_file("/a/f/sub/g", "y"),
            Err(NamespaceError::KindConflict { .. })
        ));
        assert_eq!(namespace.root, before.root);
    }

    #[rstest]
    fn append_to_root_is_kind_conflict(mut namespace: Namespace) {
        assert!(matches!(
            namespace.append_to_file("/", "x"),
            Err(NamespaceError::KindConflict { .. })
        ));
        assert!(namespace.list("/").unwrap().is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("relative/path")]
    fn malformed_paths_are_rejected_everywhere(mut namespace: Namespace, #[case] path: &str) {
        let is_malformed = |result: Result<(), NamespaceError>| {
            matches!(result, Err(NamespaceError::MalformedPath { .. }))
        };

        assert!(is_malformed(namespace.list(path).map(drop)));
        assert!(is_malformed(namespace.read_file(path).map(drop)));
        assert!(is_malformed(namespace.make_container(path)));
        assert!(is_malformed(namespace.append_to_file(path, "x")));
        assert!(namespace.list("/").unwrap().is_empty());
    }

    #[test]
    fn error_display() {
        let miss = NamespaceError::LookupMiss {
            path: "/a/b".into(),
        };
        let conflict = NamespaceError::KindConflict {
            path: "/a/f".into(),
            expected: NodeKind::Container,
            found: NodeKind::Leaf,
        };

        assert_eq!(miss.to_string(), "No such file or directory: /a/b");
        assert_eq!(
            conflict.to_string(),
            "Expected a directory at '/a/f', found a file"
        );
    }
}
