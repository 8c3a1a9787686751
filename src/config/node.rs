//! Parsed configuration tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source position of a [`Node`], as reported by the configuration parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One configuration entry: a directive name, its positional arguments
/// and the contents of its nested block, if any.
///
/// Nodes are produced by an external parser and never modified by the
/// binding engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a nameless block node, as used for the root of a file.
    pub fn block(children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let node = Node::new("tls")
            .with_args(["cert.pem", "key.pem"])
            .with_location(Location::new("maddy.conf", 12));

        assert_eq!(node.name, "tls");
        assert_eq!(node.args, vec!["cert.pem", "key.pem"]);
        assert!(node.children.is_empty());
        assert_eq!(node.location.unwrap().to_string(), "maddy.conf:12");
    }

    #[test]
    fn test_deserialize_tree() {
        let node: Node = toml::from_str(
            r#"
            name = "smtp"
            args = ["tcp://0.0.0.0:25"]

            [[children]]
            name = "hostname"
            args = ["mx.example.org"]

            [[children]]
            name = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0].args, vec!["mx.example.org"]);
        assert!(node.children[1].args.is_empty());
        assert!(node.location.is_none());
    }
}
