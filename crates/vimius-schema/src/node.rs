use crate::manifest::ManifestError;

/// Format-independent parsed document.
///
/// Every supported serialization is lowered into this tree before the
/// manifest is validated, so shape checks happen in one place and never
/// depend on the parser that produced the input. Mapping entries keep the
/// order in which they appeared in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Null,
    Scalar(String),
    Sequence(Vec<Node>),
    Mapping(Vec<(String, Node)>),
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Scalar(_) => "scalar",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key in a mapping node. Returns `None` for non-mappings.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn from_yaml(value: serde_yaml_ng::Value) -> Result<Self, ManifestError> {
        use serde_yaml_ng::Value;

        Ok(match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Scalar(b.to_string()),
            Value::Number(n) => Node::Scalar(n.to_string()),
            Value::String(s) => Node::Scalar(s),
            Value::Sequence(items) => Node::Sequence(
                items
                    .into_iter()
                    .map(Node::from_yaml)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Mapping(mapping) => {
                let mut entries = Vec::with_capacity(mapping.len());
                for (key, value) in mapping {
                    let key = match Node::from_yaml(key)? {
                        Node::Scalar(s) => s,
                        other => {
                            return Err(ManifestError::InvalidShape(format!(
                                "mapping keys must be scalars, found {}",
                                other.kind()
                            )))
                        }
                    };
                    entries.push((key, Node::from_yaml(value)?));
                }
                Node::Mapping(entries)
            }
            Value::Tagged(tagged) => Node::from_yaml(tagged.value)?,
        })
    }

    pub fn from_toml(value: toml::Value) -> Self {
        use toml::Value;

        match value {
            Value::String(s) => Node::Scalar(s),
            Value::Integer(i) => Node::Scalar(i.to_string()),
            Value::Float(f) => Node::Scalar(f.to_string()),
            Value::Boolean(b) => Node::Scalar(b.to_string()),
            Value::Datetime(dt) => Node::Scalar(dt.to_string()),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from_toml).collect()),
            Value::Table(table) => Node::from_toml_table(table),
        }
    }

    pub fn from_toml_table(table: toml::Table) -> Self {
        Node::Mapping(
            table
                .into_iter()
                .map(|(k, v)| (k, Node::from_toml(v)))
                .collect(),
        )
    }
}
