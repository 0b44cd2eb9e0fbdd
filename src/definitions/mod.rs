//! Device type definitions: YAML parsing and the built-in definition list.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::Value;

use crate::importer::DefinitionError;
use crate::models::DeviceTypeDefinition;

/// Definitions ready for import plus the blocks that could not be parsed
#[derive(Debug, Clone, Default)]
pub struct DefinitionSet {
    pub definitions: Vec<DeviceTypeDefinition>,
    pub rejected: Vec<DefinitionError>,
}

impl DefinitionSet {
    fn push_value(&mut self, index: usize, value: Value) {
        match serde_yaml::from_value::<DeviceTypeDefinition>(value) {
            Ok(def) => self.definitions.push(def),
            Err(e) => self.reject(index, e),
        }
    }

    fn reject(&mut self, index: usize, err: impl std::fmt::Display) {
        let err = DefinitionError::Unparseable {
            index,
            message: err.to_string(),
        };
        tracing::error!("{}", err);
        self.rejected.push(err);
    }
}

/// Parse standalone YAML blocks, one device type definition per block
pub fn parse_blocks<S: AsRef<str>>(blocks: &[S]) -> DefinitionSet {
    let mut set = DefinitionSet::default();
    for (index, block) in blocks.iter().enumerate() {
        match serde_yaml::from_str::<Value>(block.as_ref()) {
            Ok(value @ Value::Mapping(_)) => set.push_value(index, value),
            Ok(_) => set.reject(index, "expected a mapping"),
            Err(e) => set.reject(index, e),
        }
    }
    set
}

/// Parse a YAML document stream. Each `---` document holds either one
/// definition or a list of definitions; empty documents are ignored.
pub fn parse_document(text: &str) -> DefinitionSet {
    let mut set = DefinitionSet::default();
    let mut index = 0;

    for document in serde_yaml::Deserializer::from_str(text) {
        match Value::deserialize(document) {
            Ok(Value::Null) => {}
            Ok(Value::Sequence(items)) => {
                for item in items {
                    set.push_value(index, item);
                    index += 1;
                }
            }
            Ok(value @ Value::Mapping(_)) => {
                set.push_value(index, value);
                index += 1;
            }
            Ok(_) => {
                set.reject(index, "expected a mapping or a list of mappings");
                index += 1;
            }
            Err(e) => {
                // The document stream cannot resume after a syntax error.
                set.reject(index, e);
                tracing::warn!("Skipping the rest of the definition stream after document {}", index);
                break;
            }
        }
    }
    set
}

/// Load definitions from a YAML file
pub async fn load(path: &str) -> Result<DefinitionSet> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read definitions file {}", path))?;
    let set = parse_document(&text);
    tracing::info!(
        "Loaded {} device type definitions from {} ({} rejected)",
        set.definitions.len(),
        path,
        set.rejected.len()
    );
    Ok(set)
}

/// Load from `path`, or fall back to the built-in list when it is empty
pub async fn load_or_builtin(path: &str) -> Result<DefinitionSet> {
    if path.is_empty() {
        Ok(builtin())
    } else {
        load(path).await
    }
}

const BUILTIN_BLOCKS: &[&str] = &[
    r#"
manufacturer: Arista
model: DCS-7280CR2-60
part_number: DCS-7280CR2-60
u_height: 1
is_full_depth: true
comments: '[Arista 7280R Data Sheet](https://www.arista.com/assets/data/pdf/Datasheets/7280R-DataSheet.pdf)'
interfaces:
  - pattern: "Ethernet[1-60]/[1-4]"
    type: 100gbase-x-qsfp28
  - pattern: "Management1"
    type: 1000base-t
    mgmt_only: true
"#,
    r#"
manufacturer: Arista
model: DCS-7150S-24
part_number: DCS-7150S-24
u_height: 1
is_full_depth: true
comments: '[Arista 7150 Data Sheet](https://www.arista.com/assets/data/pdf/Datasheets/7150S_Datasheet.pdf)'
interfaces:
  - pattern: "Ethernet[1-24]"
    type: 10gbase-x-sfpp
  - pattern: "Management1"
    type: 1000base-t
    mgmt_only: true
"#,
    r#"
manufacturer: Cisco
model: Nexus N9K-C9236C
part_number: N9K-C9236C
u_height: 1
is_full_depth: true
interfaces:
  - pattern: "Ethernet1/[1-48]"
    type: 100gbase-x-qsfp28
  - pattern: "mgmt0"
    type: 1000base-t
    mgmt_only: true
"#,
];

/// Built-in device type definitions
pub fn builtin() -> DefinitionSet {
    parse_blocks(BUILTIN_BLOCKS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_definitions_parse() {
        let set = builtin();
        assert!(set.rejected.is_empty());
        assert_eq!(set.definitions.len(), 3);

        let cisco = &set.definitions[2];
        assert_eq!(cisco.manufacturer, "Cisco");
        assert_eq!(cisco.model, "Nexus N9K-C9236C");
        assert_eq!(cisco.part_number.as_deref(), Some("N9K-C9236C"));
        assert_eq!(cisco.comments, None);
        assert_eq!(cisco.interfaces.len(), 2);
        assert_eq!(cisco.interfaces[0].iface_type, "100gbase-x-qsfp28");
        assert!(!cisco.interfaces[0].mgmt_only);
        assert!(cisco.interfaces[1].mgmt_only);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let set = parse_blocks(&["model: DCS-7150S-24\ninterfaces:\n  - pattern: Ethernet1\n"]);
        assert!(set.rejected.is_empty());
        let def = &set.definitions[0];
        assert_eq!(def.manufacturer, "");
        assert_eq!(def.interfaces[0].iface_type, "");
        assert_eq!(def.defaults().u_height, 1);
        assert!(def.defaults().is_full_depth);
    }

    #[test]
    fn test_unparseable_block_rejected_others_kept() {
        let blocks = [
            "manufacturer: Arista\nmodel: A\n",
            "manufacturer: [unclosed\n",
            "- just\n- a list\n",
            "manufacturer: Arista\nmodel: B\nu_height: tall\n",
            "manufacturer: Cisco\nmodel: C\n",
        ];
        let set = parse_blocks(&blocks);

        let models: Vec<&str> = set.definitions.iter().map(|d| d.model.as_str()).collect();
        assert_eq!(models, vec!["A", "C"]);
        assert_eq!(set.rejected.len(), 3);
        assert!(matches!(set.rejected[0], DefinitionError::Unparseable { index: 1, .. }));
        assert!(matches!(set.rejected[1], DefinitionError::Unparseable { index: 2, .. }));
        assert!(matches!(set.rejected[2], DefinitionError::Unparseable { index: 3, .. }));
    }

    #[test]
    fn test_parse_document_stream() {
        let text = r#"
manufacturer: Arista
model: DCS-7150S-24
interfaces:
  - pattern: "Ethernet[1-24]"
    type: 10gbase-x-sfpp
---
- manufacturer: Cisco
  model: Nexus N9K-C9236C
- manufacturer: Cisco
  model: Nexus N9K-C93180YC-EX
---
"#;
        let set = parse_document(text);
        assert!(set.rejected.is_empty());
        let models: Vec<&str> = set.definitions.iter().map(|d| d.model.as_str()).collect();
        assert_eq!(models, vec!["DCS-7150S-24", "Nexus N9K-C9236C", "Nexus N9K-C93180YC-EX"]);
    }

    #[test]
    fn test_parse_document_rejects_scalar_document() {
        let set = parse_document("manufacturer: Arista\nmodel: A\n---\njust a string\n");
        assert_eq!(set.definitions.len(), 1);
        assert_eq!(set.rejected.len(), 1);
    }

    #[test]
    fn test_parse_document_stops_at_syntax_error() {
        let text = "manufacturer: Arista\nmodel: X\n---\nmanufacturer: [unclosed\n---\nmanufacturer: Cisco\nmodel: Y\n";
        let set = parse_document(text);

        let models: Vec<&str> = set.definitions.iter().map(|d| d.model.as_str()).collect();
        assert_eq!(models, vec!["X"]);
        assert_eq!(set.rejected.len(), 1);
        assert!(matches!(set.rejected[0], DefinitionError::Unparseable { index: 1, .. }));
    }

    #[test]
    fn test_empty_values_read_as_missing() {
        let set = parse_blocks(&[
            "manufacturer: Arista\nmodel: X\ninterfaces:\n  - pattern: Ethernet1\n    type:\n  - pattern: Management1\n    type: 1000base-t\n    mgmt_only:\n",
            "manufacturer:\nmodel: Y\ninterfaces:\n",
        ]);
        assert!(set.rejected.is_empty());
        assert_eq!(set.definitions.len(), 2);

        let arista = &set.definitions[0];
        assert_eq!(arista.interfaces.len(), 2);
        assert_eq!(arista.interfaces[0].iface_type, "");
        assert_eq!(arista.interfaces[1].iface_type, "1000base-t");
        assert!(!arista.interfaces[1].mgmt_only);

        assert_eq!(set.definitions[1].manufacturer, "");
        assert!(set.definitions[1].interfaces.is_empty());
    }

    #[tokio::test]
    async fn test_load_or_builtin_without_path() {
        let set = load_or_builtin("").await.unwrap();
        assert_eq!(set.definitions.len(), 3);
        assert!(load("/nonexistent/definitions.yaml").await.is_err());
    }
}
