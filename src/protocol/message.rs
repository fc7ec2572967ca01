use crate::error::{EditorError, Result};
use crate::identity::ElementId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Commands the parent frame sends to the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum InboundMessage {
    /// Reset selections and leave selection mode
    Ready,
    /// Reset selections and enter selection mode
    ToolElementSelection,
    /// Remove every selection, keeping the current mode
    ClearSelection,
    /// Remove a single selection
    RemoveSelection { element: ElementId },
    /// Recreate selections from previously reported ids
    RebuildSelection { ids: Vec<ElementId> },
}

impl InboundMessage {
    /// Parse a raw message leniently.
    ///
    /// `rebuild-selection` without a usable id list becomes an empty rebuild
    /// and non-string ids are dropped. Unknown types and `remove-selection`
    /// without an element are errors.
    pub fn parse(data: &Value) -> Result<Self> {
        let kind = data
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| EditorError::InvalidMessage("missing message type".to_string()))?;
        let payload = data.get("payload");

        match kind {
            "ready" => Ok(InboundMessage::Ready),
            "tool-element-selection" => Ok(InboundMessage::ToolElementSelection),
            "clear-selection" => Ok(InboundMessage::ClearSelection),
            "remove-selection" => payload
                .and_then(|p| p.get("element"))
                .and_then(Value::as_str)
                .filter(|element| !element.is_empty())
                .map(|element| InboundMessage::RemoveSelection {
                    element: ElementId::from(element),
                })
                .ok_or_else(|| EditorError::InvalidMessage("remove-selection without element".to_string())),
            "rebuild-selection" => {
                let ids: Vec<ElementId> = payload
                    .and_then(|p| p.get("ids"))
                    .and_then(Value::as_array)
                    .map(|ids| ids.iter().filter_map(Value::as_str).map(ElementId::from).collect())
                    .unwrap_or_default();
                Ok(InboundMessage::RebuildSelection { ids })
            }
            other => Err(EditorError::InvalidMessage(format!("unknown message type: {}", other))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InboundMessage::Ready => "ready",
            InboundMessage::ToolElementSelection => "tool-element-selection",
            InboundMessage::ClearSelection => "clear-selection",
            InboundMessage::RemoveSelection { .. } => "remove-selection",
            InboundMessage::RebuildSelection { .. } => "rebuild-selection",
        }
    }
}

/// A raw inbound delivery: sender origin plus the untrusted message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEnvelope {
    pub origin: String,
    pub data: Value,
}

impl InboundEnvelope {
    pub fn new(origin: impl Into<String>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

/// A selected element as reported to the parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectedElement {
    pub id: ElementId,

    /// Lower-case tag name; only sent with `element-selection`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,

    pub dom_tree_string: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ElementSelectionPayload {
    /// The complete selection after this click
    pub selected_elements: Vec<SelectedElement>,
    pub selected_element_ids: Vec<ElementId>,
    /// Id of the clicked element
    pub element_id: ElementId,
    /// Canonical serialization of the clicked element
    pub element_tree: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRebuiltPayload {
    pub selected_elements: Vec<SelectedElement>,
    pub selected_element_ids: Vec<ElementId>,
}

/// Notifications the editor sends to the parent frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum OutboundMessage {
    /// Echo of an accepted inbound message
    Ack { message: Value },
    Status { status: String },
    ElementSelection(ElementSelectionPayload),
    SelectionRebuilt(SelectionRebuiltPayload),
    Error { msg: String },
}

impl OutboundMessage {
    pub fn ack(message: Value) -> Self {
        OutboundMessage::Ack { message }
    }

    pub fn status(status: impl Into<String>) -> Self {
        OutboundMessage::Status { status: status.into() }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        OutboundMessage::Error { msg: msg.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OutboundMessage::Ack { .. } => "ack",
            OutboundMessage::Status { .. } => "status",
            OutboundMessage::ElementSelection(_) => "element-selection",
            OutboundMessage::SelectionRebuilt(_) => "selection-rebuilt",
            OutboundMessage::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(InboundMessage::parse(&json!({"type": "ready"})).unwrap(), InboundMessage::Ready);
        assert_eq!(
            InboundMessage::parse(&json!({"type": "tool-element-selection", "payload": null})).unwrap(),
            InboundMessage::ToolElementSelection
        );
        assert_eq!(
            InboundMessage::parse(&json!({"type": "clear-selection"})).unwrap(),
            InboundMessage::ClearSelection
        );
    }

    #[test]
    fn test_parse_remove_selection() {
        let msg = InboundMessage::parse(&json!({"type": "remove-selection", "payload": {"element": "id-00abcd"}}))
            .unwrap();
        assert_eq!(
            msg,
            InboundMessage::RemoveSelection {
                element: ElementId::from("id-00abcd")
            }
        );

        assert!(InboundMessage::parse(&json!({"type": "remove-selection"})).is_err());
        assert!(InboundMessage::parse(&json!({"type": "remove-selection", "payload": {"element": ""}})).is_err());
    }

    #[test]
    fn test_parse_rebuild_is_permissive() {
        let parse_ids = |value: Value| match InboundMessage::parse(&value).unwrap() {
            InboundMessage::RebuildSelection { ids } => ids,
            other => panic!("unexpected message {:?}", other),
        };

        assert_eq!(
            parse_ids(json!({"type": "rebuild-selection", "payload": {"ids": ["id-a", 7, null, "id-b"]}})),
            vec![ElementId::from("id-a"), ElementId::from("id-b")]
        );
        assert!(parse_ids(json!({"type": "rebuild-selection", "payload": {"ids": "id-a"}})).is_empty());
        assert!(parse_ids(json!({"type": "rebuild-selection"})).is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(InboundMessage::parse(&json!(null)).is_err());
        assert!(InboundMessage::parse(&json!("ready")).is_err());
        assert!(InboundMessage::parse(&json!({"type": 3})).is_err());
        assert!(InboundMessage::parse(&json!({"type": "navigate"})).is_err());
    }

    #[test]
    fn test_inbound_wire_shape() {
        assert_eq!(serde_json::to_value(InboundMessage::Ready).unwrap(), json!({"type": "ready"}));
        let rebuild = InboundMessage::RebuildSelection {
            ids: vec![ElementId::from("id-a")],
        };
        assert_eq!(
            serde_json::to_value(&rebuild).unwrap(),
            json!({"type": "rebuild-selection", "payload": {"ids": ["id-a"]}})
        );
    }

    #[test]
    fn test_outbound_wire_shape() {
        let msg = OutboundMessage::ElementSelection(ElementSelectionPayload {
            selected_elements: vec![SelectedElement {
                id: ElementId::from("id-a"),
                tag_name: Some("li".to_string()),
                dom_tree_string: "<li></li>".to_string(),
            }],
            selected_element_ids: vec![ElementId::from("id-a")],
            element_id: ElementId::from("id-a"),
            element_tree: "<li></li>".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "type": "element-selection",
                "payload": {
                    "selectedElements": [{"id": "id-a", "tagName": "li", "domTreeString": "<li></li>"}],
                    "selectedElementIds": ["id-a"],
                    "elementId": "id-a",
                    "elementTree": "<li></li>"
                }
            })
        );
        assert_eq!(
            serde_json::to_value(OutboundMessage::status("ready")).unwrap(),
            json!({"type": "status", "payload": {"status": "ready"}})
        );
        assert_eq!(
            serde_json::to_value(OutboundMessage::error("nope")).unwrap(),
            json!({"type": "error", "payload": {"msg": "nope"}})
        );
    }

    #[test]
    fn test_rebuilt_entries_omit_tag_name() {
        let msg = OutboundMessage::SelectionRebuilt(SelectionRebuiltPayload {
            selected_elements: vec![SelectedElement {
                id: ElementId::from("id-b"),
                tag_name: None,
                dom_tree_string: "<p></p>".to_string(),
            }],
            selected_element_ids: vec![ElementId::from("id-b")],
        });
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["payload"]["selectedElements"][0], json!({"id": "id-b", "domTreeString": "<p></p>"}));

        let back: OutboundMessage = serde_json::from_value(value).unwrap();
        assert_eq!(back, msg);
    }
}
