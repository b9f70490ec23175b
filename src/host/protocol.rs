//! Messages exchanged with the host editor
//!
//! Every message is a JSON object `{"cmd": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::state::data::RawImageRecord;

/// Response to `GetAllImages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    #[serde(alias = "imgs")]
    pub images: Vec<RawImageRecord>,
    #[serde(alias = "projectPath")]
    pub project_root: String,
}

/// Pushed by the host at arbitrary times
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "data")]
pub enum HostEvent {
    /// The user is now looking at this absolute path
    RevealFocus { path: String },
}

impl HostEvent {
    pub fn parse(line: &str) -> Result<Self, HostError> {
        Ok(serde_json::from_str(line.trim())?)
    }
}

/// Sent to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "data")]
pub enum HostCommand {
    GetAllImages,
    /// Reveal a catalog directory in the native file browser. No response.
    OpenContainingFolder { path: String },
}

impl HostCommand {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reveal_focus() {
        let event = HostEvent::parse(r#"{"cmd":"RevealFocus","data":{"path":"/p/a.png"}}"#).unwrap();
        assert_eq!(
            event,
            HostEvent::RevealFocus {
                path: "/p/a.png".into()
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        assert!(matches!(
            HostEvent::parse(r#"{"cmd":"Nope","data":{}}"#),
            Err(HostError::Malformed(_))
        ));
        assert!(HostEvent::parse("not json").is_err());
    }

    #[test]
    fn test_command_wire_shape() {
        assert_eq!(HostCommand::GetAllImages.to_json().unwrap(), r#"{"cmd":"GetAllImages"}"#);
        let open = HostCommand::OpenContainingFolder { path: "/src/".into() };
        assert_eq!(
            open.to_json().unwrap(),
            r#"{"cmd":"OpenContainingFolder","data":{"path":"/src/"}}"#
        );
    }

    #[test]
    fn test_catalog_response_field_names() {
        let json = r#"{"imgs":[{"path":"/a.png","size":7,"vscodePath":"x"}],"projectPath":"/root"}"#;
        let response: CatalogResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.project_root, "/root");
        assert_eq!(response.images[0].size, 7);

        let json = r#"{"images":[],"projectRoot":"/r"}"#;
        let response: CatalogResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.project_root, "/r");
    }
}
