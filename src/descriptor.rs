//! Endpoint descriptors as produced by the source-analysis front-end.
//!
//! The front-end writes one JSON *descriptor document* per run. Several
//! documents can be concatenated; endpoints and appendices keep file order.

use crate::error::DescriptorError;
use crate::message::{Header, QueryParam};
use crate::table::ParameterCell;
use serde::Deserialize;

/// One descriptor document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiSource {
    pub title: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub readme: Option<String>,
    pub endpoints: Vec<EndpointDescriptor>,
    pub appendices: Vec<AppendixDescriptor>,
}

impl ApiSource {
    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }

    /// Append another document. Metadata already set here wins.
    pub fn merge(&mut self, other: ApiSource) {
        self.title = self.title.take().or(other.title);
        self.description = self.description.take().or(other.description);
        self.version = self.version.take().or(other.version);
        self.readme = self.readme.take().or(other.readme);
        self.endpoints.extend(other.endpoints);
        self.appendices.extend(other.appendices);
    }
}

/// Raw facts about one discovered endpoint.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointDescriptor {
    pub name: String,
    pub description: Option<String>,
    /// Protocol version; `HTTP/1.1` when absent.
    pub version: Option<String>,
    pub controller: Option<ControllerInfo>,
    pub tags: Vec<String>,
    pub request: RequestDescriptor,
    pub response: Option<ResponseDescriptor>,
}

/// The source unit an endpoint was declared in.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ControllerInfo {
    pub name: String,
    pub id: Option<String>,
    pub description: Option<String>,
    pub package: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RequestDescriptor {
    pub method: Option<String>,
    pub uris: Vec<String>,
    pub query: Vec<QueryParam>,
    pub headers: Vec<Header>,
    pub body: Option<String>,
    pub cells: Vec<ParameterCell>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ResponseDescriptor {
    pub status: Option<u16>,
    pub headers: Vec<Header>,
    pub body: Option<String>,
    pub cells: Vec<ParameterCell>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppendixDescriptor {
    pub name: String,
    pub cells: Vec<ParameterCell>,
}

impl EndpointDescriptor {
    /// Check the facts the tree needs and return the normalized method.
    pub fn validate(&self) -> Result<http::Method, DescriptorError> {
        let raw = self
            .request
            .method
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or(DescriptorError::MissingMethod)?;
        let method = http::Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
            .map_err(|_| DescriptorError::InvalidMethod(raw.to_string()))?;
        if self.request.uris.iter().all(|u| u.trim().is_empty()) {
            return Err(DescriptorError::NoUris);
        }
        Ok(method)
    }

    /// Name used in diagnostics; falls back to the first URI.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        self.request
            .uris
            .first()
            .map(String::as_str)
            .unwrap_or("<unnamed>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(method: Option<&str>, uris: &[&str]) -> EndpointDescriptor {
        EndpointDescriptor {
            name: "list".to_string(),
            request: RequestDescriptor {
                method: method.map(str::to_string),
                uris: uris.iter().map(|u| u.to_string()).collect(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn validate_normalizes_method() {
        let method = endpoint(Some("get"), &["/users"]).validate().unwrap();
        assert_eq!(method, http::Method::GET);
    }

    #[test]
    fn validate_missing_method() {
        assert_eq!(
            endpoint(None, &["/users"]).validate(),
            Err(DescriptorError::MissingMethod)
        );
        assert_eq!(
            endpoint(Some("  "), &["/users"]).validate(),
            Err(DescriptorError::MissingMethod)
        );
    }

    #[test]
    fn validate_invalid_method() {
        assert_eq!(
            endpoint(Some("GE T"), &["/users"]).validate(),
            Err(DescriptorError::InvalidMethod("GE T".to_string()))
        );
    }

    #[test]
    fn validate_requires_uri() {
        assert_eq!(
            endpoint(Some("GET"), &[]).validate(),
            Err(DescriptorError::NoUris)
        );
        assert_eq!(
            endpoint(Some("GET"), &[""]).validate(),
            Err(DescriptorError::NoUris)
        );
    }

    #[test]
    fn parse_minimal_document() {
        let src = ApiSource::from_json(
            r#"{"endpoints":[{"name":"ping","request":{"method":"GET","uris":["/ping"]}}]}"#,
        )
        .unwrap();
        assert_eq!(src.endpoints.len(), 1);
        assert!(src.endpoints[0].response.is_none());
        assert!(src.appendices.is_empty());
    }

    #[test]
    fn parse_cells_with_renamed_fields() {
        let src = ApiSource::from_json(
            r#"{"appendices":[{"name":"Codes","cells":[{"name":"E1","type":"int","default":"0"}]}]}"#,
        )
        .unwrap();
        let cell = &src.appendices[0].cells[0];
        assert_eq!(cell.type_name, "int");
        assert_eq!(cell.default_value, "0");
        assert_eq!(cell.description, "");
    }

    #[test]
    fn merge_keeps_first_metadata() {
        let mut a = ApiSource {
            title: Some("A".into()),
            endpoints: vec![endpoint(Some("GET"), &["/a"])],
            ..Default::default()
        };
        let b = ApiSource {
            title: Some("B".into()),
            version: Some("2".into()),
            endpoints: vec![endpoint(Some("GET"), &["/b"])],
            ..Default::default()
        };
        a.merge(b);
        assert_eq!(a.title.as_deref(), Some("A"));
        assert_eq!(a.version.as_deref(), Some("2"));
        assert_eq!(a.endpoints.len(), 2);
        assert_eq!(a.endpoints[1].request.uris, vec!["/b"]);
    }
}
