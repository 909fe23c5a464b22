//! Postman v2.1 collection handler.
//!
//! Named buckets become folders holding one folder per group; groups of the
//! default bucket sit at the top level. Each node becomes one request built
//! from its first URI.

use crate::error::{RenderError, Result};
use crate::model::{Group, Node, Tree};
use crate::render::{Artifact, Handler, RenderContext};
use serde::Serialize;

const SCHEMA: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Collection variable prefixed to every request URL.
const BASE_URL: &str = "{{baseUrl}}";

pub struct PostmanHandler;

impl Handler for PostmanHandler {
    fn name(&self) -> &str {
        "postman"
    }

    fn handle(&self, tree: &Tree, ctx: &RenderContext) -> Result<Vec<Artifact>> {
        let collection = collection(tree);
        let mut content =
            serde_json::to_string_pretty(&collection).map_err(|error| RenderError::Serialize {
                what: "postman collection",
                error,
            })?;
        content.push('\n');
        Ok(vec![Artifact {
            name: format!("{}.postman.json", ctx.id),
            content,
        }])
    }
}

#[derive(Serialize)]
struct Collection {
    info: Info,
    item: Vec<Item>,
    variable: Vec<Pair>,
}

#[derive(Serialize)]
struct Info {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    schema: &'static str,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Item {
    Folder {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        item: Vec<Item>,
    },
    Request {
        name: String,
        request: Request,
    },
}

#[derive(Serialize)]
struct Request {
    method: String,
    header: Vec<Pair>,
    url: Url,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Body>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Serialize)]
struct Url {
    raw: String,
    host: Vec<String>,
    path: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    query: Vec<Pair>,
}

#[derive(Serialize)]
struct Body {
    mode: &'static str,
    raw: String,
}

#[derive(Serialize)]
struct Pair {
    key: String,
    value: String,
}

fn collection(tree: &Tree) -> Collection {
    let mut item: Vec<Item> = tree
        .default_bucket
        .groups
        .iter()
        .filter(|g| !g.is_empty())
        .map(folder)
        .collect();
    for bucket in tree.buckets.values().filter(|b| !b.is_empty()) {
        item.push(Item::Folder {
            name: bucket.name.clone(),
            description: None,
            item: bucket
                .groups
                .iter()
                .filter(|g| !g.is_empty())
                .map(folder)
                .collect(),
        });
    }
    Collection {
        info: Info {
            name: tree.name.clone(),
            description: tree.description.clone(),
            version: tree.version.clone(),
            schema: SCHEMA,
        },
        item,
        variable: vec![Pair {
            key: "baseUrl".to_string(),
            value: String::new(),
        }],
    }
}

fn folder(group: &Group) -> Item {
    Item::Folder {
        name: group.name.clone(),
        description: group.description.clone(),
        item: group.nodes.iter().map(request).collect(),
    }
}

fn request(node: &Node) -> Item {
    let req = &node.request;
    let uri = req.uris.first().map(String::as_str).unwrap_or("/");
    Item::Request {
        name: node.name.clone(),
        request: Request {
            method: req.method.clone(),
            header: req
                .effective_headers()
                .into_iter()
                .map(|(k, v)| Pair {
                    key: k.to_string(),
                    value: v.to_string(),
                })
                .collect(),
            url: Url {
                raw: format!("{}{}{}", BASE_URL, uri, req.query_string()),
                host: vec![BASE_URL.to_string()],
                path: uri
                    .split('/')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
                query: req
                    .query
                    .iter()
                    .map(|q| Pair {
                        key: q.name.clone(),
                        value: q.value.clone(),
                    })
                    .collect(),
            },
            body: req
                .body
                .clone()
                .filter(|_| req.has_body())
                .map(|raw| Body { mode: "raw", raw }),
            description: node.description.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{HttpRequest, QueryParam};

    fn tree() -> Tree {
        let mut tree = Tree::new("Shop");
        tree.bucket_mut(None)
            .group_mut("Users", "users", Some("User API"))
            .nodes
            .push(Node {
                name: "find".to_string(),
                version: "HTTP/1.1".to_string(),
                request: HttpRequest {
                    method: "GET".to_string(),
                    uris: vec!["/users/{id}".to_string(), "/u/{id}".to_string()],
                    query: vec![QueryParam {
                        name: "x".to_string(),
                        value: "1".to_string(),
                    }],
                    ..Default::default()
                },
                ..Default::default()
            });
        tree.bucket_mut(Some("admin"))
            .group_mut("Audit", "audit", None)
            .nodes
            .push(Node {
                name: "log".to_string(),
                request: HttpRequest {
                    method: "POST".to_string(),
                    uris: vec!["/audit".to_string()],
                    body: Some("{}".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            });
        tree.bucket_mut(None).group_mut("Empty", "empty", None);
        tree
    }

    #[test]
    fn builds_folders_and_requests() {
        let out = PostmanHandler
            .handle(&tree(), &RenderContext::default())
            .unwrap();
        assert_eq!(out[0].name, "index.postman.json");
        let v: serde_json::Value = serde_json::from_str(&out[0].content).unwrap();

        assert_eq!(v["info"]["name"], "Shop");
        assert_eq!(v["info"]["schema"], SCHEMA);
        let items = v["item"].as_array().unwrap();
        assert_eq!(items.len(), 2);

        let find = &items[0]["item"][0]["request"];
        assert_eq!(items[0]["description"], "User API");
        assert_eq!(find["method"], "GET");
        assert_eq!(find["url"]["raw"], "{{baseUrl}}/users/{id}?x=1");
        assert_eq!(find["url"]["path"], serde_json::json!(["users", "{id}"]));
        assert!(find.get("body").is_none());

        let audit = &items[1]["item"][0]["item"][0]["request"];
        assert_eq!(items[1]["name"], "admin");
        assert_eq!(audit["body"]["raw"], "{}");
        assert!(audit["url"].get("query").is_none());
    }
}
