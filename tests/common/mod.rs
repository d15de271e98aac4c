//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::convert::Infallible;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use live_config::LiveConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tower::ServiceExt;

/// Single-field config: ports below 1024 fail validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PortConfig {
    pub port: u16,
}

impl LiveConfig for PortConfig {
    type Error = String;

    fn validate(&self) -> Result<(), String> {
        if self.port < 1024 {
            return Err(format!("port {} is below 1024", self.port));
        }
        Ok(())
    }

    fn update(&mut self, candidate: Self) -> Result<(), String> {
        *self = candidate;
        Ok(())
    }
}

/// Config whose commit step refuses a frozen value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GuardedConfig {
    pub name: String,
    pub limit: u32,
}

impl LiveConfig for GuardedConfig {
    type Error = String;

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    fn update(&mut self, candidate: Self) -> Result<(), String> {
        if candidate.name != self.name {
            return Err(format!("name {:?} is frozen", self.name));
        }
        self.limit = candidate.limit;
        Ok(())
    }
}

/// Two fields that are always written together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PairConfig {
    pub left: u64,
    pub right: u64,
}

impl LiveConfig for PairConfig {
    type Error = String;

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    fn update(&mut self, candidate: Self) -> Result<(), String> {
        self.left = candidate.left;
        self.right = candidate.right;
        Ok(())
    }
}

/// Send one request through `app` and return status and body.
pub async fn send<S>(app: S, method: Method, uri: &str, body: &str) -> (StatusCode, String)
where
    S: tower::Service<Request<Body>, Response = Response, Error = Infallible>,
{
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    send(app, Method::GET, uri, "").await
}

pub async fn post(app: Router, uri: &str, body: &str) -> (StatusCode, String) {
    send(app, Method::POST, uri, body).await
}

/// Config that decodes but can never be encoded.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UnencodableConfig {
    pub port: u16,
}

impl Serialize for UnencodableConfig {
    fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("boom"))
    }
}

impl LiveConfig for UnencodableConfig {
    type Error = String;

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    fn update(&mut self, candidate: Self) -> Result<(), String> {
        *self = candidate;
        Ok(())
    }
}
