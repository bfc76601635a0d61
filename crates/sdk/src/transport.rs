// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP transport seam
//!
//! The SDK only needs verb dispatch with query parameters, an optional JSON
//! or multipart body, and access to the status code and raw body. Status
//! checking and JSON decoding happen on [`HttpResponse`] so every transport
//! gets the same failure semantics.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
	Client as ReqwestClient,
	header::CONTENT_TYPE,
	multipart::{Form, Part},
};
use serde_json::Value;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
	Get,
	Post,
}

/// Request body as it goes on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
	Empty,
	/// Serialized JSON document
	Json(String),
	/// Single-file multipart upload
	Multipart {
		field: String,
		file_name: String,
		content: Vec<u8>,
	},
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
	pub method: Method,
	pub url: String,
	pub query: Vec<(String, String)>,
	pub body: RequestBody,
}

impl HttpRequest {
	pub fn new(method: Method, url: impl Into<String>) -> Self {
		Self {
			method,
			url: url.into(),
			query: Vec::new(),
			body: RequestBody::Empty,
		}
	}

	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));
		self
	}

	/// Look up a query parameter by name
	pub fn query_param(&self, key: &str) -> Option<&str> {
		self.query
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
	pub status: u16,
	pub content_type: Option<String>,
	pub body: Vec<u8>,
}

impl HttpResponse {
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	pub fn is_json(&self) -> bool {
		self.content_type
			.as_deref()
			.is_some_and(|ct| ct.contains("json") || ct.starts_with("text/plain"))
	}

	/// Fail with [`ClientError::Transport`] on a non-2xx status
	pub fn error_for_status(self) -> Result<Self, ClientError> {
		if self.is_success() {
			return Ok(self);
		}
		Err(ClientError::Transport {
			status: Some(self.status),
			message: format!("HTTP {}: {}", self.status, String::from_utf8_lossy(&self.body)),
		})
	}

	/// Decode the body as JSON
	pub fn json(&self) -> Result<Value, ClientError> {
		serde_json::from_slice(&self.body)
			.map_err(|e| ClientError::Decode(format!("Failed to parse response: {}", e)))
	}
}

/// Generic HTTP dispatch used by the token manager and the API client
#[async_trait]
pub trait Transport: Send + Sync {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

/// [`Transport`] backed by reqwest
///
/// Connection pooling and TLS are left to reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
	client: ReqwestClient,
}

impl ReqwestTransport {
	pub fn new(timeout: Duration) -> Result<Self, ClientError> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| ClientError::Transport {
				status: None,
				message: format!("Failed to create HTTP client: {}", e),
			})?;

		Ok(Self { client })
	}

	/// Wrap an existing reqwest client
	pub fn from_client(client: ReqwestClient) -> Self {
		Self { client }
	}
}

#[async_trait]
impl Transport for ReqwestTransport {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
		let mut builder = match request.method {
			Method::Get => self.client.get(&request.url),
			Method::Post => self.client.post(&request.url),
		};
		if !request.query.is_empty() {
			builder = builder.query(&request.query);
		}
		builder = match request.body {
			RequestBody::Empty => builder,
			RequestBody::Json(text) => builder
				.header(CONTENT_TYPE, "application/json; charset=utf-8")
				.body(text),
			RequestBody::Multipart {
				field,
				file_name,
				content,
			} => builder.multipart(Form::new().part(field, Part::bytes(content).file_name(file_name))),
		};

		// reqwest errors carry the full URL, and the token endpoint puts the
		// app secret in the query string
		let response = builder.send().await.map_err(|e| ClientError::Transport {
			status: None,
			message: format!("Request failed: {}", e.without_url()),
		})?;

		let status = response.status().as_u16();
		let content_type = response
			.headers()
			.get(CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
			.map(str::to_string);
		let body = response
			.bytes()
			.await
			.map_err(|e| ClientError::Transport {
				status: Some(status),
				message: format!("Failed to read response body: {}", e.without_url()),
			})?
			.to_vec();

		Ok(HttpResponse {
			status,
			content_type,
			body,
		})
	}
}
