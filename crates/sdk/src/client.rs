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

use std::{future::Future, sync::Arc, time::Duration};

use serde_json::Value;
use tracing::debug;

use crate::{
	clock::{Clock, SystemClock},
	config::ClientConfig,
	error::{ClientError, check_error},
	token::TokenManager,
	transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, RequestBody, Transport},
	types::{DeliverNotify, JsPayParams, PayPackage},
};

/// Request body before it is put on the wire
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
	/// Serialized to JSON text
	Json(Value),
	/// Sent as a single-file multipart form
	File {
		field: String,
		file_name: String,
		content: Vec<u8>,
	},
}

/// Options for [`Client::request`]
///
/// Without explicit `params` the current access token is sent as the only
/// query parameter. Callers that pass `params` are responsible for
/// including `access_token` themselves when the endpoint needs it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
	params: Option<Vec<(String, String)>>,
	payload: Option<Payload>,
}

impl RequestOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Explicit query parameters
	pub fn params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.params = Some(
			params
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		);
		self
	}

	pub fn json(mut self, value: Value) -> Self {
		self.payload = Some(Payload::Json(value));
		self
	}

	pub fn file(
		mut self,
		field: impl Into<String>,
		file_name: impl Into<String>,
		content: Vec<u8>,
	) -> Self {
		self.payload = Some(Payload::File {
			field: field.into(),
			file_name: file_name.into(),
			content,
		});
		self
	}
}

/// Authenticated client for the platform API
///
/// Endpoint wrappers live in [`crate::api`] and the payment flows in
/// [`crate::pay`]; both go through [`Client::request`].
pub struct Client {
	pub(crate) config: Arc<ClientConfig>,
	pub(crate) transport: Arc<dyn Transport>,
	pub(crate) clock: Arc<dyn Clock>,
	tokens: TokenManager,
}

impl Client {
	/// Create a client over reqwest
	///
	/// # Errors
	/// `Configuration` when `appid`/`appsecret` are empty. Payment settings
	/// are checked by the operations that use them.
	pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
		config.validate()?;
		let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs))?;
		Self::with_transport(config, Arc::new(transport))
	}

	/// Create a client with a custom transport
	pub fn with_transport(
		config: ClientConfig,
		transport: Arc<dyn Transport>,
	) -> Result<Self, ClientError> {
		Self::with_parts(config, transport, Arc::new(SystemClock))
	}

	/// Create a client with a custom transport and clock
	pub fn with_parts(
		config: ClientConfig,
		transport: Arc<dyn Transport>,
		clock: Arc<dyn Clock>,
	) -> Result<Self, ClientError> {
		config.validate()?;
		let tokens = TokenManager::new(&config, transport.clone(), clock.clone());

		Ok(Self {
			config: Arc::new(config),
			transport,
			clock,
			tokens,
		})
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	pub fn token_manager(&self) -> &TokenManager {
		&self.tokens
	}

	/// Current access token, refreshed when close to expiry
	pub async fn access_token(&self) -> Result<String, ClientError> {
		self.tokens.get_token().await
	}

	/// Issue a request and return the decoded JSON document
	///
	/// # Errors
	/// - `Credential` if the token had to be refreshed and that failed
	/// - `Transport` on network failure or a non-2xx status
	/// - `Decode` if the body is not JSON
	/// - `Api` if the document carries a non-zero `errcode`
	pub async fn request(
		&self,
		method: Method,
		url: &str,
		options: RequestOptions,
	) -> Result<Value, ClientError> {
		let response = self.dispatch(method, url, options).await?;
		check_error(response.json()?)
	}

	pub async fn get(&self, url: &str, options: RequestOptions) -> Result<Value, ClientError> {
		self.request(Method::Get, url, options).await
	}

	pub async fn post(&self, url: &str, options: RequestOptions) -> Result<Value, ClientError> {
		self.request(Method::Post, url, options).await
	}

	/// Issue a GET and return the raw body
	///
	/// A JSON body is still checked for a platform error so a failed download
	/// does not come back as file content.
	pub async fn get_bytes(&self, url: &str, options: RequestOptions) -> Result<Vec<u8>, ClientError> {
		let response = self.dispatch(Method::Get, url, options).await?;
		if response.is_json() {
			check_error(response.json()?)?;
		}
		Ok(response.body)
	}

	async fn dispatch(
		&self,
		method: Method,
		url: &str,
		options: RequestOptions,
	) -> Result<HttpResponse, ClientError> {
		let query = match options.params {
			Some(params) => params,
			None => vec![("access_token".to_string(), self.access_token().await?)],
		};
		let body = match options.payload {
			None => RequestBody::Empty,
			Some(Payload::Json(value)) => RequestBody::Json(value.to_string()),
			Some(Payload::File {
				field,
				file_name,
				content,
			}) => RequestBody::Multipart {
				field,
				file_name,
				content,
			},
		};

		debug!(?method, %url, "Dispatching API request");
		let request = HttpRequest {
			method,
			url: url.to_string(),
			query,
			body,
		};

		self.transport.send(request).await?.error_for_status()
	}
}

/// Synchronous client wrapper (for compatibility)
///
/// This wraps the async client and runs it in a tokio runtime.
/// For new code, prefer using the async Client directly.
pub struct SyncClient {
	client: Client,
	runtime: tokio::runtime::Runtime,
}

impl SyncClient {
	/// Create a new synchronous client
	pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
		Self::from_client(Client::new(config)?)
	}

	/// Wrap an existing async client
	pub fn from_client(client: Client) -> Result<Self, ClientError> {
		let runtime = tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.build()
			.map_err(|e| ClientError::Configuration(format!("Failed to create tokio runtime: {}", e)))?;
		Ok(Self { client, runtime })
	}

	pub fn client(&self) -> &Client {
		&self.client
	}

	/// Run any async client operation to completion
	pub fn block_on<F: Future>(&self, future: F) -> F::Output {
		self.runtime.block_on(future)
	}

	pub fn access_token(&self) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.access_token())
	}

	pub fn request(
		&self,
		method: Method,
		url: &str,
		options: RequestOptions,
	) -> Result<Value, ClientError> {
		self.runtime.block_on(self.client.request(method, url, options))
	}

	pub fn get(&self, url: &str, options: RequestOptions) -> Result<Value, ClientError> {
		self.runtime.block_on(self.client.get(url, options))
	}

	pub fn post(&self, url: &str, options: RequestOptions) -> Result<Value, ClientError> {
		self.runtime.block_on(self.client.post(url, options))
	}

	pub fn create_js_pay_package(&self, package: &PayPackage) -> Result<String, ClientError> {
		self.client.create_js_pay_package(package)
	}

	pub fn create_js_pay_params(&self, package: &PayPackage) -> Result<JsPayParams, ClientError> {
		self.client.create_js_pay_params(package)
	}

	pub fn create_native_pay_url(&self, product_id: &str) -> Result<String, ClientError> {
		self.client.create_native_pay_url(product_id)
	}

	pub fn pay_deliver_notify(&self, notify: &DeliverNotify) -> Result<Value, ClientError> {
		self.runtime.block_on(self.client.pay_deliver_notify(notify))
	}

	pub fn pay_order_query(&self, out_trade_no: &str) -> Result<Value, ClientError> {
		self.runtime.block_on(self.client.pay_order_query(out_trade_no))
	}
}
