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

//! In-process transport and clock doubles for unit tests

use std::{
	sync::{
		Mutex,
		atomic::{AtomicI64, Ordering},
	},
	time::Duration,
};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
	clock::Clock,
	error::ClientError,
	token::TOKEN_PATH,
	transport::{HttpRequest, HttpResponse, Transport},
};

type Handler = Box<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

/// Records every request and answers from a handler
pub struct MockTransport {
	handler: Handler,
	requests: Mutex<Vec<HttpRequest>>,
	delay: Option<Duration>,
}

impl MockTransport {
	pub fn new(handler: impl Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static) -> Self {
		Self {
			handler: Box::new(handler),
			requests: Mutex::new(Vec::new()),
			delay: None,
		}
	}

	/// Answer every request with the same JSON document
	pub fn json(value: Value) -> Self {
		Self::new(move |_| json_response(&value))
	}

	/// Answer every request with a fixed status and body
	pub fn status(status: u16, body: &'static str) -> Self {
		Self::new(move |_| HttpResponse {
			status,
			content_type: Some("text/plain".to_string()),
			body: body.as_bytes().to_vec(),
		})
	}

	/// Issue `token` from the token endpoint, answer everything else with `value`
	pub fn with_token(value: Value) -> Self {
		Self::new(move |request| {
			if request.url.ends_with(TOKEN_PATH) {
				json_response(&json!({"access_token": "token-1", "expires_in": 7200}))
			} else {
				json_response(&value)
			}
		})
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	pub fn call_count(&self) -> usize {
		self.requests.lock().unwrap().len()
	}

	pub fn requests(&self) -> Vec<HttpRequest> {
		self.requests.lock().unwrap().clone()
	}

	/// Requests whose URL does not hit the token endpoint
	pub fn api_requests(&self) -> Vec<HttpRequest> {
		self.requests()
			.into_iter()
			.filter(|r| !r.url.ends_with(TOKEN_PATH))
			.collect()
	}
}

pub fn json_response(value: &Value) -> HttpResponse {
	HttpResponse {
		status: 200,
		content_type: Some("application/json".to_string()),
		body: value.to_string().into_bytes(),
	}
}

#[async_trait]
impl Transport for MockTransport {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
		self.requests.lock().unwrap().push(request.clone());
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		Ok((self.handler)(&request))
	}
}

/// Clock that only moves when told to
pub struct ManualClock(AtomicI64);

impl ManualClock {
	pub fn new(now: i64) -> Self {
		Self(AtomicI64::new(now))
	}

	pub fn set(&self, now: i64) {
		self.0.store(now, Ordering::SeqCst);
	}
}

impl Clock for ManualClock {
	fn now(&self) -> i64 {
		self.0.load(Ordering::SeqCst)
	}
}
