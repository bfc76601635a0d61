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

use serde_json::Value;

use crate::{
	client::{Client, RequestOptions},
	error::ClientError,
};

impl Client {
	/// Create a parametric QR code ticket
	pub async fn create_qrcode(&self, data: Value) -> Result<Value, ClientError> {
		self.post(
			&self.config.api_url("/cgi-bin/qrcode/create"),
			RequestOptions::new().json(data),
		)
		.await
	}

	/// Exchange a ticket for the QR code image
	///
	/// This endpoint takes no access token.
	pub async fn show_qrcode(&self, ticket: &str) -> Result<Vec<u8>, ClientError> {
		self.get_bytes(
			&self.config.mp_url("/cgi-bin/showqrcode"),
			RequestOptions::new().params([("ticket", ticket)]),
		)
		.await
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use serde_json::json;

	use super::*;
	use crate::{
		config::ClientConfig,
		testing::MockTransport,
		transport::{HttpResponse, Method, RequestBody},
	};

	#[tokio::test]
	async fn test_create_qrcode_body() {
		let transport = Arc::new(MockTransport::with_token(
			json!({"ticket": "gQH47joAAAAAAAAAASxodHRwOi8", "expire_seconds": 60}),
		));
		let client = Client::with_transport(
			ClientConfig::new("wx1", "s").with_base_url("http://mock"),
			transport.clone(),
		)
		.unwrap();
		let data = json!({
			"expire_seconds": 60,
			"action_name": "QR_SCENE",
			"action_info": {"scene": {"scene_id": 123}}
		});

		let value = client.create_qrcode(data.clone()).await.unwrap();

		assert_eq!(value["expire_seconds"], 60);
		let request = transport.api_requests().remove(0);
		assert_eq!(request.method, Method::Post);
		assert_eq!(request.url, "http://mock/cgi-bin/qrcode/create");
		assert_eq!(request.query_param("access_token"), Some("token-1"));
		assert_eq!(request.body, RequestBody::Json(data.to_string()));
	}

	#[tokio::test]
	async fn test_show_qrcode_skips_token() {
		let transport = Arc::new(MockTransport::new(|_| HttpResponse {
			status: 200,
			content_type: Some("image/jpeg".to_string()),
			body: vec![0xff, 0xd8],
		}));
		let client = Client::with_transport(
			ClientConfig::new("wx1", "s").with_base_url("http://mock"),
			transport.clone(),
		)
		.unwrap();

		let image = client.show_qrcode("gQH47joAAAAAAAAAASxodHRwOi8").await.unwrap();

		assert_eq!(image, vec![0xff, 0xd8]);
		let requests = transport.requests();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].url, "http://mock/cgi-bin/showqrcode");
		assert_eq!(requests[0].query, vec![(
			"ticket".to_string(),
			"gQH47joAAAAAAAAAASxodHRwOi8".to_string()
		)]);
	}
}
