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
	types::MediaType,
};

impl Client {
	/// Upload a media file; the response carries its `media_id`
	pub async fn upload_media(
		&self,
		media_type: MediaType,
		file_name: &str,
		content: Vec<u8>,
	) -> Result<Value, ClientError> {
		let token = self.access_token().await?;
		self.post(
			&self.config.file_api_url("/cgi-bin/media/upload"),
			RequestOptions::new()
				.params([("access_token", token.as_str()), ("type", media_type.as_str())])
				.file("media", file_name, content),
		)
		.await
	}

	/// Download a media file as raw bytes
	pub async fn download_media(&self, media_id: &str) -> Result<Vec<u8>, ClientError> {
		let token = self.access_token().await?;
		self.get_bytes(
			&self.config.file_api_url("/cgi-bin/media/get"),
			RequestOptions::new().params([("access_token", token.as_str()), ("media_id", media_id)]),
		)
		.await
	}
}
