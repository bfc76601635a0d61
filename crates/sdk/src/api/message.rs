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

//! Customer-service messages

use serde_json::{Map, Value, json};

use crate::{
	client::{Client, RequestOptions},
	error::ClientError,
	types::Article,
};

const CUSTOM_SEND_PATH: &str = "/cgi-bin/message/custom/send";

/// Upper bound on articles in one news message
pub const MAX_ARTICLES: usize = 10;

impl Client {
	pub async fn send_text_message(&self, openid: &str, content: &str) -> Result<Value, ClientError> {
		self.send_custom(openid, "text", json!({"content": content}))
			.await
	}

	/// `media_id` comes from [`Client::upload_media`]
	pub async fn send_image_message(&self, openid: &str, media_id: &str) -> Result<Value, ClientError> {
		self.send_custom(openid, "image", json!({"media_id": media_id}))
			.await
	}

	pub async fn send_voice_message(&self, openid: &str, media_id: &str) -> Result<Value, ClientError> {
		self.send_custom(openid, "voice", json!({"media_id": media_id}))
			.await
	}

	pub async fn send_video_message(
		&self,
		openid: &str,
		media_id: &str,
		title: Option<&str>,
		description: Option<&str>,
	) -> Result<Value, ClientError> {
		let mut video = Map::new();
		video.insert("media_id".to_string(), json!(media_id));
		insert_opt(&mut video, "title", title);
		insert_opt(&mut video, "description", description);

		self.send_custom(openid, "video", Value::Object(video)).await
	}

	/// `hq_url` is preferred by clients on wifi
	pub async fn send_music_message(
		&self,
		openid: &str,
		url: &str,
		hq_url: &str,
		thumb_media_id: &str,
		title: Option<&str>,
		description: Option<&str>,
	) -> Result<Value, ClientError> {
		let mut music = Map::new();
		music.insert("musicurl".to_string(), json!(url));
		music.insert("hqmusicurl".to_string(), json!(hq_url));
		music.insert("thumb_media_id".to_string(), json!(thumb_media_id));
		insert_opt(&mut music, "title", title);
		insert_opt(&mut music, "description", description);

		self.send_custom(openid, "music", Value::Object(music)).await
	}

	/// Send a news message of at most [`MAX_ARTICLES`] articles
	pub async fn send_article_message(
		&self,
		openid: &str,
		articles: &[Article],
	) -> Result<Value, ClientError> {
		if articles.len() > MAX_ARTICLES {
			return Err(ClientError::InvalidArgument(format!(
				"a news message holds at most {} articles, got {}",
				MAX_ARTICLES,
				articles.len()
			)));
		}

		self.send_custom(openid, "news", json!({"articles": articles}))
			.await
	}

	async fn send_custom(&self, openid: &str, msgtype: &str, content: Value) -> Result<Value, ClientError> {
		let mut body = Map::new();
		body.insert("touser".to_string(), json!(openid));
		body.insert("msgtype".to_string(), json!(msgtype));
		body.insert(msgtype.to_string(), content);

		self.post(
			&self.config.api_url(CUSTOM_SEND_PATH),
			RequestOptions::new().json(Value::Object(body)),
		)
		.await
	}
}

fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<&str>) {
	if let Some(value) = value {
		map.insert(key.to_string(), json!(value));
	}
}
