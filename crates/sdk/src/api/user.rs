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

/// Language of region names in user profiles
pub const DEFAULT_LANG: &str = "zh_CN";

impl Client {
	/// Basic profile of a follower; `lang` is one of `zh_CN`, `zh_TW`, `en`
	pub async fn get_user_info(&self, openid: &str, lang: Option<&str>) -> Result<Value, ClientError> {
		let token = self.access_token().await?;
		self.get(
			&self.config.api_url("/cgi-bin/user/info"),
			RequestOptions::new().params([
				("access_token", token.as_str()),
				("openid", openid),
				("lang", lang.unwrap_or(DEFAULT_LANG)),
			]),
		)
		.await
	}

	/// One page of follower openids, starting after `next_openid`
	pub async fn get_followers(&self, next_openid: Option<&str>) -> Result<Value, ClientError> {
		let token = self.access_token().await?;
		let mut params = vec![("access_token", token.as_str())];
		if let Some(next) = next_openid {
			params.push(("next_openid", next));
		}
		self.get(
			&self.config.api_url("/cgi-bin/user/get"),
			RequestOptions::new().params(params),
		)
		.await
	}
}
