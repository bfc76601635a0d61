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

use serde_json::{Value, json};

use crate::{
	client::{Client, RequestOptions},
	error::ClientError,
};

impl Client {
	/// Create a user group (name up to 30 characters)
	pub async fn create_group(&self, name: &str) -> Result<Value, ClientError> {
		self.post(
			&self.config.api_url("/cgi-bin/groups/create"),
			RequestOptions::new().json(json!({"group": {"name": name}})),
		)
		.await
	}

	pub async fn get_groups(&self) -> Result<Value, ClientError> {
		self.get(&self.config.api_url("/cgi-bin/groups/get"), RequestOptions::new())
			.await
	}

	/// Group the user currently belongs to
	pub async fn get_group_by_id(&self, openid: &str) -> Result<Value, ClientError> {
		self.post(
			&self.config.api_url("/cgi-bin/groups/getid"),
			RequestOptions::new().json(json!({"openid": openid})),
		)
		.await
	}

	pub async fn update_group(&self, group_id: i64, name: &str) -> Result<Value, ClientError> {
		self.post(
			&self.config.api_url("/cgi-bin/groups/update"),
			RequestOptions::new().json(json!({"group": {"id": group_id, "name": name}})),
		)
		.await
	}

	/// Move a user into another group
	pub async fn move_user(&self, openid: &str, group_id: i64) -> Result<Value, ClientError> {
		self.post(
			&self.config.api_url("/cgi-bin/groups/members/update"),
			RequestOptions::new().json(json!({"openid": openid, "to_groupid": group_id})),
		)
		.await
	}
}
