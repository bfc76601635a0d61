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
	/// Create the custom menu from its JSON definition
	pub async fn create_menu(&self, menu: Value) -> Result<Value, ClientError> {
		self.post(
			&self.config.api_url("/cgi-bin/menu/create"),
			RequestOptions::new().json(menu),
		)
		.await
	}

	pub async fn get_menu(&self) -> Result<Value, ClientError> {
		self.get(&self.config.api_url("/cgi-bin/menu/get"), RequestOptions::new())
			.await
	}

	pub async fn delete_menu(&self) -> Result<Value, ClientError> {
		self.get(&self.config.api_url("/cgi-bin/menu/delete"), RequestOptions::new())
			.await
	}
}
