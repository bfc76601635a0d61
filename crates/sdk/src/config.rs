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

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::signing::SigningError;

/// Default platform API base URL (can be overridden by WEMP_API_BASE)
pub const DEFAULT_API_BASE: &str = "https://api.weixin.qq.com";

/// Default media file API base URL (can be overridden by WEMP_FILE_API_BASE)
pub const DEFAULT_FILE_API_BASE: &str = "http://file.api.weixin.qq.com";

/// Default base URL for QR code images (can be overridden by WEMP_MP_BASE)
pub const DEFAULT_MP_BASE: &str = "https://mp.weixin.qq.com";

/// Default HTTP timeout in seconds (can be overridden by WEMP_TIMEOUT_SECS)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "WEMP";

/// Client configuration
///
/// `appid` and `appsecret` are checked when a client is built. The payment
/// fields are only checked by the operation that needs them.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
	pub appid: String,
	pub appsecret: String,
	/// Key for the SHA1 (`appkey`) signing scheme
	#[serde(default)]
	pub pay_sign_key: Option<String>,
	#[serde(default)]
	pub pay_partner_id: Option<String>,
	/// Key for the MD5 (`key`) package signing scheme
	#[serde(default)]
	pub pay_partner_key: Option<String>,
	#[serde(default = "default_api_base")]
	pub api_base: String,
	#[serde(default = "default_file_api_base")]
	pub file_api_base: String,
	#[serde(default = "default_mp_base")]
	pub mp_base: String,
	#[serde(default = "default_timeout_secs")]
	pub timeout_secs: u64,
}

fn default_api_base() -> String {
	DEFAULT_API_BASE.to_string()
}

fn default_file_api_base() -> String {
	DEFAULT_FILE_API_BASE.to_string()
}

fn default_mp_base() -> String {
	DEFAULT_MP_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
	DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
	pub fn new(appid: impl Into<String>, appsecret: impl Into<String>) -> Self {
		Self {
			appid: appid.into(),
			appsecret: appsecret.into(),
			pay_sign_key: None,
			pay_partner_id: None,
			pay_partner_key: None,
			api_base: default_api_base(),
			file_api_base: default_file_api_base(),
			mp_base: default_mp_base(),
			timeout_secs: DEFAULT_TIMEOUT_SECS,
		}
	}

	pub fn with_pay_sign_key(mut self, key: impl Into<String>) -> Self {
		self.pay_sign_key = Some(key.into());
		self
	}

	pub fn with_partner(mut self, partner_id: impl Into<String>, partner_key: impl Into<String>) -> Self {
		self.pay_partner_id = Some(partner_id.into());
		self.pay_partner_key = Some(partner_key.into());
		self
	}

	/// Point every endpoint family at one host (proxies, test servers)
	pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
		let base = base.into();
		self.api_base = base.clone();
		self.file_api_base = base.clone();
		self.mp_base = base;
		self
	}

	/// Load configuration from environment variables
	pub fn from_env() -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::Environment::with_prefix(ENV_PREFIX))
			.build()?;

		cfg.try_deserialize()
	}

	/// Load configuration from file
	pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::File::with_name(path))
			.add_source(config::Environment::with_prefix(ENV_PREFIX))
			.build()?;

		cfg.try_deserialize()
	}

	/// Reject configurations missing the application credentials
	pub fn validate(&self) -> Result<(), ClientError> {
		if self.appid.trim().is_empty() {
			return Err(ClientError::Configuration("appid is empty".to_string()));
		}
		if self.appsecret.trim().is_empty() {
			return Err(ClientError::Configuration("appsecret is empty".to_string()));
		}
		Ok(())
	}

	pub(crate) fn pay_sign_key(&self) -> Result<&str, SigningError> {
		required(&self.pay_sign_key, "pay_sign_key")
	}

	pub(crate) fn pay_partner_id(&self) -> Result<&str, SigningError> {
		required(&self.pay_partner_id, "pay_partner_id")
	}

	pub(crate) fn pay_partner_key(&self) -> Result<&str, SigningError> {
		required(&self.pay_partner_key, "pay_partner_key")
	}

	pub(crate) fn api_url(&self, path: &str) -> String {
		join_url(&self.api_base, path)
	}

	pub(crate) fn file_api_url(&self, path: &str) -> String {
		join_url(&self.file_api_base, path)
	}

	pub(crate) fn mp_url(&self, path: &str) -> String {
		join_url(&self.mp_base, path)
	}
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, SigningError> {
	match value.as_deref() {
		Some(v) if !v.is_empty() => Ok(v),
		_ => Err(SigningError::MissingKey(name)),
	}
}

fn join_url(base: &str, path: &str) -> String {
	format!("{}{}", base.trim_end_matches('/'), path)
}

fn redact(value: &Option<String>) -> &'static str {
	match value {
		Some(_) => "<redacted>",
		None => "<unset>",
	}
}

impl fmt::Debug for ClientConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClientConfig")
			.field("appid", &self.appid)
			.field("appsecret", &"<redacted>")
			.field("pay_sign_key", &redact(&self.pay_sign_key))
			.field("pay_partner_id", &self.pay_partner_id)
			.field("pay_partner_key", &redact(&self.pay_partner_key))
			.field("api_base", &self.api_base)
			.field("file_api_base", &self.file_api_base)
			.field("mp_base", &self.mp_base)
			.field("timeout_secs", &self.timeout_secs)
			.finish()
	}
}
