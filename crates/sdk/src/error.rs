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

//! Error taxonomy shared by the token manager, the signing call sites and
//! every endpoint wrapper.
//!
//! Nothing is retried or swallowed inside the SDK. Platform error codes are
//! preserved verbatim in [`ClientError::Api`] so callers can branch on them.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::signing::SigningError;

/// Platform codes meaning the access token was rejected.
pub const TOKEN_REJECTED_CODES: [i64; 3] = [40001, 40014, 42001];

/// Error types for client operations
#[derive(Debug, Clone, Error)]
pub enum ClientError {
	/// Network failure (`status` is `None`) or a non-2xx HTTP status
	#[error("Transport error: {message}")]
	Transport {
		status: Option<u16>,
		message: String,
	},
	/// Response body is not the JSON document we expected
	#[error("Decode error: {0}")]
	Decode(String),
	/// Platform reported a non-zero `errcode`
	#[error("API error {code}: {message}")]
	Api { code: i64, message: String },
	/// A required credential or signing secret is unset
	#[error("Configuration error: {0}")]
	Configuration(String),
	/// Caller input rejected before anything was sent
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	/// The access token could not be refreshed
	#[error("Credential refresh failed: {0}")]
	Credential(#[source] Box<ClientError>),
}

impl ClientError {
	/// Platform error code, looking through a failed token refresh.
	pub fn api_code(&self) -> Option<i64> {
		match self {
			Self::Api { code, .. } => Some(*code),
			Self::Credential(inner) => inner.api_code(),
			_ => None,
		}
	}

	/// True when the platform rejected the access token itself.
	pub fn is_token_rejected(&self) -> bool {
		self.api_code()
			.is_some_and(|code| TOKEN_REJECTED_CODES.contains(&code))
	}
}

impl From<SigningError> for ClientError {
	fn from(err: SigningError) -> Self {
		Self::Configuration(err.to_string())
	}
}

/// Inspect a decoded response for a platform error.
///
/// A missing `errcode` or `errcode == 0` is success and the document is
/// returned unchanged. Some endpoints send the code as a string; it is
/// read the same way.
pub fn check_error(value: Value) -> Result<Value, ClientError> {
	let code = match value.get("errcode") {
		None | Some(Value::Null) => return Ok(value),
		Some(Value::Number(n)) => n.as_i64(),
		Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
		Some(_) => None,
	};
	let Some(code) = code else {
		return Err(ClientError::Decode(format!(
			"Unrecognised errcode: {}",
			value["errcode"]
		)));
	};
	if code == 0 {
		return Ok(value);
	}

	let message = value
		.get("errmsg")
		.and_then(Value::as_str)
		.unwrap_or_default()
		.to_string();
	warn!(code, %message, "Platform returned an error code");
	Err(ClientError::Api { code, message })
}
