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

//! Access token lifecycle
//!
//! One cached [`Credential`] per client. Refresh is lazy: the first caller
//! that finds the token expired, or within [`TOKEN_EXPIRY_SKEW_SECS`] of
//! expiry, fetches a new one. There is no background timer.
//!
//! The cache sits behind an async mutex that stays locked across the refresh
//! call, so concurrent callers queue behind a single in-flight refresh and
//! then read its result. A failed refresh is handed to every caller that was
//! already queued behind it; only callers arriving afterwards try again.

use std::{
	fmt,
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
	clock::Clock,
	config::ClientConfig,
	error::{ClientError, check_error},
	transport::{HttpRequest, Method, Transport},
};

/// A token is only handed out while it has more than this many seconds left
pub const TOKEN_EXPIRY_SKEW_SECS: i64 = 60;

/// Path of the token issuance endpoint
pub const TOKEN_PATH: &str = "/cgi-bin/token";

/// Bearer token plus its absolute expiry (Unix seconds)
///
/// Token and expiry are only ever replaced together.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	token: String,
	expires_at: i64,
}

impl Credential {
	pub fn new(token: impl Into<String>, expires_at: i64) -> Self {
		Self {
			token: token.into(),
			expires_at,
		}
	}

	pub fn token(&self) -> &str {
		&self.token
	}

	pub fn expires_at(&self) -> i64 {
		self.expires_at
	}

	pub fn is_valid(&self, now: i64) -> bool {
		self.expires_at - now > TOKEN_EXPIRY_SKEW_SECS
	}
}

impl fmt::Debug for Credential {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credential")
			.field("token", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[derive(Deserialize)]
struct TokenResponse {
	access_token: String,
	expires_in: i64,
}

#[derive(Default)]
struct TokenState {
	credential: Option<Credential>,
	/// Error of the most recent refresh and the attempt number it ended
	failure: Option<(u64, ClientError)>,
}

/// Caches the access token and refreshes it on demand
pub struct TokenManager {
	appid: String,
	secret: String,
	token_url: String,
	transport: Arc<dyn Transport>,
	clock: Arc<dyn Clock>,
	state: Mutex<TokenState>,
	/// Completed refresh attempts; only advanced while `state` is locked
	attempts: AtomicU64,
}

impl TokenManager {
	pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>, clock: Arc<dyn Clock>) -> Self {
		Self {
			appid: config.appid.clone(),
			secret: config.appsecret.clone(),
			token_url: config.api_url(TOKEN_PATH),
			transport,
			clock,
			state: Mutex::new(TokenState::default()),
			attempts: AtomicU64::new(0),
		}
	}

	/// Return a token with more than the skew margin left, refreshing if needed
	///
	/// # Errors
	/// [`ClientError::Credential`] wrapping the transport, decode or platform
	/// error of the refresh call.
	pub async fn get_token(&self) -> Result<String, ClientError> {
		let arrived_after = self.attempts.load(Ordering::SeqCst);
		let mut state = self.state.lock().await;

		if let Some(credential) = state.credential.as_ref()
			&& credential.is_valid(self.clock.now())
		{
			debug!(expires_at = credential.expires_at, "Access token cache hit");
			return Ok(credential.token.clone());
		}

		// A refresh finished (and failed) while this caller was queued
		if let Some((attempt, err)) = state.failure.as_ref()
			&& *attempt > arrived_after
		{
			debug!(attempt = *attempt, "Sharing failed access token refresh");
			return Err(ClientError::Credential(Box::new(err.clone())));
		}

		let result = self.grant_token().await;
		let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
		match result {
			Ok(credential) => {
				let token = credential.token.clone();
				state.credential = Some(credential);
				state.failure = None;
				Ok(token)
			}
			Err(err) => {
				state.failure = Some((attempt, err.clone()));
				Err(ClientError::Credential(Box::new(err)))
			}
		}
	}

	/// Drop the cached credential so the next caller refreshes
	pub async fn invalidate(&self) {
		self.state.lock().await.credential = None;
		debug!("Access token invalidated");
	}

	/// Snapshot of the cached credential, without refreshing
	pub async fn credential(&self) -> Option<Credential> {
		self.state.lock().await.credential.clone()
	}

	/// Seed the cache with a credential obtained elsewhere
	pub async fn set_credential(&self, credential: Credential) {
		let mut state = self.state.lock().await;
		state.credential = Some(credential);
		state.failure = None;
	}

	async fn grant_token(&self) -> Result<Credential, ClientError> {
		let request = HttpRequest::new(Method::Get, &self.token_url)
			.query("grant_type", "client_credential")
			.query("appid", &self.appid)
			.query("secret", &self.secret);

		let response = self.transport.send(request).await?.error_for_status()?;
		let value = check_error(response.json()?)?;
		let body: TokenResponse = serde_json::from_value(value)
			.map_err(|e| ClientError::Decode(format!("Invalid token response: {}", e)))?;

		let credential = Credential::new(body.access_token, self.clock.now() + body.expires_in);
		info!(
			appid = %self.appid,
			expires_at = credential.expires_at,
			"Access token refreshed"
		);

		Ok(credential)
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use serde_json::json;

	use super::*;
	use crate::testing::{ManualClock, MockTransport, json_response};

	const NOW: i64 = 1_700_000_000;

	fn manager(transport: Arc<MockTransport>, clock: Arc<ManualClock>) -> TokenManager {
		TokenManager::new(&ClientConfig::new("wx1", "appsecret"), transport, clock)
	}

	fn token_transport() -> Arc<MockTransport> {
		Arc::new(MockTransport::json(json!({"access_token": "fresh", "expires_in": 7200})))
	}

	#[tokio::test]
	async fn test_valid_token_served_from_cache() {
		let transport = token_transport();
		let clock = Arc::new(ManualClock::new(NOW));
		let manager = manager(transport.clone(), clock);
		manager.set_credential(Credential::new("cached", NOW + 3600)).await;

		assert_eq!(manager.get_token().await.unwrap(), "cached");
		assert_eq!(transport.call_count(), 0);
	}

	#[tokio::test]
	async fn test_token_inside_skew_is_refreshed_once() {
		let transport = token_transport();
		let clock = Arc::new(ManualClock::new(NOW));
		let manager = manager(transport.clone(), clock);
		manager.set_credential(Credential::new("stale", NOW + 30)).await;

		assert_eq!(manager.get_token().await.unwrap(), "fresh");
		assert_eq!(manager.get_token().await.unwrap(), "fresh");
		assert_eq!(transport.call_count(), 1);

		let requests = transport.requests();
		let request = &requests[0];
		assert_eq!(request.method, Method::Get);
		assert!(request.url.ends_with(TOKEN_PATH));
		assert_eq!(request.query_param("grant_type"), Some("client_credential"));
		assert_eq!(request.query_param("appid"), Some("wx1"));
		assert_eq!(request.query_param("secret"), Some("appsecret"));
	}

	#[test]
	fn test_skew_boundary() {
		let credential = Credential::new("t", NOW + TOKEN_EXPIRY_SKEW_SECS);
		assert!(!credential.is_valid(NOW));
		assert!(credential.is_valid(NOW - 1));
	}

	#[tokio::test]
	async fn test_refresh_replaces_token_and_expiry_together() {
		let transport = token_transport();
		let clock = Arc::new(ManualClock::new(NOW));
		let manager = manager(transport.clone(), clock.clone());

		manager.get_token().await.unwrap();
		let credential = manager.credential().await.unwrap();
		assert_eq!(credential.token(), "fresh");
		assert_eq!(credential.expires_at(), NOW + 7200);

		// Still valid 61s before expiry, refreshed at 60s
		clock.set(NOW + 7200 - 61);
		manager.get_token().await.unwrap();
		assert_eq!(transport.call_count(), 1);
		clock.set(NOW + 7200 - 60);
		manager.get_token().await.unwrap();
		assert_eq!(transport.call_count(), 2);
		assert_eq!(
			manager.credential().await.unwrap().expires_at(),
			NOW + 7200 - 60 + 7200
		);
	}

	#[tokio::test]
	async fn test_invalidate_forces_refresh() {
		let transport = token_transport();
		let manager = manager(transport.clone(), Arc::new(ManualClock::new(NOW)));
		manager.set_credential(Credential::new("cached", NOW + 3600)).await;

		manager.invalidate().await;
		assert!(manager.credential().await.is_none());
		assert_eq!(manager.get_token().await.unwrap(), "fresh");
		assert_eq!(transport.call_count(), 1);
	}

	#[tokio::test]
	async fn test_platform_error_becomes_credential_error() {
		let transport = Arc::new(MockTransport::json(
			json!({"errcode": 40013, "errmsg": "invalid appid"}),
		));
		let manager = manager(transport, Arc::new(ManualClock::new(NOW)));

		let err = manager.get_token().await.unwrap_err();
		assert!(matches!(err, ClientError::Credential(_)));
		assert_eq!(err.api_code(), Some(40013));
		assert!(manager.credential().await.is_none());
	}

	#[tokio::test]
	async fn test_transport_failure_becomes_credential_error() {
		let transport = Arc::new(MockTransport::status(500, "oops"));
		let manager = manager(transport, Arc::new(ManualClock::new(NOW)));

		match manager.get_token().await.unwrap_err() {
			ClientError::Credential(inner) => {
				assert!(matches!(*inner, ClientError::Transport { status: Some(500), .. }))
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[tokio::test]
	async fn test_malformed_token_response_is_decode_error() {
		let transport = Arc::new(MockTransport::json(json!({"access_token": "x"})));
		let manager = manager(transport, Arc::new(ManualClock::new(NOW)));

		match manager.get_token().await.unwrap_err() {
			ClientError::Credential(inner) => assert!(matches!(*inner, ClientError::Decode(_))),
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn test_concurrent_callers_share_one_refresh() {
		let transport = Arc::new(
			MockTransport::json(json!({"access_token": "shared", "expires_in": 7200}))
				.with_delay(Duration::from_millis(50)),
		);
		let manager = Arc::new(manager(transport.clone(), Arc::new(ManualClock::new(NOW))));

		let handles: Vec<_> = (0..8)
			.map(|_| {
				let manager = manager.clone();
				tokio::spawn(async move { manager.get_token().await })
			})
			.collect();

		for handle in handles {
			assert_eq!(handle.await.unwrap().unwrap(), "shared");
		}
		assert_eq!(transport.call_count(), 1);
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn test_concurrent_callers_share_one_failed_refresh() {
		let transport = Arc::new(
			MockTransport::json(json!({"errcode": 40125, "errmsg": "invalid appsecret"}))
				.with_delay(Duration::from_millis(50)),
		);
		let manager = Arc::new(manager(transport.clone(), Arc::new(ManualClock::new(NOW))));

		let handles: Vec<_> = (0..8)
			.map(|_| {
				let manager = manager.clone();
				tokio::spawn(async move { manager.get_token().await })
			})
			.collect();

		for handle in handles {
			let err = handle.await.unwrap().unwrap_err();
			assert!(matches!(err, ClientError::Credential(_)));
			assert_eq!(err.api_code(), Some(40125));
		}
		assert_eq!(transport.call_count(), 1);

		// a caller arriving after the failure tries again
		assert!(manager.get_token().await.is_err());
		assert_eq!(transport.call_count(), 2);
	}

	#[tokio::test]
	async fn test_recovers_after_failed_refresh() {
		let failing = Arc::new(std::sync::atomic::AtomicBool::new(true));
		let flag = failing.clone();
		let transport = Arc::new(MockTransport::new(move |_| {
			if flag.load(Ordering::SeqCst) {
				json_response(&json!({"errcode": -1, "errmsg": "system busy"}))
			} else {
				json_response(&json!({"access_token": "fresh", "expires_in": 7200}))
			}
		}));
		let manager = manager(transport.clone(), Arc::new(ManualClock::new(NOW)));

		assert_eq!(manager.get_token().await.unwrap_err().api_code(), Some(-1));
		failing.store(false, Ordering::SeqCst);
		assert_eq!(manager.get_token().await.unwrap(), "fresh");
		assert_eq!(transport.call_count(), 2);
	}

	#[test]
	fn test_credential_debug_redacts_token() {
		let rendered = format!("{:?}", Credential::new("supersecret", 1));
		assert!(!rendered.contains("supersecret"));
	}
}
