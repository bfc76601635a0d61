// Copyright 2025 chenjjiaa
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

//! Canonical-parameter signing for the payment flows
//!
//! The remote verifier recomputes every signature, so the byte layout here is
//! protocol, not style:
//!
//! 1. pairs are sorted by key name, byte-wise
//! 2. joined as `k1=v1&k2=v2` with no URL-encoding
//! 3. hashed: SHA1 as lowercase hex, MD5 as uppercase hex
//!
//! The SHA1 scheme sorts `appkey=<secret>` in with the other pairs. The MD5
//! package scheme appends `&key=<secret>` after the sorted list.
//!
//! Canonicalization and hashing are separate functions so each stage can be
//! checked on its own.

use std::{collections::BTreeMap, fmt::Display};

use md5::Md5;
use rand::{Rng, distributions::Alphanumeric};
use sha1::{Digest, Sha1};
use url::form_urlencoded;

/// Length of generated nonces
pub const NONCE_LEN: usize = 32;

/// Error types for signing operations
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
	#[error("{0} is not configured")]
	MissingKey(&'static str),
}

/// Signature scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
	/// JS-SDK and native pay, `appkey` sorted in
	Sha1,
	/// Legacy order package, `key` appended last
	Md5,
}

impl SignatureAlgorithm {
	/// Name of the pair carrying the secret
	pub fn key_name(self) -> &'static str {
		match self {
			SignatureAlgorithm::Sha1 => "appkey",
			SignatureAlgorithm::Md5 => "key",
		}
	}

	/// Tag sent alongside the signature
	pub fn as_str(self) -> &'static str {
		match self {
			SignatureAlgorithm::Sha1 => "SHA1",
			SignatureAlgorithm::Md5 => "MD5",
		}
	}
}

/// Parameter set for one signing call, kept sorted by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignParams(BTreeMap<String, String>);

impl SignParams {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a value using its `Display` form (numbers render as decimal)
	pub fn insert(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
		self.0.insert(key.into(), value.to_string());
		self
	}

	pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
		self.insert(key, value);
		self
	}

	/// Insert only when the value is present
	pub fn with_opt<V: Display>(self, key: impl Into<String>, value: Option<V>) -> Self {
		match value {
			Some(value) => self.with(key, value),
			None => self,
		}
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Pairs in canonical order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// `k1=v1&k2=v2` over the current pairs
	pub fn canonical(&self) -> String {
		canonicalize(self.iter())
	}

	pub fn into_json(self) -> serde_json::Map<String, serde_json::Value> {
		self.0
			.into_iter()
			.map(|(k, v)| (k, serde_json::Value::String(v)))
			.collect()
	}
}

/// Signature value and the scheme that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
	pub value: String,
	pub algorithm: SignatureAlgorithm,
}

/// Sort pairs by key and join them as `k=v` with `&`
///
/// Keys are compared byte-wise. Values are emitted verbatim.
pub fn canonicalize<'a, I>(pairs: I) -> String
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let mut pairs: Vec<(&str, &str)> = pairs.into_iter().collect();
	pairs.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
	pairs
		.iter()
		.map(|(k, v)| format!("{}={}", k, v))
		.collect::<Vec<_>>()
		.join("&")
}

/// Hash a canonical string with the scheme's case convention
pub fn digest(canonical: &str, algorithm: SignatureAlgorithm) -> String {
	match algorithm {
		SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(canonical.as_bytes())),
		SignatureAlgorithm::Md5 => hex::encode_upper(Md5::digest(canonical.as_bytes())),
	}
}

/// Build the exact string that gets hashed for `params` and `secret`
pub fn string_to_sign(params: &SignParams, secret: &str, algorithm: SignatureAlgorithm) -> String {
	let key_name = algorithm.key_name();
	match algorithm {
		SignatureAlgorithm::Sha1 => {
			canonicalize(params.iter().chain(std::iter::once((key_name, secret))))
		}
		SignatureAlgorithm::Md5 if params.is_empty() => format!("{}={}", key_name, secret),
		SignatureAlgorithm::Md5 => format!("{}&{}={}", params.canonical(), key_name, secret),
	}
}

/// Sign a parameter set
///
/// An empty secret is refused rather than producing a signature the remote
/// side will reject.
pub fn sign(
	params: &SignParams,
	secret: &str,
	algorithm: SignatureAlgorithm,
) -> Result<Signature, SigningError> {
	if secret.is_empty() {
		return Err(SigningError::MissingKey("signing secret"));
	}

	Ok(Signature {
		value: digest(&string_to_sign(params, secret, algorithm), algorithm),
		algorithm,
	})
}

/// Random alphanumeric nonce
pub fn nonce() -> String {
	rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(NONCE_LEN)
		.map(char::from)
		.collect()
}

/// `application/x-www-form-urlencoded` serialization, order preserved
pub fn form_urlencode<'a, I>(pairs: I) -> String
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	form_urlencoded::Serializer::new(String::new())
		.extend_pairs(pairs)
		.finish()
}
