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

//! Legacy payment flows
//!
//! Two schemes coexist:
//! - SHA1 with `appkey` (JS-SDK params, native pay URL, delivery notify,
//!   order query) keyed by `pay_sign_key`
//! - MD5 with `key` (order package) keyed by `pay_partner_key`
//!
//! Every operation resolves the keys it needs before doing anything else, so
//! a missing setting fails with `Configuration` ahead of any network call.

use std::iter;

use serde_json::Value;

use crate::{
	client::{Client, RequestOptions},
	error::ClientError,
	signing::{self, SignParams, Signature, SignatureAlgorithm},
	types::{DeliverNotify, JsPayParams, PayPackage},
};

/// Scheme and host of native pay QR code URLs
pub const NATIVE_PAY_BASE_URL: &str = "weixin://wxpay/bizpayurl?";

/// `sign_method` value sent with `app_signature`
pub const APP_SIGNATURE_METHOD: &str = "sha1";

impl Client {
	/// Build the signed, URL-encoded order package
	///
	/// Fields are sorted, MD5-signed with `pay_partner_key` and serialized
	/// as a query string with `sign` last.
	pub fn create_js_pay_package(&self, package: &PayPackage) -> Result<String, ClientError> {
		let partner_id = self.config.pay_partner_id()?;
		let partner_key = self.config.pay_partner_key()?;

		let params = package.to_params(partner_id);
		let signature = signing::sign(&params, partner_key, SignatureAlgorithm::Md5)?;

		Ok(signing::form_urlencode(
			params
				.iter()
				.chain(iter::once(("sign", signature.value.as_str()))),
		))
	}

	/// Build the object handed to the JS bridge to start a payment
	pub fn create_js_pay_params(&self, package: &PayPackage) -> Result<JsPayParams, ClientError> {
		self.config.pay_sign_key()?;
		let package = self.create_js_pay_package(package)?;
		let nonce = signing::nonce();
		let timestamp = self.clock.now();

		let params = SignParams::new()
			.with("package", &package)
			.with("noncestr", &nonce)
			.with("timestamp", timestamp);
		let (_, signature) = self.sign_with_app_key(params)?;

		// Same values, re-cased for the JS SDK; not re-signed
		Ok(JsPayParams {
			app_id: self.config.appid.clone(),
			time_stamp: timestamp.to_string(),
			nonce_str: nonce,
			package,
			sign_type: signature.algorithm.as_str().to_string(),
			pay_sign: signature.value,
		})
	}

	/// Build the `weixin://wxpay/bizpayurl` link for a product
	pub fn create_native_pay_url(&self, product_id: &str) -> Result<String, ClientError> {
		let params = SignParams::new()
			.with("productid", product_id)
			.with("noncestr", signing::nonce())
			.with("timestamp", self.clock.now());
		let (params, signature) = self.sign_with_app_key(params)?;

		let query = signing::form_urlencode(
			params
				.iter()
				.chain(iter::once(("sign", signature.value.as_str()))),
		);
		Ok(format!("{}{}", NATIVE_PAY_BASE_URL, query))
	}

	/// Report shipment of an order
	pub async fn pay_deliver_notify(&self, notify: &DeliverNotify) -> Result<Value, ClientError> {
		let (params, signature) = self.sign_with_app_key(notify.to_params())?;

		self.post(
			&self.config.api_url("/pay/delivernotify"),
			RequestOptions::new().json(app_signed_body(params, signature)),
		)
		.await
	}

	/// Query the state of an order
	///
	/// The inner package is explicitly sorted, MD5-signed and joined without
	/// URL-encoding; the outer request is SHA1-signed.
	pub async fn pay_order_query(&self, out_trade_no: &str) -> Result<Value, ClientError> {
		self.config.pay_sign_key()?;
		let partner_id = self.config.pay_partner_id()?;
		let partner_key = self.config.pay_partner_key()?;

		let package_params = SignParams::new()
			.with("out_trade_no", out_trade_no)
			.with("partner", partner_id);
		let package_sign = signing::sign(&package_params, partner_key, SignatureAlgorithm::Md5)?;
		let package = format!("{}&sign={}", package_params.canonical(), package_sign.value);

		let params = SignParams::new()
			.with("package", package)
			.with("timestamp", self.clock.now());
		let (params, signature) = self.sign_with_app_key(params)?;

		self.post(
			&self.config.api_url("/pay/orderquery"),
			RequestOptions::new().json(app_signed_body(params, signature)),
		)
		.await
	}

	/// Inject `appid` and sign with the SHA1 `appkey` scheme
	fn sign_with_app_key(&self, mut params: SignParams) -> Result<(SignParams, Signature), ClientError> {
		let key = self.config.pay_sign_key()?;
		params.insert("appid", &self.config.appid);
		let signature = signing::sign(&params, key, SignatureAlgorithm::Sha1)?;
		Ok((params, signature))
	}
}

fn app_signed_body(params: SignParams, signature: Signature) -> Value {
	let mut body = params.into_json();
	body.insert("app_signature".to_string(), Value::String(signature.value));
	body.insert(
		"sign_method".to_string(),
		Value::String(APP_SIGNATURE_METHOD.to_string()),
	);
	Value::Object(body)
}
