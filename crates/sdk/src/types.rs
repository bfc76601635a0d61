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

use serde::{Deserialize, Serialize};

use crate::signing::SignParams;

/// Default `bank_type` of a pay package
pub const DEFAULT_BANK_TYPE: &str = "WX";

/// Default `fee_type` of a pay package (RMB)
pub const DEFAULT_FEE_TYPE: &str = "1";

/// Default `input_charset` of a pay package
pub const DEFAULT_INPUT_CHARSET: &str = "UTF-8";

/// Media file kind accepted by the upload endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
	Image,
	Voice,
	Video,
	Thumb,
}

impl MediaType {
	pub fn as_str(self) -> &'static str {
		match self {
			MediaType::Image => "image",
			MediaType::Voice => "voice",
			MediaType::Video => "video",
			MediaType::Thumb => "thumb",
		}
	}
}

/// One entry of a news (article) message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
	pub title: String,
	pub description: String,
	pub url: String,
	/// Cover image URL
	#[serde(rename = "picurl")]
	pub pic_url: String,
}

/// Order fields of a legacy pay package
///
/// `partner` is injected from the client configuration. The three charset
/// and bank fields fall back to their defaults when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPackage {
	pub body: String,
	pub out_trade_no: String,
	/// Amount in fen
	pub total_fee: u64,
	pub notify_url: String,
	pub spbill_create_ip: String,
	pub attach: Option<String>,
	pub time_start: Option<String>,
	pub time_expire: Option<String>,
	pub transport_fee: Option<u64>,
	pub product_fee: Option<u64>,
	pub goods_tag: Option<String>,
	pub bank_type: Option<String>,
	pub fee_type: Option<String>,
	pub input_charset: Option<String>,
}

impl PayPackage {
	pub(crate) fn to_params(&self, partner: &str) -> SignParams {
		SignParams::new()
			.with("partner", partner)
			.with("body", &self.body)
			.with("out_trade_no", &self.out_trade_no)
			.with("total_fee", self.total_fee)
			.with("notify_url", &self.notify_url)
			.with("spbill_create_ip", &self.spbill_create_ip)
			.with_opt("attach", self.attach.as_deref())
			.with_opt("time_start", self.time_start.as_deref())
			.with_opt("time_expire", self.time_expire.as_deref())
			.with_opt("transport_fee", self.transport_fee)
			.with_opt("product_fee", self.product_fee)
			.with_opt("goods_tag", self.goods_tag.as_deref())
			.with("bank_type", self.bank_type.as_deref().unwrap_or(DEFAULT_BANK_TYPE))
			.with("fee_type", self.fee_type.as_deref().unwrap_or(DEFAULT_FEE_TYPE))
			.with(
				"input_charset",
				self.input_charset.as_deref().unwrap_or(DEFAULT_INPUT_CHARSET),
			)
	}
}

/// Shipment notification fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverNotify {
	pub openid: String,
	pub transid: String,
	pub out_trade_no: String,
	pub deliver_timestamp: i64,
	/// `1` delivered, `0` failed
	pub deliver_status: u8,
	pub deliver_msg: String,
}

impl DeliverNotify {
	pub(crate) fn to_params(&self) -> SignParams {
		SignParams::new()
			.with("openid", &self.openid)
			.with("transid", &self.transid)
			.with("out_trade_no", &self.out_trade_no)
			.with("deliver_timestamp", self.deliver_timestamp)
			.with("deliver_status", self.deliver_status)
			.with("deliver_msg", &self.deliver_msg)
	}
}

/// Arguments for the JS bridge `getBrandWCPayRequest` call
///
/// Field names follow the casing the JS SDK expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsPayParams {
	#[serde(rename = "appId")]
	pub app_id: String,
	#[serde(rename = "timeStamp")]
	pub time_stamp: String,
	#[serde(rename = "nonceStr")]
	pub nonce_str: String,
	pub package: String,
	#[serde(rename = "signType")]
	pub sign_type: String,
	#[serde(rename = "paySign")]
	pub pay_sign: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_pay_package_defaults() {
		let package = PayPackage {
			body: "test".to_string(),
			out_trade_no: "T1".to_string(),
			total_fee: 1,
			notify_url: "http://example.com/notify".to_string(),
			spbill_create_ip: "127.0.0.1".to_string(),
			..Default::default()
		};
		let params = package.to_params("1900000109");
		assert_eq!(params.get("partner"), Some("1900000109"));
		assert_eq!(params.get("bank_type"), Some(DEFAULT_BANK_TYPE));
		assert_eq!(params.get("fee_type"), Some(DEFAULT_FEE_TYPE));
		assert_eq!(params.get("input_charset"), Some(DEFAULT_INPUT_CHARSET));
		assert_eq!(params.get("attach"), None);
		assert_eq!(params.len(), 9);
	}

	#[test]
	fn test_pay_package_overrides() {
		let package = PayPackage {
			fee_type: Some("2".to_string()),
			transport_fee: Some(5),
			..Default::default()
		};
		let params = package.to_params("p");
		assert_eq!(params.get("fee_type"), Some("2"));
		assert_eq!(params.get("transport_fee"), Some("5"));
	}

	#[test]
	fn test_js_pay_params_casing() {
		let params = JsPayParams {
			app_id: "wx1".to_string(),
			time_stamp: "1000".to_string(),
			nonce_str: "abc".to_string(),
			package: "p".to_string(),
			sign_type: "SHA1".to_string(),
			pay_sign: "s".to_string(),
		};
		let value = serde_json::to_value(&params).unwrap();
		for key in ["appId", "timeStamp", "nonceStr", "package", "signType", "paySign"] {
			assert!(value.get(key).is_some(), "missing {key}");
		}
		assert!(value.get("appid").is_none());
	}

	#[test]
	fn test_article_serializes_picurl() {
		let article = Article {
			title: "t".to_string(),
			description: "d".to_string(),
			url: "u".to_string(),
			pic_url: "p".to_string(),
		};
		assert_eq!(serde_json::to_value(&article).unwrap()["picurl"], "p");
	}
}
