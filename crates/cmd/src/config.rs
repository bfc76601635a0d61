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

use anyhow::{Context, Result};
use wemp_sdk::ClientConfig;

// Logging configuration constants
/// Default log level (can be overridden by RUST_LOG environment variable)
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log directory component name
pub const LOG_COMPONENT_NAME: &str = "wemp";

/// Default console output enabled (can be overridden by LOG_TO_CONSOLE environment variable)
pub const DEFAULT_LOG_TO_CONSOLE: bool = false;

/// Load client settings from `path` if given, otherwise from `WEMP_*` variables.
///
/// Environment variables override values in the file.
pub fn load_client_config(path: Option<&str>) -> Result<ClientConfig> {
	dotenv::dotenv().ok();

	let config = match path {
		Some(path) => ClientConfig::from_file(path)
			.with_context(|| format!("Failed to load config file: {}", path))?,
		None => ClientConfig::from_env()
			.context("Failed to load config from environment (WEMP_APPID, WEMP_APPSECRET)")?,
	};
	config.validate().context("Invalid client configuration")?;

	Ok(config)
}
