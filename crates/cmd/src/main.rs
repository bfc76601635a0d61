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

//! wemp - operator CLI for the WeChat MP API
//!
//! Loads client settings (config file or `WEMP_*` environment), then runs a
//! single SDK operation and prints its JSON result to stdout.

mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing::info;
use wemp_sdk::Client;

use crate::{config::load_client_config, logging::init_logging};

#[derive(Debug, Parser)]
#[command(name = "wemp", version, about = "WeChat MP API client")]
struct Cli {
	/// Config file (toml, yaml or json); environment only when omitted
	#[arg(long, global = true)]
	config: Option<String>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Fetch (or reuse) an access token and print it with its expiry
	Token,
	/// Print the current custom menu
	Menu,
	/// Send a text customer-service message
	SendText {
		/// Recipient openid
		#[arg(long)]
		to: String,
		#[arg(long)]
		content: String,
	},
	/// Build a native pay URL for a product
	NativePayUrl {
		#[arg(long)]
		product_id: String,
	},
	/// Query a pay order by merchant trade number
	OrderQuery {
		#[arg(long)]
		out_trade_no: String,
	},
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	init_logging()?;

	let config = load_client_config(cli.config.as_deref())?;
	info!(target: "wemp", "Using appid {}", config.appid);

	let client = Client::new(config).context("Failed to create client")?;
	let output = run(&client, cli.command).await?;

	println!(
		"{}",
		serde_json::to_string_pretty(&output).context("Failed to encode output")?
	);

	Ok(())
}

async fn run(client: &Client, command: Command) -> Result<Value> {
	let output = match command {
		Command::Token => {
			let token = client
				.access_token()
				.await
				.context("Failed to obtain access token")?;
			let expires_at = client
				.token_manager()
				.credential()
				.await
				.map(|c| c.expires_at());
			json!({"access_token": token, "expires_at": expires_at})
		}
		Command::Menu => client.get_menu().await.context("Failed to fetch menu")?,
		Command::SendText { to, content } => client
			.send_text_message(&to, &content)
			.await
			.with_context(|| format!("Failed to send message to {}", to))?,
		Command::NativePayUrl { product_id } => {
			let url = client
				.create_native_pay_url(&product_id)
				.context("Failed to build native pay url")?;
			json!({"url": url})
		}
		Command::OrderQuery { out_trade_no } => client
			.pay_order_query(&out_trade_no)
			.await
			.with_context(|| format!("Failed to query order {}", out_trade_no))?,
	};

	Ok(output)
}
