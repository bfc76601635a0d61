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

//! wemp SDK - Client library for the WeChat MP platform API
//!
//! This crate provides an authenticated client for the MP REST endpoints,
//! a cached access-token manager, and the request signing used by the
//! legacy pay interfaces.
//!
//! The SDK is designed to be embeddable:
//! - No background threads; tokens refresh lazily on use
//! - HTTP and the clock sit behind traits so tests can replace them
//! - Configuration can come from code, environment or a file

pub mod api;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod pay;
pub mod signing;
pub mod token;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::{Client, Payload, RequestOptions, SyncClient};
pub use clock::{Clock, SystemClock};
pub use config::ClientConfig;
pub use error::{ClientError, check_error};
pub use signing::{Signature, SignatureAlgorithm, SignParams, canonicalize, digest, sign};
pub use token::{Credential, TokenManager};
pub use transport::{HttpRequest, HttpResponse, Method, RequestBody, ReqwestTransport, Transport};
pub use types::*;
