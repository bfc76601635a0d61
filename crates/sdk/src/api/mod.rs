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

//! Endpoint wrappers
//!
//! Each wrapper only assembles query parameters or a JSON body and goes
//! through [`Client::request`](crate::Client::request).

mod group;
mod media;
mod menu;
mod message;
mod qrcode;
mod user;

pub use message::MAX_ARTICLES;
pub use user::DEFAULT_LANG;
