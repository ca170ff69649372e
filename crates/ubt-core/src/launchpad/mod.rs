// SPDX-License-Identifier: Apache-2.0

//! Launchpad integration module.
//!
//! Provides OAuth credentials, the token dance and the web service client.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

pub mod auth;
pub mod client;
pub(crate) mod types;

pub use auth::{Credentials, RequestToken, TokenDance};
pub use client::LaunchpadClient;

/// Characters left unescaped in URL path segments and OAuth parameters
/// (RFC 3986 unreserved set).
pub(crate) const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
