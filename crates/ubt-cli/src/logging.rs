// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the ubuntu-bug-triage CLI.
//!
//! Uses `tracing` with `tracing-subscriber` for structured logging to stderr.
//! Log level can be controlled via the `RUST_LOG` environment variable; the
//! `--debug` flag is a shortcut for debug-level output from this tool.
//!
//! # Examples
//!
//! ```bash
//! # Default: warnings only
//! ubuntu-bug-triage cloud-init
//!
//! # Debug output for troubleshooting
//! ubuntu-bug-triage --debug cloud-init
//! RUST_LOG=ubt_core=debug ubuntu-bug-triage cloud-init
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "ubuntu_bug_triage=warn,ubt_core=warn,reqwest=error";

/// Filter used for `--debug`.
const DEBUG_FILTER: &str = "ubuntu_bug_triage=debug,ubt_core=debug,reqwest=warn";

/// Returns the filter directives for the given flags.
fn default_directives(debug: bool) -> &'static str {
    if debug { DEBUG_FILTER } else { DEFAULT_FILTER }
}

/// Initialize the logging subsystem.
///
/// `RUST_LOG` wins over `--debug` when both are given.
pub fn init_logging(debug: bool) {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(debug)))
        .expect("valid default filter directives");

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
