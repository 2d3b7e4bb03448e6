/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

/// Install a subscriber scoped to the calling test thread.
///
/// Records are written through the test writer so they are captured per test. The
/// `RUST_LOG` environment variable is respected; the default level is `debug` so metric
/// entry points are visible when a test fails.
pub fn init_test_subscriber() -> tracing::subscriber::DefaultGuard {
    let fmt_layer = fmt::layer().with_target(true).with_test_writer();

    let filter_layer = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .set_default()
}
