#![allow(dead_code)]

use std::sync::Once;

use polynomial::expr::Expr;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from tests/common");

    // RUST_LOG wins over the default
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {e}");
        });
    }
}

pub fn x() -> Expr { Expr::var() }

pub fn int(value: i64) -> Expr { Expr::int(value) }

/// 4 + 3 + X + 1 * ( X * X + 1 )
pub fn original_polynomial() -> Expr {
    Expr::add(
        Expr::add(int(4), int(3)),
        Expr::add(x(), Expr::mul(int(1), Expr::add(Expr::mul(x(), x()), int(1)))),
    )
}
