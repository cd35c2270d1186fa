use std::{fs::OpenOptions, net::SocketAddr, process::ExitCode, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use transaction_board::{
    AppState, BoardConfig, ChartTheme, DEFAULT_MAX_SESSIONS, HttpTransactionApi, MonthFilter,
    PageSize, build_router, graceful_shutdown, logging_middleware, register_chart_theme,
};

/// The web server for the transaction board.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the transaction API, e.g. "http://localhost:5000".
    #[arg(long, env = "TRANSACTION_API_URL")]
    api_url: String,

    /// The port to serve the board from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// The month selected when the board opens, "01" to "12" or "all".
    #[arg(long, default_value = "03")]
    month: MonthFilter,

    /// The number of rows per page when the board opens: 10, 20 or 30.
    #[arg(long, default_value_t = 10)]
    per_page: u64,

    /// The longest a request waits for the transaction API before rendering, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    render_wait_ms: u64,

    /// The most browser sessions kept in memory, each with its own board.
    #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS)]
    max_sessions: usize,

    /// The chart colour scheme: auto, light or dark.
    #[arg(long, default_value = "auto")]
    chart_theme: ChartTheme,

    /// File path to write debug logs to.
    #[arg(long, default_value = "debug.log")]
    log_path: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    setup_logging(&args.log_path);

    let initial_page_size = match PageSize::try_from(args.per_page) {
        Ok(page_size) => page_size,
        Err(error) => {
            tracing::error!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let api = match HttpTransactionApi::new(&args.api_url) {
        Ok(api) => api,
        Err(error) => {
            tracing::error!("{error}");
            return ExitCode::FAILURE;
        }
    };

    register_chart_theme(args.chart_theme);

    let config = BoardConfig {
        api_url: args.api_url,
        initial_month: args.month,
        initial_page_size,
        render_wait: Duration::from_millis(args.render_wait_ms),
        max_sessions: args.max_sessions,
    };
    let state = AppState::new(api, &config);
    tracing::info!(
        "Serving boards for up to {} sessions from {}",
        config.max_sessions,
        config.api_url
    );

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging(log_path: &str) {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but the handlers
        // already log their errors.
        .on_failure(());

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(tracing_layer)
}
