//! loadpulse service binary.
//!
//! Boots tracing, loads the YAML config, spawns the traffic simulator, and
//! serves the instrumented app.

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use loadpulse_service::{app_state::AppState, config, router, sim};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "loadpulse.yaml".to_string());
    let cfg = config::load_from_file(&path).expect("config load failed");

    let listen: SocketAddr = cfg
        .service
        .listen
        .parse()
        .expect("service.listen must be a valid SocketAddr");

    // The sender lives for the process; the simulator stops with it.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    if cfg.simulator.enabled {
        let simulator = sim::Simulator::from_config(&cfg.simulator).expect("simulator build failed");
        tokio::spawn(simulator.run(shutdown_rx));
    }

    let state = AppState::new(cfg);
    let app = router::build_router(state);

    tracing::info!(%listen, "loadpulse-service starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");

    let _ = shutdown_tx.send(true);
}
