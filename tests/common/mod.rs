//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use service_environment::config::ServerConfig;
use service_environment::json::JsonFactory;
use service_environment::observability::MetricsRegistry;
use service_environment::validator::NoopValidator;
use service_environment::{EnvironmentError, ServiceEnvironment, ServiceRuntime, Shutdown};

/// A runtime serving on ephemeral local ports.
pub struct RunningService {
    pub main: SocketAddr,
    pub admin: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), EnvironmentError>>,
}

impl RunningService {
    /// Trigger shutdown and wait for the runtime to return.
    pub async fn stop(self) -> Result<(), EnvironmentError> {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("runtime did not stop in time")
            .expect("runtime task panicked")
    }
}

pub fn environment(name: &str) -> ServiceEnvironment {
    ServiceEnvironment::new(
        name,
        JsonFactory::new(),
        Arc::new(NoopValidator),
        Arc::new(MetricsRegistry::detached()),
    )
    .unwrap()
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Start `env` on ephemeral ports and wait until the admin listener answers.
pub async fn start(env: ServiceEnvironment) -> RunningService {
    let main = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let admin = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let main_addr = main.local_addr().unwrap();
    let admin_addr = admin.local_addr().unwrap();

    let mut config = ServerConfig::default();
    config.shutdown_grace_secs = 2;

    let shutdown = Shutdown::new();
    let runtime_shutdown = shutdown.clone();
    let handle = tokio::spawn(async move {
        ServiceRuntime::new(env, config)
            .run(main, admin, &runtime_shutdown)
            .await
    });

    let client = client();
    for _ in 0..50 {
        if client
            .get(format!("http://{}/ping", admin_addr))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    RunningService {
        main: main_addr,
        admin: admin_addr,
        shutdown,
        handle,
    }
}
