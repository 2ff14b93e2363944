//! Running the mock provider next to a blocking consumer test.
//!
//! # Design
//! The consumer under test is synchronous, so the server gets its own thread
//! with a current-thread tokio runtime. The test thread keeps a `Ledger`
//! handle to verify and write the pact once its calls are done. Dropping the
//! `RunningProvider` shuts the server down.

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::error::{PactError, VerificationError};
use crate::interaction::Interaction;
use crate::pact::PactFile;
use crate::server::{app, Ledger, RecordedRequest};

/// Interactions registered between one consumer and one provider.
#[derive(Debug, Clone)]
pub struct MockProvider {
    consumer: String,
    provider: String,
    interactions: Vec<Interaction>,
}

impl MockProvider {
    pub fn new(consumer: &str, provider: &str) -> Self {
        Self {
            consumer: consumer.to_string(),
            provider: provider.to_string(),
            interactions: Vec::new(),
        }
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interactions.push(interaction);
        self
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Serve the registered interactions on a free loopback port.
    pub fn start(self) -> io::Result<RunningProvider> {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = std_listener.local_addr()?;
        std_listener.set_nonblocking(true)?;

        let ledger = Ledger::new(self.interactions);
        let server_ledger = ledger.clone();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("mock-provider".to_string())
            .spawn(move || -> io::Result<()> {
                let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
                rt.block_on(async move {
                    let listener = tokio::net::TcpListener::from_std(std_listener)?;
                    axum::serve(listener, app(server_ledger))
                        .with_graceful_shutdown(async {
                            // A dropped sender also means stop.
                            let _ = shutdown_rx.await;
                        })
                        .await
                })
            })?;

        info!(%addr, consumer = %self.consumer, provider = %self.provider, "mock provider started");
        Ok(RunningProvider {
            consumer: self.consumer,
            provider: self.provider,
            addr,
            ledger,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }
}

/// A mock provider serving on a background thread.
#[derive(Debug)]
pub struct RunningProvider {
    consumer: String,
    provider: String,
    addr: SocketAddr,
    ledger: Ledger,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<io::Result<()>>>,
}

impl RunningProvider {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://127.0.0.1:{port}`, ready to hand to a consumer.
    pub fn base_uri(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn verify(&self) -> Result<(), VerificationError> {
        self.ledger.verify()
    }

    pub fn unexpected_requests(&self) -> Vec<RecordedRequest> {
        self.ledger.unexpected_requests()
    }

    pub fn pact(&self) -> PactFile {
        PactFile::new(&self.consumer, &self.provider, &self.ledger.interactions())
    }

    /// Write `{consumer}-{provider}.json` into `dir`.
    pub fn write_pact(&self, dir: &Path) -> Result<PathBuf, PactError> {
        self.pact().write_to(dir)
    }

    /// Stop the server and wait for its thread.
    pub fn stop(mut self) -> io::Result<()> {
        self.shutdown_and_join()
    }

    fn shutdown_and_join(&mut self) -> io::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| io::Error::other("mock provider thread panicked"))?,
            None => Ok(()),
        }
    }
}

impl Drop for RunningProvider {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown_and_join() {
            warn!(error = %e, "mock provider did not shut down cleanly");
        }
    }
}
