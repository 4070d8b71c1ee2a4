use log::{error, info};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::client::handle_client;
use crate::error::ServerError;
use crate::protocol::{CommandTable, Dispatcher};
use crate::server::config::ServerConfig;
use crate::transfer::TransferSettings;

/// Read-only state shared by every session.
pub struct ServerContext {
    pub config: ServerConfig,
    /// Canonical jail root.
    pub root: PathBuf,
    pub dispatcher: Dispatcher,
}

impl ServerContext {
    /// Builds the command table once; `root` must already be canonical.
    pub fn new(config: ServerConfig, root: PathBuf) -> Self {
        let table = CommandTable::new(!config.auth_disabled);
        let dispatcher = Dispatcher::new(table, TransferSettings::from(&config));
        Self {
            config,
            root,
            dispatcher,
        }
    }
}

pub struct Server {
    listener: TcpListener,
    context: Arc<ServerContext>,
}

impl Server {
    /// Prepares the server root and binds the control listener.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let root = config.prepare_root()?;
        let addr = config.control_socket();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Bind(addr.clone(), e))?;

        info!("Server bound to {}", addr);
        info!("Server root directory: {}", root.display());
        if config.auth_disabled {
            info!("Authentication is disabled");
        }

        Ok(Self {
            listener,
            context: Arc::new(ServerContext::new(config, root)),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, serving each on its own task.
    pub async fn start(&self) {
        match self.local_addr() {
            Ok(addr) => info!("Starting FTP server on {}", addr),
            Err(e) => error!("Starting FTP server on unknown address: {}", e),
        }

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let context = Arc::clone(&self.context);
                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        handle_client(stream, addr, context).await;
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}
