//! Descarga y caché de fotos
//!
//! - URL vacía → `Missing` inmediatamente, sin caché ni descarga
//! - URL en caché → `Ready` inmediatamente, sin red
//! - URL que ya falló → `Missing`, sin reintentar
//! - Resto → `Loading`; la descarga corre en una tarea de tokio con tiempo
//!   límite y el resultado vuelve por un canal
//!
//! Solo el hilo de control llama a `drain` / `wait_next`, así que la caché y
//! el estado de la sesión nunca se modifican desde las tareas.

use image::imageops::FilterType;
use image::RgbaImage;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{mpsc, Arc};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;

const USER_AGENT: &str = concat!("player-review/", env!("CARGO_PKG_VERSION"));

/// Foto decodificada y redimensionada
pub type Photo = RgbaImage;

/// Errores de descarga; nunca salen de este módulo como error de sesión
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Error de red: {0}")]
    Network(String),

    #[error("Error al decodificar: {0}")]
    Decode(String),

    #[error("Tiempo de espera agotado ({0:?})")]
    Timeout(Duration),
}

/// Origen de los bytes de una foto
pub trait PhotoSource: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Descarga por HTTP(S)
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

impl PhotoSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::debug!(url = %url, "descargando foto");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!("HTTP {}", status.as_u16())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Estado de la foto de un registro
#[derive(Debug, Clone)]
pub enum PhotoState {
    /// Sin foto (sin URL, o la descarga falló)
    Missing,
    Loading,
    Ready(Arc<Photo>),
}

impl PhotoState {
    pub fn is_ready(&self) -> bool {
        matches!(self, PhotoState::Ready(_))
    }
}

/// Resultado entregado al hilo de control
#[derive(Debug, Clone)]
pub struct Delivery {
    pub url: String,
    pub state: PhotoState,
}

type FetchMessage = (String, Result<Photo, FetchError>);

pub struct PhotoFetcher<S: PhotoSource> {
    source: Arc<S>,
    runtime: Handle,
    timeout: Duration,
    size: u32,
    cache: HashMap<String, Arc<Photo>>,
    failed: HashSet<String>,
    in_flight: HashSet<String>,
    tx: mpsc::Sender<FetchMessage>,
    rx: mpsc::Receiver<FetchMessage>,
}

impl<S: PhotoSource> PhotoFetcher<S> {
    pub fn new(source: S, runtime: Handle, timeout: Duration, size: u32) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source: Arc::new(source),
            runtime,
            timeout,
            size: size.max(1),
            cache: HashMap::new(),
            failed: HashSet::new(),
            in_flight: HashSet::new(),
            tx,
            rx,
        }
    }

    /// Pide la foto de `url` sin bloquear
    pub fn request(&mut self, url: Option<&str>) -> PhotoState {
        let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            return PhotoState::Missing;
        };

        if let Some(photo) = self.cache.get(url) {
            return PhotoState::Ready(Arc::clone(photo));
        }
        if self.failed.contains(url) {
            return PhotoState::Missing;
        }

        // ya en curso: no se lanza otra descarga
        if self.in_flight.insert(url.to_string()) {
            self.spawn_fetch(url.to_string());
        }
        PhotoState::Loading
    }

    fn spawn_fetch(&self, url: String) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let timeout = self.timeout;
        let size = self.size;

        self.runtime.spawn(async move {
            let result = match tokio::time::timeout(timeout, source.fetch(&url)).await {
                Ok(Ok(bytes)) => tokio::task::spawn_blocking(move || decode(&bytes, size))
                    .await
                    .unwrap_or_else(|e| Err(FetchError::Decode(e.to_string()))),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(FetchError::Timeout(timeout)),
            };
            // el receptor ya no existe al cerrar la aplicación
            let _ = tx.send((url, result));
        });
    }

    /// Aplica todos los resultados disponibles sin esperar
    pub fn drain(&mut self) -> Vec<Delivery> {
        let mut deliveries = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            deliveries.push(self.apply(message));
        }
        deliveries
    }

    /// Espera como máximo `timeout` al siguiente resultado
    pub fn wait_next(&mut self, timeout: Duration) -> Option<Delivery> {
        let message = self.rx.recv_timeout(timeout).ok()?;
        Some(self.apply(message))
    }

    fn apply(&mut self, (url, result): FetchMessage) -> Delivery {
        self.in_flight.remove(&url);
        match result {
            Ok(photo) => {
                let photo = Arc::new(photo);
                self.cache.insert(url.clone(), Arc::clone(&photo));
                Delivery {
                    url,
                    state: PhotoState::Ready(photo),
                }
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "foto no disponible");
                self.failed.insert(url.clone());
                Delivery {
                    url,
                    state: PhotoState::Missing,
                }
            }
        }
    }

    pub fn is_cached(&self, url: &str) -> bool {
        self.cache.contains_key(url.trim())
    }

    pub fn has_failed(&self, url: &str) -> bool {
        self.failed.contains(url.trim())
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

/// Decodifica y redimensiona a `size`×`size`
pub fn decode(bytes: &[u8], size: u32) -> Result<Photo, FetchError> {
    let image = image::load_from_memory(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(image.resize_exact(size, size, FilterType::Triangle).to_rgba8())
}
