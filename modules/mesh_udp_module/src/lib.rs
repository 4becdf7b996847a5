// Landmark source fed by an external face-mesh detector sidecar over UDP.
// The sidecar owns the physical camera; this module receives JSON frames
// and forwards input-selection requests back to it.

use std::net::{SocketAddr, UdpSocket};

use anyhow::{Context, Result};
use api::{FaceFrame, LandmarkModule, ModuleLogger};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:9588";
const BIND_ADDR_ENV: &str = "VIGIL_MESH_ADDR";

pub struct MeshUdpModule {
    socket: Option<UdpSocket>,
    logger: Option<ModuleLogger>,
    sidecar: Option<SocketAddr>,
    buf: Box<[u8; 65535]>,
}

impl MeshUdpModule {
    fn new() -> Self {
        Self {
            socket: None,
            logger: None,
            sidecar: None,
            buf: Box::new([0u8; 65535]),
        }
    }

    fn log_info(&self, message: &str) {
        if let Some(logger) = &self.logger {
            logger.info(message);
        }
    }
}

impl LandmarkModule for MeshUdpModule {
    fn initialize(&mut self, logger: ModuleLogger) -> Result<()> {
        let bind_addr =
            std::env::var(BIND_ADDR_ENV).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let socket = UdpSocket::bind(&bind_addr)
            .with_context(|| format!("Failed to bind mesh socket on {}", bind_addr))?;
        socket
            .set_nonblocking(true)
            .context("Failed to set non-blocking mode")?;

        logger.info(&format!("Listening for face-mesh frames on {}", bind_addr));
        self.socket = Some(socket);
        self.logger = Some(logger);
        Ok(())
    }

    fn open_input(&mut self, index: u32) -> Result<()> {
        // The sidecar owns the device, so selection is a request, not a
        // probe. It is sent immediately when the sidecar is known and
        // otherwise deferred until the first frame arrives.
        match (&self.socket, self.sidecar) {
            (Some(socket), Some(sidecar)) => {
                let request = serde_json::json!({ "select_camera": index });
                socket
                    .send_to(request.to_string().as_bytes(), sidecar)
                    .with_context(|| format!("Failed to send camera request to {}", sidecar))?;
                self.log_info(&format!("Requested camera {} from {}", index, sidecar));
                Ok(())
            }
            (Some(_), None) => {
                self.log_info(&format!(
                    "No sidecar seen yet; camera {} will be the sidecar's choice until it reports in",
                    index
                ));
                Ok(())
            }
            (None, _) => anyhow::bail!("Module not initialized"),
        }
    }

    fn poll(&mut self, frame: &mut FaceFrame) -> Result<bool> {
        let Some(socket) = &self.socket else {
            anyhow::bail!("Module not initialized");
        };

        // Drain the queue and keep only the newest datagram; stale frames
        // are worthless for live analysis.
        let mut newest: Option<(usize, SocketAddr)> = None;
        loop {
            match socket.recv_from(&mut self.buf[..]) {
                Ok((amt, src)) => newest = Some((amt, src)),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(e).context("Failed to receive mesh datagram"),
            }
        }

        let Some((amt, src)) = newest else {
            return Ok(false);
        };

        if self.sidecar != Some(src) {
            self.log_info(&format!("Face-mesh sidecar at {}", src));
            self.sidecar = Some(src);
        }

        match serde_json::from_slice::<FaceFrame>(&self.buf[..amt]) {
            Ok(parsed) => {
                *frame = parsed;
                Ok(true)
            }
            Err(e) => {
                if let Some(logger) = &self.logger {
                    logger.warn(&format!("Dropping malformed frame from {}: {}", src, e));
                }
                Ok(false)
            }
        }
    }

    fn unload(&mut self) {
        self.log_info("Unloading mesh UDP module");
        self.socket = None;
        self.sidecar = None;
    }
}

#[no_mangle]
#[allow(improper_ctypes_definitions)]
pub extern "C" fn create_module() -> Box<dyn LandmarkModule> {
    Box::new(MeshUdpModule::new())
}
