use axum::Router;
use log::info;
use mdns_sd::{ServiceDaemon, ServiceInfo};
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub struct ControlHost;

impl ControlHost {
    pub async fn start(requested_port: u16, app_router: Router) -> anyhow::Result<()> {
        // Bind to Port (0 for dynamic)
        let addr = SocketAddr::from(([0, 0, 0, 0], requested_port));
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let actual_port = local_addr.port();

        info!("Control host listening on http://{}", local_addr);

        // Advertise via mDNS so panels can find the daemon without a
        // fixed port.
        let mdns = ServiceDaemon::new()?;
        let service_type = "_vigil-http._tcp.local.";
        let instance_name = "vigil";
        let host_name = format!("vigil_d_{}.local.", actual_port);

        let properties = [("txtvers", "1")];

        let service_info = ServiceInfo::new(
            service_type,
            instance_name,
            &host_name,
            "",
            actual_port,
            &properties[..],
        )?
        .enable_addr_auto();

        mdns.register(service_info)?;
        info!(
            "Advertised control host via mDNS: {} on port {}",
            instance_name, actual_port
        );

        // Run Server
        axum::serve(listener, app_router).await?;

        Ok(())
    }
}
