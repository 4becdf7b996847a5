use anyhow::Result;
use common::AlertEvent;
use std::net::UdpSocket;

fn main() -> Result<()> {
    env_logger::init();

    let port = 9100;
    let addr = format!("0.0.0.0:{}", port);
    let socket = UdpSocket::bind(&addr)?;

    println!("Listening for alert events on {}...", addr);

    let mut buf = [0u8; 65535]; // Max UDP size
    let mut last_event: Option<AlertEvent> = None;

    loop {
        match socket.recv_from(&mut buf) {
            Ok((amt, src)) => {
                let slice = &buf[..amt];

                // Try to deserialize as JSON
                match serde_json::from_slice::<AlertEvent>(slice) {
                    Ok(event) => {
                        if last_event.as_ref() != Some(&event) {
                            println!("Received alert from {}:", src);
                            println!("{:#?}", event);
                            last_event = Some(event);
                        }
                    }
                    Err(e) => {
                        eprintln!("Failed to deserialize packet from {}: {}", src, e);
                        if let Ok(s) = std::str::from_utf8(slice) {
                            eprintln!("Raw data: {}", s);
                        }
                    }
                }
            }
            Err(e) => {
                eprintln!("Error receiving data: {}", e);
            }
        }
    }
}
