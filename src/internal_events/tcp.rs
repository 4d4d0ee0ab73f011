use std::net::SocketAddr;

use metrics::counter;

use super::InternalEvent;

#[derive(Debug)]
pub struct TcpConnectionEstablished {
    pub peer_addr: Option<SocketAddr>,
}

impl InternalEvent for TcpConnectionEstablished {
    fn emit(self) {
        if let Some(peer_addr) = self.peer_addr {
            debug!(message = "Connected.", %peer_addr);
        } else {
            debug!(message = "Connected.", peer_addr = "unknown");
        }
        counter!("connection_established_total", "mode" => "tcp").increment(1);
    }
}
