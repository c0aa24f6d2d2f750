pub mod server;

use crate::api::GatewayConfig;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        config: GatewayConfig,
    },
}
