pub mod status;
pub mod varint;

pub use status::{
    Connector, ServerAddress, ServerStatus, ServerStatusClient, ServerStatusResult, TcpConnector,
    DEFAULT_PORT,
};
