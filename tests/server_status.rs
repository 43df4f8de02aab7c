use std::time::Duration;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use minecraft_api_lib::core::server::varint::{read_varint, write_varint};
use minecraft_api_lib::core::server::{ServerAddress, ServerStatusClient, ServerStatusResult};
use minecraft_api_lib::ApiError;

/// Read one length-prefixed packet and return `(id, body)`.
async fn read_packet<R: tokio::io::AsyncRead + Unpin>(reader: &mut R) -> (i32, Vec<u8>) {
    let len = read_varint(reader).await.unwrap() as usize;
    let mut packet = vec![0u8; len];
    reader.read_exact(&mut packet).await.unwrap();
    let mut cursor = packet.as_slice();
    let id = read_varint(&mut cursor).await.unwrap();
    (id, cursor.to_vec())
}

fn status_packet(payload: &str) -> Vec<u8> {
    let mut body = Vec::new();
    write_varint(&mut body, 0x00);
    write_varint(&mut body, payload.len() as i32);
    body.extend_from_slice(payload.as_bytes());

    let mut packet = Vec::new();
    write_varint(&mut packet, body.len() as i32);
    packet.extend_from_slice(&body);
    packet
}

/// One-shot fake server that answers with `reply` and returns what it saw.
async fn fake_server(reply: Vec<u8>) -> (u16, tokio::task::JoinHandle<Vec<(i32, Vec<u8>)>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let handshake = read_packet(&mut socket).await;
        let request = read_packet(&mut socket).await;
        socket.write_all(&reply).await.unwrap();

        // The prober closes its side once the response is read.
        let mut rest = Vec::new();
        socket.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());

        vec![handshake, request]
    });

    (port, handle)
}

#[tokio::test]
async fn probes_a_local_server() {
    // Raw CRLF between tokens; the escaped newline inside the MOTD is data.
    let payload = "{\r\n\"version\": {\"name\": \"Paper 1.20.4\", \"protocol\": 765},\r\n\
                   \"players\": {\"max\": 100, \"online\": 7},\r\n\
                   \"description\": \"A Minecraft Server\\nSecond line\"\r\n}";
    let (port, server) = fake_server(status_packet(payload)).await;

    let address = ServerAddress::new("127.0.0.1", i64::from(port)).unwrap();
    let result = ServerStatusClient::new().probe(&address).await.unwrap();

    let ServerStatusResult::Online(status) = result else {
        panic!("expected an online status");
    };
    assert_eq!(status.version.as_ref().unwrap().name, "Paper 1.20.4");
    assert_eq!(status.players.as_ref().unwrap().online, 7);
    assert_eq!(status.motd(), "A Minecraft Server\nSecond line");

    let packets = server.await.unwrap();
    let (handshake_id, handshake) = &packets[0];
    assert_eq!(*handshake_id, 0x00);
    // protocol -1, host length byte, host, big-endian port, next state 1
    assert_eq!(&handshake[..5], &[0xff, 0xff, 0xff, 0xff, 0x0f]);
    assert_eq!(handshake[5] as usize, "127.0.0.1".len());
    assert_eq!(&handshake[6..15], b"127.0.0.1");
    assert_eq!(&handshake[15..17], &port.to_be_bytes());
    assert_eq!(handshake[17], 0x01);
    assert_eq!(packets[1], (0x00, Vec::new()));
}

#[tokio::test]
async fn unexpected_packet_id_degrades_to_unknown() {
    // A bare packet 0x01; the prober stops right after the id.
    let mut reply = Vec::new();
    write_varint(&mut reply, 1);
    write_varint(&mut reply, 0x01);
    let (port, server) = fake_server(reply).await;

    let address = ServerAddress::new("127.0.0.1", i64::from(port)).unwrap();
    let result = ServerStatusClient::new().probe(&address).await.unwrap();

    assert!(result.is_unknown());
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["status"], "Unknown");
    assert_eq!(value["ip"], "127.0.0.1");
    server.await.unwrap();
}

#[tokio::test]
async fn invalid_json_is_malformed_response() {
    let (port, server) = fake_server(status_packet("{ this is not json")).await;

    let address = ServerAddress::new("127.0.0.1", i64::from(port)).unwrap();
    let err = ServerStatusClient::new().probe(&address).await.unwrap_err();

    assert!(matches!(err, ApiError::MalformedResponse(_)), "{err}");
    server.await.unwrap();
}

#[tokio::test]
async fn refused_port_reports_a_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let address = ServerAddress::new("127.0.0.1", i64::from(port)).unwrap();
    let err = ServerStatusClient::new().probe(&address).await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout { .. }), "{err}");
}

#[tokio::test]
async fn mistyped_status_fields_still_come_back_online() {
    let payload = json!({
        "version": { "name": "Modded", "protocol": "765" },
        "description": { "text": "hi" }
    })
    .to_string();
    let (port, server) = fake_server(status_packet(&payload)).await;

    let address = ServerAddress::new("127.0.0.1", i64::from(port)).unwrap();
    let result = ServerStatusClient::new().probe(&address).await.unwrap();

    let ServerStatusResult::Online(status) = result else {
        panic!("expected an online status");
    };
    assert_eq!(status.version.as_ref().unwrap().name, "Modded");
    assert_eq!(status.motd(), "hi");
    server.await.unwrap();
}

#[tokio::test]
async fn silent_server_hits_the_read_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(socket);
    });

    let address = ServerAddress::new("127.0.0.1", i64::from(port)).unwrap();
    let client = ServerStatusClient::new().with_read_timeout(Some(Duration::from_millis(200)));
    let err = client.probe(&address).await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout { .. }), "{err}");
    server.abort();
}
