//! Shared test helpers: an in-process stub tracker and body builders.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use fdfs_tracker::stat::{FieldSpec, GroupStat, StatRecord, StorageStat};
use fdfs_tracker::{ClientConfig, TrackerClient, TrackerEndpoint};

pub const QUIT: u8 = 82;
pub const RESP: u8 = 100;

// =============================================================================
// Stub Tracker
// =============================================================================

/// One request frame received by the stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: u8,
    pub body: Vec<u8>,
}

/// What the stub sends back for a request
pub enum Reply {
    /// Status 0 with this body
    Ok(Vec<u8>),
    /// Non-zero status, empty body
    Status(u8),
    /// Bytes written verbatim
    Raw(Vec<u8>),
    /// Say nothing and keep the connection open
    Silent,
    /// Drop the connection
    Hangup,
}

type Handler = dyn Fn(&Request) -> Reply + Send + Sync;

/// Tracker stand-in listening on an ephemeral local port
///
/// Each accepted connection is served on its own thread until the peer
/// sends QUIT or hangs up. Every frame, QUIT included, is logged.
pub struct StubTracker {
    addr: SocketAddr,
    log: Arc<Mutex<Vec<Request>>>,
}

impl StubTracker {
    pub fn start(handler: impl Fn(&Request) -> Reply + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let accept_log = log.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let log = accept_log.clone();
                let handler = handler.clone();
                thread::spawn(move || serve(stream, log, handler));
            }
        });

        Self { addr, log }
    }

    pub fn endpoint(&self) -> TrackerEndpoint {
        TrackerEndpoint::new("127.0.0.1", self.addr.port())
    }

    /// Requests received so far, QUIT frames excluded
    pub fn requests(&self) -> Vec<Request> {
        self.log
            .lock()
            .iter()
            .filter(|r| r.command != QUIT)
            .cloned()
            .collect()
    }

    /// Commands received so far, QUIT frames excluded
    pub fn commands(&self) -> Vec<u8> {
        self.requests().iter().map(|r| r.command).collect()
    }

    pub fn quit_count(&self) -> usize {
        self.log.lock().iter().filter(|r| r.command == QUIT).count()
    }

    /// Wait up to a second for `count` QUIT frames to arrive
    pub fn wait_for_quits(&self, count: usize) -> bool {
        let deadline = Instant::now() + Duration::from_secs(1);
        while Instant::now() < deadline {
            if self.quit_count() >= count {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        self.quit_count() >= count
    }
}

fn serve(mut stream: TcpStream, log: Arc<Mutex<Vec<Request>>>, handler: Arc<Handler>) {
    loop {
        let mut header = [0u8; 10];
        if stream.read_exact(&mut header).is_err() {
            return;
        }
        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&header[..8]);
        let body_len = u64::from_be_bytes(len_bytes) as usize;

        let mut body = vec![0u8; body_len];
        if stream.read_exact(&mut body).is_err() {
            return;
        }

        let request = Request {
            command: header[8],
            body,
        };
        log.lock().push(request.clone());
        if request.command == QUIT {
            return;
        }

        let frame = match handler(&request) {
            Reply::Ok(body) => {
                let mut frame = response_header(body.len() as u64, 0).to_vec();
                frame.extend_from_slice(&body);
                frame
            }
            Reply::Status(code) => response_header(0, code).to_vec(),
            Reply::Raw(bytes) => bytes,
            Reply::Silent => continue,
            Reply::Hangup => return,
        };
        if stream.write_all(&frame).is_err() {
            return;
        }
    }
}

fn response_header(body_len: u64, status: u8) -> [u8; 10] {
    let mut header = [0u8; 10];
    header[..8].copy_from_slice(&body_len.to_be_bytes());
    header[8] = RESP;
    header[9] = status;
    header
}

/// An endpoint nothing listens on
pub fn dead_endpoint() -> TrackerEndpoint {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    TrackerEndpoint::new("127.0.0.1", port)
}

// =============================================================================
// Clients
// =============================================================================

pub fn test_config(endpoints: Vec<TrackerEndpoint>) -> ClientConfig {
    ClientConfig::builder()
        .trackers(endpoints)
        .connect_timeout(Duration::from_secs(1))
        .network_timeout(Duration::from_secs(2))
        .build()
        .unwrap()
}

pub fn client_for(trackers: &[&StubTracker]) -> TrackerClient {
    let endpoints = trackers.iter().map(|t| t.endpoint()).collect();
    TrackerClient::from_config(&test_config(endpoints)).unwrap()
}

// =============================================================================
// Body Builders
// =============================================================================

pub fn fixed(text: &str, width: usize) -> Vec<u8> {
    let mut field = vec![0u8; width];
    let len = text.len().min(width);
    field[..len].copy_from_slice(&text.as_bytes()[..len]);
    field
}

/// Single store answer: group(16) ip(15) port(8) store_path(1)
pub fn store_body(group: &str, ip: &str, port: u64, store_path: u8) -> Vec<u8> {
    let mut body = fixed(group, 16);
    body.extend(fixed(ip, 15));
    body.extend(port.to_be_bytes());
    body.push(store_path);
    body
}

/// Store-all answer: group(16) [ip(15) port(8)] x n store_path(1)
pub fn store_all_body(group: &str, servers: &[(&str, u64)], store_path: u8) -> Vec<u8> {
    let mut body = fixed(group, 16);
    for (ip, port) in servers {
        body.extend(fixed(ip, 15));
        body.extend(port.to_be_bytes());
    }
    body.push(store_path);
    body
}

/// Fetch/update answer: group(16) ip(15) port(8) [ip(15)] x n
pub fn fetch_body(group: &str, ip: &str, port: u64, alternates: &[&str]) -> Vec<u8> {
    let mut body = fixed(group, 16);
    body.extend(fixed(ip, 15));
    body.extend(port.to_be_bytes());
    for alt in alternates {
        body.extend(fixed(alt, 15));
    }
    body
}

fn put_field(record: &mut [u8], fields: &[FieldSpec], name: &str, bytes: &[u8]) {
    let spec = fields.iter().find(|f| f.name == name).unwrap();
    assert!(bytes.len() <= spec.width, "value too wide for {}", name);
    record[spec.offset..spec.offset + bytes.len()].copy_from_slice(bytes);
}

pub fn group_record(name: &str, free_mb: u64, active_count: u64) -> Vec<u8> {
    let mut record = vec![0u8; GroupStat::record_size()];
    put_field(&mut record, GroupStat::FIELDS, "group_name", name.as_bytes());
    put_field(&mut record, GroupStat::FIELDS, "free_mb", &free_mb.to_be_bytes());
    put_field(&mut record, GroupStat::FIELDS, "active_count", &active_count.to_be_bytes());
    record
}

pub fn storage_record(status: u8, ip: &str) -> Vec<u8> {
    let mut record = vec![0u8; StorageStat::record_size()];
    put_field(&mut record, StorageStat::FIELDS, "status", &[status]);
    put_field(&mut record, StorageStat::FIELDS, "ip_addr", ip.as_bytes());
    record
}

pub fn set_storage_field(record: &mut [u8], name: &str, bytes: &[u8]) {
    put_field(record, StorageStat::FIELDS, name, bytes);
}
