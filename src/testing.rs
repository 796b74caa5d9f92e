//! Test fixtures shared across modules
//!
//! A loopback UDP responder that stands in for a DNS resolver, and recording
//! fakes for the device capabilities.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use parking_lot::Mutex;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

use crate::device::{Actuator, Extra, NavigationMode, NavigationService};

/// How the fake resolver answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// NOERROR with one A record per question
    Answer,
    /// NXDOMAIN, no records
    NxDomain,
    /// Correct reply with the id off by one
    WrongId,
    /// Bytes that do not decode as a DNS message
    Garbage,
    /// Read the query and never reply
    Silent,
    /// Answer the first query, then go silent
    AnswerOnce,
}

pub struct FakeResolver {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl FakeResolver {
    pub async fn spawn(behavior: Behavior) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let queries = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&queries);

        let handle = tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);

                let reply = match behavior {
                    Behavior::Silent => continue,
                    Behavior::AnswerOnce if counter.load(Ordering::SeqCst) > 1 => continue,
                    Behavior::Garbage => vec![0xde, 0xad, 0xbe],
                    _ => respond(&buf[..len], behavior),
                };
                let _ = socket.send_to(&reply, peer).await;
            }
        });

        Self {
            addr,
            queries,
            handle,
        }
    }

    /// Server string in `host:port` form
    pub fn server(&self) -> String {
        self.addr.to_string()
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Drop for FakeResolver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn respond(query: &[u8], behavior: Behavior) -> Vec<u8> {
    let query = Message::from_vec(query).unwrap();
    let mut reply = query.clone();
    reply.set_message_type(MessageType::Response);

    match behavior {
        Behavior::NxDomain => {
            reply.set_response_code(ResponseCode::NXDomain);
        }
        Behavior::WrongId => {
            reply.set_id(query.id().wrapping_add(1));
        }
        _ => {
            for question in query.queries() {
                reply.add_answer(Record::from_rdata(
                    question.name().clone(),
                    60,
                    RData::A(A(Ipv4Addr::new(192, 0, 2, 1))),
                ));
            }
        }
    }

    reply.to_vec().unwrap()
}

/// Actuator that counts stop requests and optionally fails them
#[derive(Default)]
pub struct FakeActuator {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl FakeActuator {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Actuator for FakeActuator {
    async fn stop(&self, _extra: Option<&Extra>) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("motor controller offline");
        }
        Ok(())
    }
}

/// Navigation service that records requested modes
#[derive(Default)]
pub struct FakeNavigation {
    pub modes: Mutex<Vec<NavigationMode>>,
    pub fail: bool,
}

impl FakeNavigation {
    pub fn failing() -> Self {
        Self {
            modes: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn modes(&self) -> Vec<NavigationMode> {
        self.modes.lock().clone()
    }
}

#[async_trait]
impl NavigationService for FakeNavigation {
    async fn set_mode(&self, mode: NavigationMode, _extra: Option<&Extra>) -> anyhow::Result<()> {
        self.modes.lock().push(mode);
        if self.fail {
            anyhow::bail!("navigation service unreachable");
        }
        Ok(())
    }
}

/// Shared log of call order across several fakes
#[derive(Default, Clone)]
pub struct CallLog(pub Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// Actuator that appends its name to a [`CallLog`]
pub struct LoggedActuator {
    pub name: String,
    pub log: CallLog,
}

#[async_trait]
impl Actuator for LoggedActuator {
    async fn stop(&self, _extra: Option<&Extra>) -> anyhow::Result<()> {
        self.log.0.lock().push(self.name.clone());
        Ok(())
    }
}

/// Actuator whose stop call takes `delay` to finish
pub struct SlowActuator {
    delay: Duration,
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl SlowActuator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Actuator for SlowActuator {
    async fn stop(&self, _extra: Option<&Extra>) -> anyhow::Result<()> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
