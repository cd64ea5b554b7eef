#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tienda_menu::cli::{Connector, ResultSet, Session};
use tienda_menu::error::{BoxError, MenuError, MenuResult};

#[derive(Clone)]
pub enum Script {
    Rows(ResultSet),
    QueryFails(String),
    ConnectFails(String),
}

/// Shared counters so tests can see what the executor did after the fact.
#[derive(Clone, Default)]
pub struct Calls {
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
    pub queries: Arc<Mutex<Vec<String>>>,
}

impl Calls {
    pub fn opened(&self) -> usize { self.opened.load(Ordering::SeqCst) }
    pub fn closed(&self) -> usize { self.closed.load(Ordering::SeqCst) }
    pub fn queries(&self) -> Vec<String> { self.queries.lock().unwrap().clone() }
}

pub struct MockConnector {
    pub script: Script,
    pub calls: Calls,
}

impl MockConnector {
    pub fn new(script: Script) -> (Self, Calls) {
        let calls = Calls::default();
        (Self { script, calls: calls.clone() }, calls)
    }
}

#[async_trait]
impl Connector for MockConnector {
    fn target(&self) -> String { "mock:3306/tienda_online".to_string() }

    async fn open(&self) -> MenuResult<Box<dyn Session>> {
        if let Script::ConnectFails(msg) = &self.script {
            return Err(MenuError::connection(self.target(), msg.clone()));
        }
        self.calls.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession { script: self.script.clone(), calls: self.calls.clone() }))
    }
}

struct MockSession {
    script: Script,
    calls: Calls,
}

#[async_trait]
impl Session for MockSession {
    async fn query(&mut self, sql: &str) -> Result<ResultSet, BoxError> {
        self.calls.queries.lock().unwrap().push(sql.to_string());
        match &self.script {
            Script::Rows(rs) => Ok(rs.clone()),
            Script::QueryFails(msg) => Err(msg.clone().into()),
            Script::ConnectFails(_) => unreachable!("session never opened"),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), BoxError> {
        self.calls.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap()
}
