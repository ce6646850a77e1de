use std::{
    sync::mpsc,
    thread::{self, JoinHandle},
};

use mockito::{Matcher, Request, Server};
use serde_json::{Value, json};
use url::Url;

/// A canned JSON-RPC reply.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Result(Value),
    Error(i64, &'static str),
}

/// Builds a JSON-RPC response echoing the id of the request.
pub(crate) fn respond(req: &Request, reply: &Reply) -> Vec<u8> {
    let id = req
        .body()
        .ok()
        .and_then(|body| serde_json::from_slice::<Value>(body).ok())
        .map_or(Value::Null, |body| body["id"].clone());

    let response = match reply {
        Reply::Result(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Reply::Error(code, message) => {
            json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
        }
    };
    serde_json::to_vec(&response).unwrap()
}

/// A mock JSON-RPC server answering each method with a fixed reply.
///
/// The server runs on its own thread, since mockito's sync server cannot be created from
/// within the async test runtime.
#[derive(Debug)]
pub(crate) struct RpcServer {
    url: String,
    handle: JoinHandle<()>,
}

impl RpcServer {
    /// Starts a server answering each method with the given result.
    pub(crate) fn start(results: Vec<(&'static str, Value)>) -> Self {
        Self::with_replies(results.into_iter().map(|(m, r)| (m, Reply::Result(r))).collect())
    }

    /// Starts a server answering each method with the given reply.
    pub(crate) fn with_replies(replies: Vec<(&'static str, Reply)>) -> Self {
        let (url_tx, url_rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let mut server = Server::new();
            let _mocks = replies
                .into_iter()
                .map(|(method, reply)| {
                    server
                        .mock("POST", "/")
                        .match_body(Matcher::PartialJson(json!({ "method": method })))
                        .with_header("content-type", "application/json")
                        .with_body_from_request(move |req| respond(req, &reply))
                        .create()
                })
                .collect::<Vec<_>>();

            url_tx.send(server.url()).unwrap();
            thread::park();
        });

        let url = url_rx.recv().unwrap();
        Self { url, handle }
    }

    pub(crate) fn url(&self) -> Url {
        Url::parse(&self.url).unwrap()
    }

    pub(crate) fn stop(self) {
        self.handle.thread().unpark();
        self.handle.join().unwrap();
    }
}
