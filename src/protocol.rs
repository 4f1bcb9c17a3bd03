//! Newline-delimited JSON messages between the judge and a participant.
//!
//! The judge opens with a [`Hello`] line. The participant then sends one
//! [`Request`] per line and reads exactly one [`Response`] line back for each.
//! The participant signals that it is done by closing its output.
//!
//! ```text
//! judge -> {"role":"bob","n":3}
//! bob   -> {"op":"ask","a":[1],"b":[2]}
//! judge -> {"type":"adjacent","value":true}
//! bob   -> {"op":"answer","edges":[[1,2],[2,3]]}
//! judge -> {"type":"ok"}
//! ```

use crate::Edge;
use crate::error::ProtocolError;
use crate::explore::View;
use crate::participant::{Alice, AliceJudge, Bob, BobJudge};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// First line sent to a participant; tells it which role to play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Hello {
    Alice { n: usize, preorder: Vec<usize> },
    Bob { n: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    SetTree { k: usize, edges: Vec<Edge> },
    Ask { a: Vec<usize>, b: Vec<usize> },
    Explore,
    Move { target: usize },
    Answer { edges: Vec<Edge> },
}

impl Request {
    pub fn op(&self) -> &'static str {
        match self {
            Request::SetTree { .. } => "set_tree",
            Request::Ask { .. } => "ask",
            Request::Explore => "explore",
            Request::Move { .. } => "move",
            Request::Answer { .. } => "answer",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok,
    Adjacent { value: bool },
    View(View),
    Error { message: String },
}

/// Applies one request from Alice.
pub fn dispatch_alice(judge: &mut dyn AliceJudge, req: Request) -> Result<Response, ProtocolError> {
    match req {
        Request::SetTree { k, edges } => judge.set_tree(k, &edges).map(|()| Response::Ok),
        other => Err(ProtocolError::WrongPhase {
            op: other.op(),
            phase: "alice",
        }),
    }
}

/// Applies one request from Bob.
pub fn dispatch_bob(judge: &mut dyn BobJudge, req: Request) -> Result<Response, ProtocolError> {
    match req {
        Request::Ask { a, b } => judge
            .ask(&a, &b)
            .map(|value| Response::Adjacent { value }),
        Request::Explore => judge.explore().map(Response::View),
        Request::Move { target } => judge.move_to(target).map(Response::View),
        Request::Answer { edges } => judge.answer(edges).map(|()| Response::Ok),
        other @ Request::SetTree { .. } => Err(ProtocolError::WrongPhase {
            op: other.op(),
            phase: "bob",
        }),
    }
}

/// Writes one message as a single JSON line and flushes.
pub fn write_message<W: Write, T: Serialize>(writer: &mut W, msg: &T) -> anyhow::Result<()> {
    let line = serde_json::to_string(msg)?;
    writeln!(writer, "{}", line)?;
    writer.flush()?;
    Ok(())
}

/// Reads the next non-empty line. `None` at end of input.
pub fn read_line<R: BufRead>(reader: &mut R) -> anyhow::Result<Option<String>> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if !line.trim().is_empty() {
            return Ok(Some(line.trim().to_string()));
        }
    }
}

pub fn read_message<R: BufRead, T: DeserializeOwned>(reader: &mut R) -> anyhow::Result<Option<T>> {
    match read_line(reader)? {
        Some(line) => Ok(Some(
            serde_json::from_str(&line).with_context(|| format!("invalid message: {}", line))?,
        )),
        None => Ok(None),
    }
}

/// Participant-side view of a judge on the other end of a pipe.
pub struct RemoteJudge<R, W> {
    reader: R,
    writer: W,
    n: usize,
}

impl<R: BufRead, W: Write> RemoteJudge<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            n: 0,
        }
    }

    /// Waits for the judge's greeting.
    pub fn hello(&mut self) -> anyhow::Result<Hello> {
        let hello: Hello = read_message(&mut self.reader)?.context("judge closed before hello")?;
        self.n = match &hello {
            Hello::Alice { n, .. } | Hello::Bob { n } => *n,
        };
        Ok(hello)
    }

    fn call(&mut self, req: &Request) -> Result<Response, ProtocolError> {
        let exchange = |this: &mut Self| -> anyhow::Result<Response> {
            write_message(&mut this.writer, req)?;
            read_message(&mut this.reader)?.context("judge closed the connection")
        };
        match exchange(self) {
            Ok(Response::Error { message }) => Err(ProtocolError::Remote(message)),
            Ok(resp) => Ok(resp),
            Err(e) => Err(ProtocolError::Remote(format!("{:#}", e))),
        }
    }

    fn unexpected(req: &Request, resp: Response) -> ProtocolError {
        ProtocolError::Remote(format!("unexpected response to {}: {:?}", req.op(), resp))
    }

    fn call_view(&mut self, req: Request) -> Result<View, ProtocolError> {
        match self.call(&req)? {
            Response::View(view) => Ok(view),
            other => Err(Self::unexpected(&req, other)),
        }
    }

    fn call_ok(&mut self, req: Request) -> Result<(), ProtocolError> {
        match self.call(&req)? {
            Response::Ok => Ok(()),
            other => Err(Self::unexpected(&req, other)),
        }
    }
}

impl<R: BufRead, W: Write> AliceJudge for RemoteJudge<R, W> {
    fn set_tree(&mut self, k: usize, edges: &[Edge]) -> Result<(), ProtocolError> {
        self.call_ok(Request::SetTree {
            k,
            edges: edges.to_vec(),
        })
    }
}

impl<R: BufRead, W: Write> BobJudge for RemoteJudge<R, W> {
    fn num_nodes(&self) -> usize {
        self.n
    }

    fn ask(&mut self, a_set: &[usize], b_set: &[usize]) -> Result<bool, ProtocolError> {
        let req = Request::Ask {
            a: a_set.to_vec(),
            b: b_set.to_vec(),
        };
        match self.call(&req)? {
            Response::Adjacent { value } => Ok(value),
            other => Err(Self::unexpected(&req, other)),
        }
    }

    fn explore(&mut self) -> Result<View, ProtocolError> {
        self.call_view(Request::Explore)
    }

    fn move_to(&mut self, target: usize) -> Result<View, ProtocolError> {
        self.call_view(Request::Move { target })
    }

    fn answer(&mut self, edges: Vec<Edge>) -> Result<(), ProtocolError> {
        self.call_ok(Request::Answer { edges })
    }
}

/// Plays whichever role the judge asks for over `reader`/`writer`.
pub fn serve<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    alice: &mut dyn Alice,
    bob: &mut dyn Bob,
) -> anyhow::Result<()> {
    let mut judge = RemoteJudge::new(reader, writer);
    match judge.hello()? {
        Hello::Alice { n, preorder } => alice.compress(n, &preorder, &mut judge),
        Hello::Bob { n } => bob.reconstruct(n, &mut judge),
    }
}

/// [`serve`] over the process's stdin and stdout.
pub fn serve_stdio(alice: &mut dyn Alice, bob: &mut dyn Bob) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve(stdin.lock(), stdout.lock(), alice, bob)
}
