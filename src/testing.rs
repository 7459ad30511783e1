//! Test doubles for driving the flows without a network or a TTY.
//!
//! ```ignore
//! let fake = FakeTransport::new();
//! fake.reply("Login/autenticar", 200, "\"token\"");
//! fake.reply("Categorias/lista", 200, r#"{"root":[{"Chave":"1","Nome":"Hardware"}]}"#);
//!
//! let mut api = ApiClient::new(fake.clone());
//! api.authenticate("op", "env")?;
//!
//! let mut term = ScriptedTerminal::new(["5", "", "0"]);
//! Desk::new(&api, &mut term).run()?;
//! assert!(term.output().contains("Hardware"));
//! ```

use crate::error::DeskError;
use crate::transport::{Reply, Request, Transport};
use crate::ui::Screen;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io::{self, Write};
use std::rc::Rc;

/// Scripted input that reads as a Ctrl-C at that point.
pub const INTERRUPT: &str = "\u{3}";

const SCRIPTED_WIDTH: usize = 100;

/// Terminal fed from a fixed list of input lines; output is captured.
/// Running out of lines behaves like end of input.
pub struct ScriptedTerminal {
    inputs: VecDeque<String>,
    output: Vec<u8>,
    prompts: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedTerminal {
            inputs: inputs.into_iter().map(Into::into).collect(),
            output: Vec::new(),
            prompts: Vec::new(),
        }
    }

    /// Everything written so far, prompts and echoed input included.
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl crate::terminal::Terminal for ScriptedTerminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.trim().to_string());
        write!(self.output, "{prompt}: ")?;
        match self.inputs.pop_front() {
            Some(line) if line == INTERRUPT => {
                writeln!(self.output, "^C")?;
                Ok(None)
            }
            Some(line) => {
                writeln!(self.output, "{line}")?;
                Ok(Some(line))
            }
            None => {
                writeln!(self.output)?;
                Ok(None)
            }
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        &mut self.output
    }

    fn screen(&self) -> Screen {
        Screen::plain(SCRIPTED_WIDTH)
    }
}

#[derive(Default)]
struct FakeState {
    routes: HashMap<String, Reply>,
    requests: Vec<Request>,
}

/// In-memory transport: canned replies per path, every request recorded.
/// Clones share state, so a test can keep a handle after giving one to
/// the client. Unrouted paths answer 404.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Rc<RefCell<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` with `status` and `body` from now on.
    pub fn reply(&self, path: &str, status: u16, body: &str) {
        self.state.borrow_mut().routes.insert(
            path.to_string(),
            Reply {
                status,
                body: body.to_string(),
            },
        );
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.borrow().requests.clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.state
            .borrow()
            .requests
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    /// Most recent request sent to `path`.
    pub fn last_request(&self, path: &str) -> Option<Request> {
        self.state
            .borrow()
            .requests
            .iter()
            .rev()
            .find(|r| r.path == path)
            .cloned()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &Request) -> Result<Reply, DeskError> {
        let mut state = self.state.borrow_mut();
        state.requests.push(request.clone());
        Ok(state.routes.get(&request.path).cloned().unwrap_or(Reply {
            status: 404,
            body: String::new(),
        }))
    }
}
