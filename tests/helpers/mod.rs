/// Test doubles to simulate the CAN bus and timer during integration tests.
use ossm_j1939::{
    core::OSSM_SOURCE_ADDRESS,
    protocol::{
        command::RESPONSE_PGN,
        transport::{
            can_frame::CanFrame,
            can_id::CanId,
            traits::{can_bus::CanBus, ossm_timer::OssmTimer},
        },
    },
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;
use tokio::time::{sleep, Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
/// Failure injected by the mock bus.
pub enum MockError {
    Send,
    Recv,
}

#[allow(dead_code)]
/// What the simulated module does after receiving a command frame.
pub enum Reply {
    /// Queue these frames for the host.
    Frames(Vec<CanFrame>),
    /// Stay silent.
    Silence,
    /// Every following `try_recv` fails.
    BreakRecv,
    /// The next `try_recv` fails once, then these frames are served.
    GlitchThen(Vec<CanFrame>),
}

type Responder = Box<dyn FnMut(&CanFrame) -> Reply>;

#[derive(Default)]
/// Shared state of the mock bus, inspected by the tests.
pub struct BusState {
    pub sent: Vec<CanFrame>,
    pub inbox: VecDeque<CanFrame>,
    pub fail_send: bool,
    pub fail_recv: bool,
    /// Number of upcoming `try_recv` calls that fail once each.
    pub recv_glitches: usize,
    pub recv_calls: usize,
    responder: Option<Responder>,
}

#[derive(Clone, Default)]
/// In-memory CAN bus reproducing the `CanBus` trait behavior. Clones share
/// the same state, so a test can keep a handle after moving the bus.
pub struct MockCanBus {
    state: Rc<RefCell<BusState>>,
}

#[allow(dead_code)]
impl MockCanBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus with a simulated module answering every command.
    pub fn with_responder(responder: impl FnMut(&CanFrame) -> Reply + 'static) -> Self {
        let bus = Self::new();
        bus.state.borrow_mut().responder = Some(Box::new(responder));
        bus
    }

    pub fn push(&self, frame: CanFrame) {
        self.state.borrow_mut().inbox.push_back(frame);
    }

    pub fn sent(&self) -> Vec<CanFrame> {
        self.state.borrow().sent.clone()
    }

    pub fn recv_calls(&self) -> usize {
        self.state.borrow().recv_calls
    }

    pub fn set_fail_send(&self, fail: bool) {
        self.state.borrow_mut().fail_send = fail;
    }

    pub fn set_fail_recv(&self, fail: bool) {
        self.state.borrow_mut().fail_recv = fail;
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().inbox.len()
    }
}

impl CanBus for MockCanBus {
    type Error = MockError;

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_send {
            return Err(MockError::Send);
        }
        state.sent.push(*frame);

        let reply = state.responder.as_mut().map(|respond| respond(frame));
        match reply {
            Some(Reply::Frames(frames)) => state.inbox.extend(frames),
            Some(Reply::BreakRecv) => state.fail_recv = true,
            Some(Reply::GlitchThen(frames)) => {
                state.recv_glitches += 1;
                state.inbox.extend(frames);
            }
            Some(Reply::Silence) | None => {}
        }
        Ok(())
    }

    async fn try_recv(&mut self) -> Result<Option<CanFrame>, Self::Error> {
        let mut state = self.state.borrow_mut();
        state.recv_calls += 1;
        if state.fail_recv {
            return Err(MockError::Recv);
        }
        if state.recv_glitches > 0 {
            state.recv_glitches -= 1;
            return Err(MockError::Recv);
        }
        Ok(state.inbox.pop_front())
    }
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Timer advancing a virtual clock instead of sleeping.
pub struct VirtualTimer {
    now: Rc<Cell<u64>>,
}

#[allow(dead_code)]
impl VirtualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.now.get()
    }

    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get() + millis);
    }
}

impl OssmTimer for VirtualTimer {
    async fn delay_ms(&mut self, millis: u32) {
        self.advance(millis as u64);
    }

    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to check wall-clock bounds.
pub struct TokioTimer {
    origin: Instant,
}

#[allow(dead_code)]
impl TokioTimer {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl OssmTimer for TokioTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }

    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

#[allow(dead_code)]
/// Frame broadcast by the module on `pgn`.
pub fn module_frame(pgn: u32, data: [u8; 8]) -> CanFrame {
    CanFrame::new_j1939(CanId::from_parts(pgn, 6, OSSM_SOURCE_ADDRESS), data)
}

#[allow(dead_code)]
/// Module response `[cmd][error][result]`.
pub fn response(command: u8, error: u8, result: [u8; 6]) -> CanFrame {
    let mut data = [0u8; 8];
    data[0] = command;
    data[1] = error;
    data[2..].copy_from_slice(&result);
    module_frame(RESPONSE_PGN, data)
}

#[allow(dead_code)]
/// Success response echoing the command byte of `frame`.
pub fn ack(frame: &CanFrame) -> Reply {
    Reply::Frames(vec![response(frame.data[0], 0, [0xFF; 6])])
}
