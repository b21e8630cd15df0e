use std::sync::mpsc::{self, Receiver, SendError, Sender};
use std::thread::{self, JoinHandle};

use log::{error, info};

use crate::engine::pipeline::{TurnPipeline, TurnStage};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::session::Session;

/// Owns the session and plays commands one at a time, so turns never overlap.
pub struct Engine<'m> {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    pipeline: TurnPipeline<'m>,
    session: Session,
}

impl<'m> Engine<'m> {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        pipeline: TurnPipeline<'m>,
        session: Session,
    ) -> Self {
        Self {
            rx,
            tx,
            pipeline,
            session,
        }
    }

    /// Runs until the UI hangs up, then closes the session.
    pub fn run(mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::SubmitAction { action, settings } => {
                    let tx = self.tx.clone();
                    let result = self
                        .pipeline
                        .take_turn(&mut self.session, &settings, &action, |stage| {
                            let _ = tx.send(EngineResponse::Stage(stage));
                        })
                        .cloned();

                    match result {
                        Ok(turn) => {
                            let _ = self.tx.send(EngineResponse::TurnCommitted(turn));
                        }
                        Err(e) => {
                            error!("turn failed: {e}");
                            let _ = self.tx.send(EngineResponse::TurnFailed(e.to_string()));
                        }
                    }
                    let _ = self.tx.send(EngineResponse::Stage(TurnStage::Idle));
                }

                EngineCommand::ResetStory => {
                    self.session.reset();
                    let _ = self.tx.send(EngineResponse::StoryReset);
                }
            }
        }

        info!("engine stopping");
        self.session.close();
    }
}

/// The UI's end of a running engine.
///
/// Dropping it hangs up the command channel and waits for the engine to
/// close its session, so narration files never outlive the app.
pub struct EngineHandle {
    tx: Option<Sender<EngineCommand>>,
    thread: Option<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn spawn(
        pipeline: TurnPipeline<'static>,
        session: Session,
    ) -> (Self, Receiver<EngineResponse>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let thread = thread::spawn(move || {
            Engine::new(cmd_rx, resp_tx, pipeline, session).run();
        });

        let handle = Self {
            tx: Some(cmd_tx),
            thread: Some(thread),
        };
        (handle, resp_rx)
    }

    pub fn send(&self, cmd: EngineCommand) -> Result<(), SendError<EngineCommand>> {
        match &self.tx {
            Some(tx) => tx.send(cmd),
            None => Err(SendError(cmd)),
        }
    }

    /// Stops the engine after its current command and waits for it.
    pub fn shutdown(&mut self) {
        self.tx.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("engine thread panicked");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
