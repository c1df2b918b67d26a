//! Interactive review of paired samples.
//!
//! [`ReviewSession`] is the navigation state machine: an ordered working set
//! that only ever shrinks, a cursor into it, and [`ReviewSession::apply`],
//! which handles exactly one key at a time. Rendering, key input and file
//! moves are reached through the [`Frontend`], [`ColorSource`] and
//! [`SampleStore`] traits, so the machine runs the same against a window or a
//! scripted test double.
//!
//! Invariant: while the session is browsing, `cursor < working_set.len()`.

mod report;

pub use report::{EndReason, SessionSummary};

use image::RgbImage;
use log::{debug, info};

use crate::error::CullError;
use crate::filter::Sample;
use crate::quarantine::Quarantine;
use crate::render::{render_frame, ColorSource};

/// Operator input, already decoded from physical keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    Previous,
    Next,
    Reject,
    /// Any key without a binding.
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Browsing,
    Terminated,
}

/// What a single [`ReviewSession::apply`] call did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Cursor moved from one index to another.
    Moved { from: usize, to: usize },
    /// Key had no effect (unbound key, or navigation at a boundary).
    Stayed,
    /// Sample was quarantined and dropped from the working set.
    Rejected { basename: String },
    /// Operator quit.
    Quit,
}

/// Where rejected samples go.
pub trait SampleStore {
    /// Move every file of `sample` out of the dataset. Must either move all
    /// of them or leave all in place.
    fn quarantine_sample(&mut self, sample: &Sample) -> Result<(), CullError>;
}

impl SampleStore for Quarantine {
    fn quarantine_sample(&mut self, sample: &Sample) -> Result<(), CullError> {
        self.move_together(&sample.files()).map(|_| ())
    }
}

/// Presents frames and blocks for the operator's next key.
pub trait Frontend {
    fn present(&mut self, frame: &RgbImage, caption: &str) -> Result<(), CullError>;
    fn next_key(&mut self) -> Result<KeyCommand, CullError>;
}

/// The working set, the cursor, and the session state.
#[derive(Clone, Debug)]
pub struct ReviewSession {
    working_set: Vec<Sample>,
    cursor: usize,
    state: SessionState,
    rejected: Vec<String>,
}

impl ReviewSession {
    /// Start browsing at index 0, or start terminated if there is nothing to
    /// review.
    pub fn new(working_set: Vec<Sample>) -> Self {
        let state = if working_set.is_empty() {
            SessionState::Terminated
        } else {
            SessionState::Browsing
        };
        Self {
            working_set,
            cursor: 0,
            state,
            rejected: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.working_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working_set.is_empty()
    }

    pub fn working_set(&self) -> &[Sample] {
        &self.working_set
    }

    /// Basenames rejected so far, in rejection order.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// The sample under the cursor, if browsing.
    pub fn current(&self) -> Option<&Sample> {
        match self.state {
            SessionState::Browsing => self.working_set.get(self.cursor),
            SessionState::Terminated => None,
        }
    }

    /// Entry check for an iteration: terminates the session once the
    /// working set is empty, otherwise returns the sample to display.
    pub fn begin_iteration(&mut self) -> Option<&Sample> {
        if self.working_set.is_empty() {
            self.state = SessionState::Terminated;
        }
        self.current()
    }

    /// Apply one key.
    ///
    /// A reject moves the files first and only then drops the sample from
    /// the working set, so a failed move leaves the session unchanged.
    pub fn apply(
        &mut self,
        key: KeyCommand,
        store: &mut dyn SampleStore,
    ) -> Result<Transition, CullError> {
        if self.state == SessionState::Terminated {
            return Ok(Transition::Stayed);
        }

        let transition = match key {
            KeyCommand::Quit => {
                self.state = SessionState::Terminated;
                Transition::Quit
            }
            KeyCommand::Previous if self.cursor > 0 => {
                self.cursor -= 1;
                Transition::Moved {
                    from: self.cursor + 1,
                    to: self.cursor,
                }
            }
            KeyCommand::Next if self.cursor + 1 < self.working_set.len() => {
                self.cursor += 1;
                Transition::Moved {
                    from: self.cursor - 1,
                    to: self.cursor,
                }
            }
            KeyCommand::Reject => {
                let Some(sample) = self.working_set.get(self.cursor) else {
                    self.state = SessionState::Terminated;
                    return Ok(Transition::Stayed);
                };
                store.quarantine_sample(sample)?;

                let removed = self.working_set.remove(self.cursor);
                self.cursor = self.cursor.saturating_sub(1);
                info!("rejected {}", removed.basename);
                self.rejected.push(removed.basename.clone());
                Transition::Rejected {
                    basename: removed.basename,
                }
            }
            KeyCommand::Previous | KeyCommand::Next | KeyCommand::Other => Transition::Stayed,
        };

        debug!("{:?} -> {:?} (cursor {})", key, transition, self.cursor);
        Ok(transition)
    }
}

/// Run the review loop until the operator quits or nothing is left.
///
/// Each iteration re-reads the image and labels of the current sample from
/// disk. Decode and label errors end the session with that error.
pub fn run_session(
    session: &mut ReviewSession,
    frontend: &mut dyn Frontend,
    colors: &mut dyn ColorSource,
    store: &mut dyn SampleStore,
) -> Result<SessionSummary, CullError> {
    let mut frames_shown = 0usize;
    let mut end_reason = EndReason::Exhausted;

    while let Some(sample) = session.begin_iteration() {
        let sample = sample.clone();
        let frame = render_frame(&sample, colors)?;
        let caption = caption_for(&sample, session.cursor(), session.len());
        frontend.present(&frame, &caption)?;
        frames_shown += 1;

        let key = frontend.next_key()?;
        if session.apply(key, store)? == Transition::Quit {
            end_reason = EndReason::Quit;
            break;
        }
    }

    let summary = SessionSummary {
        frames_shown,
        rejected: session.rejected().to_vec(),
        remaining: session.len(),
        end_reason,
    };
    info!(
        "review finished ({:?}): {} rejected, {} remaining",
        summary.end_reason,
        summary.rejected.len(),
        summary.remaining
    );
    Ok(summary)
}

fn caption_for(sample: &Sample, cursor: usize, len: usize) -> String {
    format!(
        "{} ({}/{})  a/Left prev  d/Right next  x/Del reject  q/Esc quit",
        sample.basename,
        cursor + 1,
        len
    )
}
