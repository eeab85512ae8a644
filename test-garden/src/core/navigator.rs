//! Position tracking that steers each pass to the next unvisited scenario.
//!
//! The navigator never sees the scenario tree. It only counts: every scenario
//! call advances the sibling counter at the current depth, so the sequence of
//! counters (`position`) fingerprints a node as long as the bodies make the
//! same nested calls on every pass. The first node skipped after a leaf
//! completes becomes the target of the next pass; on that pass every branch
//! whose position diverges from the target is skipped without running.

use std::cmp::min;

/// What to do with a scenario call, decided before its body runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Frame pushed and enabled: execute the body.
    Run,
    /// A leaf already ran this pass. Nothing pushed; the position was recorded
    /// as the next target if none was.
    SkipRecording,
    /// The branch cannot lead to the target. Nothing pushed.
    SkipSilent,
    /// Frame pushed but disabled by the pattern filter. The body does not run;
    /// the frame is still popped on exit.
    SkipDescend,
}

/// Position-only part of a [`Decision`]; the filter turns `Enter` into
/// [`Decision::Run`] or [`Decision::SkipDescend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approach {
    Enter,
    SkipRecording,
    SkipSilent,
}

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    position: Vec<usize>,
    target: Option<Vec<usize>>,
    leaf_completed: bool,
    /// The pass started with a target that has not been reached yet.
    seeking: bool,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset per-pass state. The target recorded by the previous pass stays.
    pub fn begin_pass(&mut self) {
        self.leaf_completed = false;
        self.seeking = self.target.is_some();
    }

    /// Decide whether the scenario call at the current position is entered.
    pub fn approach(&mut self) -> Approach {
        if self.leaf_completed {
            if self.target.is_none() {
                self.target = Some(self.position.clone());
            }
            self.advance();
            return Approach::SkipRecording;
        }

        if let Some(target) = &self.target {
            let k = min(self.position.len(), target.len());
            if target[..k] != self.position[..k] {
                self.advance();
                return Approach::SkipSilent;
            }
            if *target == self.position {
                self.target = None;
                self.seeking = false;
            }
        }

        Approach::Enter
    }

    /// Open a nesting level; its first child will sit at counter `0`.
    pub fn descend(&mut self) {
        self.position.push(0);
    }

    /// Close the innermost level and advance the parent's sibling counter.
    ///
    /// `executed` marks a frame whose body ran (or was a stub); its exit ends
    /// the pass's one fresh leaf execution.
    pub fn ascend(&mut self, executed: bool) {
        self.position.pop();
        if executed {
            self.leaf_completed = true;
        }
        self.advance();
    }

    /// True if the open frame will be entered again on a later pass because
    /// the next target lies inside it.
    pub fn revisit_pending(&self) -> bool {
        let Some(target) = &self.target else {
            return false;
        };
        let here = &self.position[..self.position.len().saturating_sub(1)];
        target.len() > here.len() && target.starts_with(here)
    }

    /// Finish a pass. Returns whether another pass is needed.
    ///
    /// Errors with the unreached target when the pass never arrived at the
    /// position the previous pass recorded.
    pub fn end_pass(&self) -> Result<bool, Vec<usize>> {
        if self.seeking {
            return Err(self.target.clone().unwrap_or_default());
        }
        Ok(self.target.is_some())
    }

    pub fn depth(&self) -> usize {
        self.position.len()
    }

    pub fn position(&self) -> &[usize] {
        &self.position
    }

    pub fn target(&self) -> Option<&[usize]> {
        self.target.as_deref()
    }

    fn advance(&mut self) {
        if let Some(last) = self.position.last_mut() {
            *last += 1;
        }
    }
}
