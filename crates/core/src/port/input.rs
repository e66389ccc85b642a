// Input Port - the three-button hardware boundary

use crate::domain::ButtonEdges;

/// Input interface sampled once per control-loop frame.
///
/// Implementations own debouncing and edge detection; `poll_edges` must
/// report one-shot "was pressed" transitions, so a held button fires once.
pub trait InputPort: Send {
    fn poll_edges(&mut self) -> ButtonEdges;
}

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted input for tests: pops one frame of edges per poll.
    pub struct MockInput {
        frames: VecDeque<ButtonEdges>,
    }

    impl MockInput {
        pub fn new(frames: impl IntoIterator<Item = ButtonEdges>) -> Self {
            Self {
                frames: frames.into_iter().collect(),
            }
        }
    }

    impl InputPort for MockInput {
        fn poll_edges(&mut self) -> ButtonEdges {
            self.frames.pop_front().unwrap_or_default()
        }
    }
}
