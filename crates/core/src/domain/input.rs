// Input Domain Model - one-shot button edges from the hardware boundary

/// The three physical buttons, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Button 0 - previous tab / confirm stop.
    Previous,
    /// Button 1 - play / request stop / cancel.
    Play,
    /// Button 2 - next tab / cancel.
    Next,
}

/// One frame's worth of "was pressed" edges.
///
/// Edges are one-shot transitions, not level state: a held button fires
/// exactly once. The input adapter owns debouncing and edge detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEdges {
    pub previous: bool,
    pub play: bool,
    pub next: bool,
}

impl ButtonEdges {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn pressed(button: Button) -> Self {
        let mut edges = Self::default();
        match button {
            Button::Previous => edges.previous = true,
            Button::Play => edges.play = true,
            Button::Next => edges.next = true,
        }
        edges
    }

    pub fn any(&self) -> bool {
        self.previous || self.play || self.next
    }
}
