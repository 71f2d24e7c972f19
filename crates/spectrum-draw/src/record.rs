//! In-memory surface that records every draw call

use std::cell::RefCell;

use crate::draw::{DrawSurface, Rgb};
use crate::rect::CanvasRect;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: CanvasRect,
        color: Rgb,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        weight: f32,
        color: Rgb,
    },
    Polyline {
        points: Vec<(f32, f32)>,
        weight: f32,
        color: Rgb,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        font_size: u32,
        color: Rgb,
    },
}

/// Captures draw calls so frames can be inspected without a window.
#[derive(Default)]
pub struct RecordingSurface {
    commands: RefCell<Vec<DrawCommand>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<DrawCommand> {
        self.commands.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.commands.borrow_mut().clear();
    }

    pub fn rects(&self) -> Vec<CanvasRect> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, command: DrawCommand) {
        self.commands.borrow_mut().push(command);
    }
}

impl DrawSurface for RecordingSurface {
    fn fill_rect(&self, rect: CanvasRect, color: Rgb) {
        self.push(DrawCommand::FillRect { rect, color });
    }

    fn line(&self, from: (f32, f32), to: (f32, f32), weight: f32, color: Rgb) {
        self.push(DrawCommand::Line {
            from,
            to,
            weight,
            color,
        });
    }

    fn polyline(&self, points: &[(f32, f32)], weight: f32, color: Rgb) {
        self.push(DrawCommand::Polyline {
            points: points.to_vec(),
            weight,
            color,
        });
    }

    fn text(&self, text: &str, x: f32, y: f32, font_size: u32, color: Rgb) {
        self.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            font_size,
            color,
        });
    }
}
