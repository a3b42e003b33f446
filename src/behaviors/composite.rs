use std::fmt;

use super::{Behavior, BehaviorWindow};
use crate::particle::Particle;

/// 组合行为：按加入顺序对同一粒子依次应用子行为
///
/// 自身窗口只决定整体是否生效；每个子行为按自己的窗口计算进度。
pub struct CompositeBehavior {
    pub window: BehaviorWindow,
    children: Vec<Box<dyn Behavior>>,
}

impl CompositeBehavior {
    pub fn new() -> Self {
        Self {
            window: BehaviorWindow::default(),
            children: Vec::new(),
        }
    }

    pub fn with(mut self, behavior: impl Behavior + 'static) -> Self {
        self.children.push(Box::new(behavior));
        self
    }

    pub fn push(&mut self, behavior: Box<dyn Behavior>) {
        self.children.push(behavior);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Default for CompositeBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CompositeBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeBehavior")
            .field(
                "children",
                &self.children.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Behavior for CompositeBehavior {
    fn window(&self) -> &BehaviorWindow {
        &self.window
    }

    fn window_mut(&mut self) -> &mut BehaviorWindow {
        &mut self.window
    }

    fn apply_progress(&mut self, particle: &mut Particle, _progress: f64, dt: f64) {
        for child in &mut self.children {
            child.apply(particle, dt);
        }
    }

    fn name(&self) -> &'static str {
        "composite"
    }
}
