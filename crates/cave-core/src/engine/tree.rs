//! Minimal behavior tree used to run the strategy cascade.
//!
//! Every tick completes immediately: nodes either succeed or fail, there is no
//! running state. The cascade is a single [`Selector`] whose children are the
//! strategies in priority order.

/// Result of evaluating a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The strategy produced a move (or the condition held).
    Success,
    /// The strategy does not apply this tick.
    Failure,
}

impl Status {
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// `Success` when `condition` holds.
    #[inline]
    pub fn from_bool(condition: bool) -> Self {
        if condition {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

/// A node evaluated against a mutable blackboard `C`.
pub trait Behavior<C>: Send + Sync {
    fn tick(&self, ctx: &mut C) -> Status;
}

impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }
}

/// Tries children left to right and stops at the first success.
///
/// An empty selector always fails.
pub struct Selector<C> {
    children: Vec<Box<dyn Behavior<C>>>,
}

impl<C> Selector<C> {
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        Self { children }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<C> Behavior<C> for Selector<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_success() {
                return Status::Success;
            }
        }
        Status::Failure
    }
}
