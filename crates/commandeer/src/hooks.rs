//! Lifecycle hooks and action handlers.
//!
//! Pre-subcommand hooks run while the parse descends, each one just before
//! its command hands the remaining tokens to a subcommand. The rest run
//! around the action of the command the parse resolves to:
//!
//! ```text
//! argv
//!   → scan level, PRE-SUBCOMMAND hooks, scan subcommand, ...
//!   → PRE-ACTION hooks      (leaf and ancestors, outermost first)
//!   → action
//!   → subcommand observers  (registered on the leaf's parent)
//!   → POST-ACTION hooks     (exact reverse of pre-action order)
//! ```
//!
//! Handlers are either synchronous closures or closures returning a boxed
//! future. The synchronous entry point refuses an async pre-subcommand hook
//! when it reaches one, and refuses a pre-action/action/post-action
//! pipeline that contains an async handler before running any of it.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::matches::Invocation;

pub type SyncHandlerFn = Arc<dyn Fn(&Invocation) -> anyhow::Result<()> + Send + Sync>;
pub type AsyncHandlerFn =
    Arc<dyn Fn(Invocation) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// A hook or action body.
#[derive(Clone)]
pub enum Handler {
    Sync(SyncHandlerFn),
    Async(AsyncHandlerFn),
}

impl Handler {
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&Invocation) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Handler::Sync(Arc::new(f))
    }

    pub fn from_async<F>(f: F) -> Self
    where
        F: Fn(Invocation) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync + 'static,
    {
        Handler::Async(Arc::new(f))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Handler::Async(_))
    }

    pub(crate) async fn call(&self, invocation: Invocation) -> anyhow::Result<()> {
        match self {
            Handler::Sync(f) => f(&invocation),
            Handler::Async(f) => f(invocation).await,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Sync(_) => f.write_str("Handler::Sync(..)"),
            Handler::Async(_) => f.write_str("Handler::Async(..)"),
        }
    }
}

/// The hook points a command can register for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    /// Before a command delegates to one of its direct subcommands.
    PreSubcommand,
    /// Before the action of this command or any descendant.
    PreAction,
    /// After the action of this command or any descendant.
    PostAction,
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookEvent::PreSubcommand => write!(f, "preSubcommand"),
            HookEvent::PreAction => write!(f, "preAction"),
            HookEvent::PostAction => write!(f, "postAction"),
        }
    }
}

/// Per-command hook lists, in registration order.
#[derive(Clone, Default, Debug)]
pub struct Hooks {
    pre_subcommand: Vec<Handler>,
    pre_action: Vec<Handler>,
    post_action: Vec<Handler>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, event: HookEvent, handler: Handler) {
        self.list_mut(event).push(handler);
    }

    pub fn get(&self, event: HookEvent) -> &[Handler] {
        match event {
            HookEvent::PreSubcommand => &self.pre_subcommand,
            HookEvent::PreAction => &self.pre_action,
            HookEvent::PostAction => &self.post_action,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pre_subcommand.is_empty() && self.pre_action.is_empty() && self.post_action.is_empty()
    }

    fn list_mut(&mut self, event: HookEvent) -> &mut Vec<Handler> {
        match event {
            HookEvent::PreSubcommand => &mut self.pre_subcommand,
            HookEvent::PreAction => &mut self.pre_action,
            HookEvent::PostAction => &mut self.post_action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn test_hooks_keep_registration_order() {
        let mut hooks = Hooks::new();
        assert!(hooks.is_empty());
        hooks.add(HookEvent::PreAction, Handler::sync(|_| Ok(())));
        hooks.add(
            HookEvent::PreAction,
            Handler::from_async(|_| async { Ok(()) }.boxed()),
        );

        let pre = hooks.get(HookEvent::PreAction);
        assert_eq!(pre.len(), 2);
        assert!(!pre[0].is_async());
        assert!(pre[1].is_async());
        assert!(hooks.get(HookEvent::PostAction).is_empty());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(HookEvent::PreSubcommand.to_string(), "preSubcommand");
    }
}
