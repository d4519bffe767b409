//! RenderRoot - Binds a virtual tree to a host container.
//!
//! Keeps track of the previous resolved tree to enable diff-based
//! rendering. Only nodes that changed since the last render are touched.
//!
//! # Algorithm
//!
//! 1. Resolve the new root (components run, fragments spliced, origins kept)
//! 2. No previous tree: clear the container and materialize everything
//! 3. Otherwise: diff previous against new, apply patches to the container
//! 4. Store the new resolved tree as previous for the next comparison
//!
//! Hook cursor resets are left to the caller.

use tracing::debug;

use super::RenderConfig;
use crate::error::PatchError;
use crate::host::HostAdapter;
use crate::renderer::{Reconciler, ResolvedNode, diff_resolved_children, is_noop, resolve};
use crate::state::Hooks;
use crate::types::VNode;

/// A host container plus the virtual tree last rendered into it.
pub struct RenderRoot<H: HostAdapter> {
    host: H,
    container: H::Node,
    hooks: Hooks,
    config: RenderConfig,
    previous: Option<Vec<ResolvedNode>>,
    passes: usize,
}

impl<H: HostAdapter> RenderRoot<H> {
    pub fn new(host: H, container: H::Node, hooks: Hooks, config: RenderConfig) -> Self {
        Self {
            host,
            container,
            hooks,
            config,
            previous: None,
            passes: 0,
        }
    }

    /// Render `node` into the container.
    ///
    /// On error the previous tree is dropped, so the next render rebuilds
    /// the container from scratch.
    pub fn render(&mut self, node: &VNode) -> Result<(), PatchError> {
        let next = resolve(node, &self.hooks);
        self.passes += 1;

        let mut reconciler = Reconciler::new(&mut self.host, &self.hooks, &self.config);
        let result = match self.previous.take() {
            None => {
                debug!(pass = self.passes, nodes = next.len(), "full render");
                let nodes: Vec<VNode> = next.iter().map(ResolvedNode::to_vnode).collect();
                reconciler.replace_children(&self.container, &nodes);
                Ok(())
            }
            Some(previous) => {
                let patches = diff_resolved_children(&previous, &next);
                let changed = patches.iter().filter(|p| !is_noop(p.as_ref())).count();
                debug!(pass = self.passes, changed, "diff render");
                reconciler.apply_children(&self.container, &patches)
            }
        };

        match result {
            Ok(()) => {
                self.previous = Some(next);
                Ok(())
            }
            Err(err) => {
                self.previous = None;
                Err(err)
            }
        }
    }

    /// Forget the previous tree. Next render will be a full rebuild.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Check if we have a previous tree to diff against.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// The resolved tree of the last successful render.
    pub fn previous(&self) -> Option<&[ResolvedNode]> {
        self.previous.as_deref()
    }

    /// Completed render passes, successful or not.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn container(&self) -> &H::Node {
        &self.container
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Empty the container and forget the previous tree.
    pub fn clear(&mut self) {
        self.host.clear_contents(&self.container);
        self.previous = None;
    }
}

// =============================================================================
// Tests
// =============================================================================
