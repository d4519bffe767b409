//! Patch - Apply a patch tree to the live host tree.
//!
//! The host tree must have the shape of the old virtual tree the patch was
//! computed from. A `Replace` or `Update` aimed at a missing child means it
//! does not, and is reported as [`PatchError::MissingNode`].

use tracing::trace;

use super::{Patch, PropPatch, Reconciler};
use crate::error::PatchError;
use crate::host::HostAdapter;

impl<H: HostAdapter> Reconciler<'_, H> {
    /// Apply `patch` to the child of `parent` at `index`.
    pub fn apply_patch(
        &mut self,
        parent: &H::Node,
        patch: Option<&Patch>,
        index: usize,
    ) -> Result<(), PatchError> {
        let Some(patch) = patch else {
            return Ok(());
        };

        match patch {
            Patch::Create(node) => {
                trace!(index, "create");
                let host_node = self.materialize(node);
                self.host.append_child(parent, host_node);
            }
            Patch::Remove => {
                trace!(index, "remove");
                if let Some(child) = self.host.child_at(parent, index) {
                    self.host.remove_child(parent, &child);
                }
            }
            Patch::Replace(node) => {
                trace!(index, "replace");
                let old = self
                    .host
                    .child_at(parent, index)
                    .ok_or(PatchError::MissingNode { index })?;
                let host_node = self.materialize(node);
                self.host.replace_child(parent, &old, host_node);
            }
            Patch::Update { props, children } => {
                let node = self
                    .host
                    .child_at(parent, index)
                    .ok_or(PatchError::MissingNode { index })?;
                for prop in props {
                    match prop {
                        PropPatch::Set(key, value) => self.set_prop(&node, key, value),
                        PropPatch::Remove(key) => self.remove_prop(&node, key),
                    }
                }
                self.apply_children(&node, children)?;
            }
        }

        Ok(())
    }

    /// Apply one patch per child index of `parent`.
    ///
    /// Trailing `Remove`s are applied from the highest index down; removing
    /// in ascending order would shift later children under the cursor.
    pub fn apply_children(
        &mut self,
        parent: &H::Node,
        patches: &[Option<Patch>],
    ) -> Result<(), PatchError> {
        for (index, patch) in patches.iter().enumerate() {
            if !matches!(patch, Some(Patch::Remove)) {
                self.apply_patch(parent, patch.as_ref(), index)?;
            }
        }
        for (index, patch) in patches.iter().enumerate().rev() {
            if matches!(patch, Some(Patch::Remove)) {
                self.apply_patch(parent, patch.as_ref(), index)?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
