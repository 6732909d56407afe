//! Rewrite driver.
//!
//! Resolves every pending transform of one reason in a single substitution
//! pass. Before anything is cloned, all deep ancestors of the roots get an
//! identity token; replacements are memoized on `(transform, token)`, so nodes
//! that were one node before cloning get one replacement object, however many
//! paths lead to them.

use std::collections::HashMap;
use std::sync::Arc;

use glimpse_ir::provenance::{PROVENANCE_TRACKER, PassName};
use glimpse_ir::{Node, Rewriter, substitute};

use crate::catalog::{Transform, TransformId};
use crate::error::{Error, Result};
use crate::hyper::Hyperparameters;
use crate::identity::{tag_with_id, tag_with_ids};
use crate::random::RandomSource;
use crate::registry::pop_transforms;
use crate::tags::{OriginId, Reason, TagTable};
use crate::walk::deep_ancestors;

type Memo = HashMap<(TransformId, OriginId), Arc<Node>>;

struct TransformRewriter<'a> {
    tags: &'a mut TagTable,
    reason: &'a Reason,
    hyperparameters: &'a Hyperparameters,
    rng: &'a mut dyn RandomSource,
    memo: Memo,
    applied: usize,
    memo_hits: usize,
}

impl TransformRewriter<'_> {
    fn apply_one(&mut self, transform: &Arc<Transform>, working: Arc<Node>) -> Result<Arc<Node>> {
        let origin = tag_with_id(self.tags, &working);
        let key = (transform.id(), origin);

        if let Some(hit) = self.memo.get(&key) {
            self.memo_hits += 1;
            tracing::debug!(%transform, %origin, node.id = working.id, replacement.id = hit.id, "memo hit");
            return Ok(hit.clone());
        }

        let replacement = transform
            .apply(&working, self.hyperparameters, &mut *self.rng)
            .inspect_err(|err| log_failure(&working, err))?;

        // No-op results are not memoized
        if Arc::ptr_eq(&replacement, &working) {
            return Ok(working);
        }

        self.applied += 1;
        tracing::debug!(%transform, %origin, node.id = working.id, replacement.id = replacement.id, "applied");
        PROVENANCE_TRACKER.with(|tracker| {
            tracker.borrow_mut().record_transform(replacement.id, working.id, PassName::Transform);
        });

        tag_with_ids(self.tags, &deep_ancestors(std::slice::from_ref(&replacement)));
        self.memo.insert(key, replacement.clone());
        Ok(replacement)
    }
}

impl Rewriter for TransformRewriter<'_> {
    type Error = Error;

    fn rebuilt(&mut self, original: &Arc<Node>, rebuilt: &Arc<Node>) {
        self.tags.inherit(original, rebuilt);
    }

    fn rewrite(&mut self, node: Arc<Node>) -> Result<Arc<Node>> {
        let (clone, transforms) = pop_transforms(self.tags, &node, self.reason);
        if transforms.is_empty() {
            return Ok(node);
        }

        let mut working = clone.clone();
        for transform in &transforms {
            working = self.apply_one(transform, working)?;
        }

        if Arc::ptr_eq(&working, &clone) {
            // Every transform was a no-op; keep the original instead of its clone
            self.tags.remove(&clone);
            return Ok(node);
        }
        Ok(working)
    }
}

fn log_failure(node: &Node, error: &Error) {
    match error {
        Error::Ir { source } => glimpse_ir::error::log_provenance(node.id, source),
        other => tracing::error!(node.id = node.id, error = %other, "transform failed"),
    }
}

/// Apply every transform pending for `reason` in the graphs rooted at `roots`.
///
/// Returns the rewritten roots in the order given. Transforms run in
/// registration order, each on the previous one's result. Transforms pending
/// for other reasons are carried over to the rewritten nodes untouched, and
/// the tags of the input graph are left as they were apart from newly
/// assigned identity tokens.
///
/// # Errors
///
/// The first transform error aborts the pass; nothing is returned.
#[tracing::instrument(skip_all, fields(reason = %reason, roots = roots.len()))]
pub fn apply_transforms(
    tags: &mut TagTable,
    roots: &[Arc<Node>],
    reason: &Reason,
    hyperparameters: &Hyperparameters,
    rng: &mut dyn RandomSource,
) -> Result<Vec<Arc<Node>>> {
    tag_with_ids(tags, &deep_ancestors(roots));

    let mut rewriter =
        TransformRewriter { tags, reason, hyperparameters, rng, memo: Memo::new(), applied: 0, memo_hits: 0 };
    let rewritten = substitute(roots, &mut rewriter)?;

    tracing::debug!(applied = rewriter.applied, memo_hits = rewriter.memo_hits, "transforms applied");
    Ok(rewritten)
}
