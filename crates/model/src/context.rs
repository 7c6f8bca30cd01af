use crate::types::{BoundedContext, Project, IDENTITY_SEPARATOR};
use std::collections::BTreeMap;

/// Namespace segments that mark an architectural layer
pub const LAYER_MARKERS: [&str; 3] = ["Domain", "Infrastructure", "Application"];

/// Infer the bounded context an identity belongs to.
///
/// Looks for the leftmost `\<Context>\<Layer>\` run, where `<Layer>` is one
/// of [`LAYER_MARKERS`]. The context segment must be preceded by a separator
/// and the layer segment followed by one, so `Billing\Domain\Invoice` and
/// `Shop\Billing\Domain` have no context.
///
/// Only the single segment before the layer is taken:
/// `App\Shop\Billing\Domain\Invoice` is `Billing`, not `Shop\Billing` as a
/// greedy match from the first separator would give.
pub fn infer_bounded_context(identity: &str) -> Option<&str> {
    let segments: Vec<&str> = identity.split(IDENTITY_SEPARATOR).collect();

    // segments[i] is the context, segments[i + 1] the layer, segments[i + 2]
    // guarantees the trailing separator
    (1..segments.len().saturating_sub(2))
        .find(|&i| !segments[i].is_empty() && LAYER_MARKERS.contains(&segments[i + 1]))
        .map(|i| segments[i])
}

/// Group every entity identity of a project by inferred bounded context.
///
/// Identities are appended kind by kind in map order; identities without a
/// context are left out.
pub fn partition_bounded_contexts(project: &Project) -> BTreeMap<String, BoundedContext> {
    let mut contexts = BTreeMap::new();

    for identity in project.aggregates.keys() {
        assign(&mut contexts, identity, |c| &mut c.aggregates);
    }
    for identity in project.events.keys() {
        assign(&mut contexts, identity, |c| &mut c.events);
    }
    for identity in project.commands.keys() {
        assign(&mut contexts, identity, |c| &mut c.commands);
    }
    for identity in project.subscribers.keys() {
        assign(&mut contexts, identity, |c| &mut c.subscribers);
    }
    for identity in project.user_interfaces.keys() {
        assign(&mut contexts, identity, |c| &mut c.user_interfaces);
    }

    contexts
}

fn assign(
    contexts: &mut BTreeMap<String, BoundedContext>,
    identity: &str,
    members: fn(&mut BoundedContext) -> &mut Vec<String>,
) {
    let Some(name) = infer_bounded_context(identity) else {
        return;
    };

    let context = contexts
        .entry(name.to_string())
        .or_insert_with(|| BoundedContext::new(name));
    members(context).push(identity.to_string());
}
