//! Social graph layout
//!
//! Places the profile at the center of a 0-100 canvas and spreads followers
//! and followed accounts over two disjoint arcs at a fixed radius.

use crate::models::{FarcasterGraphEdge, FarcasterGraphNode, FarcasterUserSnapshot, NodeTier};

pub const CENTER: f64 = 50.0;
pub const RADIUS: f64 = 32.0;

/// Arc (degrees) used for followers, upper half of the canvas
pub const FOLLOWER_ARC: (f64, f64) = (210.0, 330.0);
/// Arc (degrees) used for followed accounts, lower half of the canvas
pub const FOLLOWING_ARC: (f64, f64) = (30.0, 150.0);

pub const MIN_INFLUENCE: f64 = 0.18;
const MIN_EDGE_WEIGHT: f64 = 0.35;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialGraph {
    pub nodes: Vec<FarcasterGraphNode>,
    pub edges: Vec<FarcasterGraphEdge>,
}

/// `clamp(log10(followers + 1) / 6, 0.18, 1)`
pub fn influence_score(follower_count: u64) -> f64 {
    ((follower_count as f64 + 1.0).log10() / 6.0).clamp(MIN_INFLUENCE, 1.0)
}

/// `0.35 + influence * 0.65`
pub fn edge_weight(influence: f64) -> f64 {
    MIN_EDGE_WEIGHT + influence * (1.0 - MIN_EDGE_WEIGHT)
}

/// Evenly spaced angles from `start` to `end` inclusive. A single angle sits
/// in the middle of the arc.
pub fn distribute_angles(count: usize, start: f64, end: f64) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![(start + end) / 2.0],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

pub fn polar_to_cartesian(center_x: f64, center_y: f64, radius: f64, angle_deg: f64) -> (f64, f64) {
    let radians = angle_deg.to_radians();
    (
        center_x + radius * radians.cos(),
        center_y + radius * radians.sin(),
    )
}

fn node_id(fid: u64) -> String {
    format!("fid-{fid}")
}

/// Lay out the core profile with its followers and followed accounts.
///
/// Callers pass already-ranked, disjoint lists. Influence only affects the
/// node's rendered size and the edge weight, never its position.
pub fn build_graph(
    profile: &FarcasterUserSnapshot,
    followers: &[FarcasterUserSnapshot],
    following: &[FarcasterUserSnapshot],
) -> SocialGraph {
    let core_id = node_id(profile.fid);
    let mut graph = SocialGraph {
        nodes: vec![FarcasterGraphNode {
            id: core_id.clone(),
            fid: profile.fid,
            username: profile.username.clone(),
            label: profile.display_name.clone(),
            tier: NodeTier::Core,
            influence: 1.0,
            x: CENTER,
            y: CENTER,
        }],
        edges: Vec::with_capacity(followers.len() + following.len()),
    };

    let rings = [
        (followers, NodeTier::Follower, FOLLOWER_ARC),
        (following, NodeTier::Following, FOLLOWING_ARC),
    ];

    for (users, tier, (start, end)) in rings {
        let angles = distribute_angles(users.len(), start, end);

        for (user, angle) in users.iter().zip(angles) {
            let (x, y) = polar_to_cartesian(CENTER, CENTER, RADIUS, angle);
            let id = node_id(user.fid);
            let influence = influence_score(user.follower_count);

            graph.edges.push(FarcasterGraphEdge {
                id: format!("{core_id}-{id}"),
                source_id: core_id.clone(),
                target_id: id.clone(),
                weight: edge_weight(influence),
            });

            graph.nodes.push(FarcasterGraphNode {
                id,
                fid: user.fid,
                username: user.username.clone(),
                label: user.display_name.clone(),
                tier,
                influence,
                x,
                y,
            });
        }
    }

    graph
}
