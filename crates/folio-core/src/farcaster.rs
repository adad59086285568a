//! Farcaster widget pipeline
//!
//! Profile, cast and follow-list normalization, influence ranking and
//! assembly of the social graph and trend keywords from Neynar payloads.

use std::collections::HashSet;

use chrono::Utc;

use crate::keywords::extract_trend_keywords;
use crate::layout::build_graph;
use crate::models::*;
use crate::numeric::{collapse_whitespace, count, text_or};
use crate::raw::{FollowResponse, NeynarCast, NeynarUser, UserByUsernameResponse, UserFeedResponse};

pub const TOP_USER_LIMIT: usize = 6;
/// Accounts per ring drawn in the graph
pub const GRAPH_RING_LIMIT: usize = 5;
pub const RECENT_CAST_LIMIT: usize = 6;

const DEFAULT_BIO: &str = "Building AI-native Web3 products.";

/// Raw payloads fetched for one Farcaster widget
#[derive(Debug, Clone)]
pub struct FarcasterPayloads {
    pub profile: UserByUsernameResponse,
    pub casts: UserFeedResponse,
    pub followers: FollowResponse,
    pub following: FollowResponse,
}

pub fn to_user_snapshot(user: &NeynarUser) -> FarcasterUserSnapshot {
    let username = text_or(user.username.as_deref(), "");
    FarcasterUserSnapshot {
        fid: user.fid.unwrap_or_default(),
        display_name: text_or(user.display_name.as_deref(), &username),
        username,
        follower_count: count(user.follower_count),
        following_count: count(user.following_count),
    }
}

pub fn to_profile_snapshot(user: &NeynarUser) -> FarcasterProfileSnapshot {
    let bio = user
        .profile
        .as_ref()
        .and_then(|p| p.bio.as_ref())
        .and_then(|b| b.text.as_deref())
        .unwrap_or(DEFAULT_BIO);

    FarcasterProfileSnapshot {
        user: to_user_snapshot(user),
        bio: collapse_whitespace(bio),
    }
}

pub fn to_cast_snapshot(cast: NeynarCast) -> FarcasterCastSnapshot {
    let channel = cast.channel.and_then(|c| c.id.or(c.name));
    let (likes, recasts) = cast
        .reactions
        .map(|r| (count(r.likes_count), count(r.recasts_count)))
        .unwrap_or_default();

    FarcasterCastSnapshot {
        hash: cast.hash,
        text: collapse_whitespace(cast.text.as_deref().unwrap_or_default()),
        timestamp: cast.timestamp.unwrap_or_default(),
        channel,
        likes,
        recasts,
        replies: cast.replies.map(|r| count(r.count)).unwrap_or_default(),
    }
}

/// Non-empty casts in feed order, capped at [`RECENT_CAST_LIMIT`]
pub fn normalize_casts(feed: UserFeedResponse) -> Vec<FarcasterCastSnapshot> {
    feed.casts
        .into_iter()
        .map(to_cast_snapshot)
        .filter(|cast| !cast.text.is_empty())
        .take(RECENT_CAST_LIMIT)
        .collect()
}

/// Follow list with duplicates removed (first occurrence wins), entries
/// without a fid dropped and the profile's own fid excluded.
pub fn normalize_follow_users(payload: &FollowResponse, profile_fid: u64) -> Vec<FarcasterUserSnapshot> {
    let mut seen = HashSet::new();
    payload
        .users
        .iter()
        .filter(|entry| entry.user.fid.is_some())
        .map(|entry| to_user_snapshot(&entry.user))
        .filter(|user| user.fid != profile_fid && seen.insert(user.fid))
        .collect()
}

/// Rank by follower count, then following count, both descending; equal
/// pairs keep input order.
pub fn select_top_by_influence(users: &[FarcasterUserSnapshot], limit: usize) -> Vec<FarcasterUserSnapshot> {
    let mut ranked: Vec<(usize, &FarcasterUserSnapshot)> = users.iter().enumerate().collect();
    ranked.sort_by(|(ia, a), (ib, b)| {
        b.follower_count
            .cmp(&a.follower_count)
            .then(b.following_count.cmp(&a.following_count))
            .then(ia.cmp(ib))
    });

    ranked.into_iter().take(limit).map(|(_, user)| user.clone()).collect()
}

/// Top followers, then top followed accounts that are not already listed
/// as followers. The two lists never share a fid.
pub fn select_disjoint_top(
    followers: &[FarcasterUserSnapshot],
    following: &[FarcasterUserSnapshot],
    limit: usize,
) -> (Vec<FarcasterUserSnapshot>, Vec<FarcasterUserSnapshot>) {
    let top_followers = select_top_by_influence(followers, limit);
    let follower_ids: HashSet<u64> = top_followers.iter().map(|u| u.fid).collect();

    let candidates: Vec<FarcasterUserSnapshot> = following
        .iter()
        .filter(|u| !follower_ids.contains(&u.fid))
        .cloned()
        .collect();

    (top_followers, select_top_by_influence(&candidates, limit))
}

/// Assemble a [`FarcasterWidgetData`] snapshot from fetched payloads
pub fn assemble_farcaster_widget(payloads: FarcasterPayloads) -> FarcasterWidgetData {
    let profile = to_profile_snapshot(&payloads.profile.user);
    let fid = profile.user.fid;

    let recent_casts = normalize_casts(payloads.casts);
    let followers = normalize_follow_users(&payloads.followers, fid);
    let following = normalize_follow_users(&payloads.following, fid);

    tracing::debug!(
        fid,
        casts = recent_casts.len(),
        followers = followers.len(),
        following = following.len(),
        "Normalized Farcaster payloads"
    );

    let (top_followers, top_following) = select_disjoint_top(&followers, &following, TOP_USER_LIMIT);

    let graph = build_graph(
        &profile.user,
        &top_followers[..top_followers.len().min(GRAPH_RING_LIMIT)],
        &top_following[..top_following.len().min(GRAPH_RING_LIMIT)],
    );

    let trend_keywords = extract_trend_keywords(recent_casts.iter().map(|c| c.text.as_str()));

    FarcasterWidgetData {
        profile,
        recent_casts,
        top_followers,
        top_following,
        graph_nodes: graph.nodes,
        graph_edges: graph.edges,
        trend_keywords,
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{FollowEntry, NeynarBio, NeynarChannel, NeynarProfile, NeynarReactions};
    use pretty_assertions::assert_eq;

    fn neynar(fid: u64, followers: f64, following: f64) -> NeynarUser {
        NeynarUser {
            fid: Some(fid),
            username: Some(format!("user{fid}")),
            display_name: Some(format!("User {fid}")),
            follower_count: Some(followers),
            following_count: Some(following),
            ..Default::default()
        }
    }

    fn follows(users: Vec<NeynarUser>) -> FollowResponse {
        FollowResponse {
            users: users.into_iter().map(|user| FollowEntry { user }).collect(),
        }
    }

    fn cast(text: &str) -> NeynarCast {
        NeynarCast {
            hash: format!("0x{}", text.len()),
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_user_snapshot_coerces_counts() {
        let mut raw = neynar(7, f64::NAN, -3.0);
        raw.display_name = None;

        let user = to_user_snapshot(&raw);
        assert_eq!(user.follower_count, 0);
        assert_eq!(user.following_count, 0);
        assert_eq!(user.display_name, "user7");
    }

    #[test]
    fn test_profile_bio_default_and_collapse() {
        let mut raw = neynar(1, 10.0, 10.0);
        assert_eq!(to_profile_snapshot(&raw).bio, DEFAULT_BIO);

        raw.profile = Some(NeynarProfile {
            bio: Some(NeynarBio {
                text: Some("  building\n\n onchain   things ".to_string()),
            }),
        });
        assert_eq!(to_profile_snapshot(&raw).bio, "building onchain things");
    }

    #[test]
    fn test_cast_channel_fallback_and_counts() {
        let mut raw = cast("gm");
        raw.channel = Some(NeynarChannel {
            id: None,
            name: Some("Base".to_string()),
        });
        raw.reactions = Some(NeynarReactions {
            likes_count: Some(12.0),
            recasts_count: None,
        });

        let snapshot = to_cast_snapshot(raw);
        assert_eq!(snapshot.channel.as_deref(), Some("Base"));
        assert_eq!(snapshot.likes, 12);
        assert_eq!(snapshot.recasts, 0);
        assert_eq!(snapshot.replies, 0);
    }

    #[test]
    fn test_normalize_casts_drops_empty_and_caps() {
        let mut casts: Vec<NeynarCast> = vec![cast("   "), NeynarCast::default()];
        casts.extend((0..10).map(|i| cast(&format!("cast number {i}"))));

        let recent = normalize_casts(UserFeedResponse { casts });
        assert_eq!(recent.len(), RECENT_CAST_LIMIT);
        assert_eq!(recent[0].text, "cast number 0");
    }

    #[test]
    fn test_follow_users_dedup_and_exclude_self() {
        let payload = follows(vec![
            neynar(2, 50.0, 1.0),
            neynar(1, 999.0, 1.0),
            neynar(2, 75.0, 1.0),
            neynar(3, 10.0, 1.0),
        ]);

        let users = normalize_follow_users(&payload, 1);
        let fids: Vec<_> = users.iter().map(|u| u.fid).collect();
        assert_eq!(fids, vec![2, 3]);
        assert_eq!(users[0].follower_count, 50);
    }

    #[test]
    fn test_follow_users_drop_entries_without_fid() {
        let mut nameless = neynar(0, 5_000.0, 1.0);
        nameless.fid = None;

        let payload = follows(vec![nameless, neynar(4, 20.0, 1.0), NeynarUser::default()]);

        let users = normalize_follow_users(&payload, 1);
        let fids: Vec<_> = users.iter().map(|u| u.fid).collect();
        assert_eq!(fids, vec![4]);
    }

    #[test]
    fn test_select_top_tie_breaks() {
        let users: Vec<_> = [
            neynar(1, 100.0, 5.0),
            neynar(2, 300.0, 1.0),
            neynar(3, 100.0, 9.0),
            neynar(4, 100.0, 5.0),
        ]
        .iter()
        .map(to_user_snapshot)
        .collect();

        let fids: Vec<_> = select_top_by_influence(&users, 3).iter().map(|u| u.fid).collect();
        assert_eq!(fids, vec![2, 3, 1]);
    }

    #[test]
    fn test_top_lists_are_disjoint() {
        let followers: Vec<_> = (1..=8).map(|fid| to_user_snapshot(&neynar(fid, fid as f64 * 10.0, 0.0))).collect();
        let following: Vec<_> = (5..=12).map(|fid| to_user_snapshot(&neynar(fid, fid as f64 * 10.0, 0.0))).collect();

        let (top_followers, top_following) = select_disjoint_top(&followers, &following, TOP_USER_LIMIT);
        let follower_ids: HashSet<_> = top_followers.iter().map(|u| u.fid).collect();

        assert_eq!(top_followers.len(), TOP_USER_LIMIT);
        assert!(top_following.iter().all(|u| !follower_ids.contains(&u.fid)));
        let following_ids: Vec<_> = top_following.iter().map(|u| u.fid).collect();
        assert_eq!(following_ids, vec![12, 11, 10, 9]);
    }

    #[test]
    fn test_assemble_widget() {
        let payloads = FarcasterPayloads {
            profile: UserByUsernameResponse {
                user: neynar(100, 5_000.0, 300.0),
            },
            casts: UserFeedResponse {
                casts: vec![
                    cast("Shipping frames on https://example.com today"),
                    cast("frames frames and more frames"),
                ],
            },
            followers: follows((1..=7).map(|fid| neynar(fid, fid as f64, 0.0)).chain([neynar(100, 1.0, 1.0)]).collect()),
            following: follows(vec![neynar(7, 7.0, 0.0), neynar(50, 20.0, 0.0)]),
        };

        let widget = assemble_farcaster_widget(payloads);

        assert_eq!(widget.profile.user.fid, 100);
        assert_eq!(widget.top_followers.len(), TOP_USER_LIMIT);
        assert_eq!(widget.top_followers[0].fid, 7);
        // fid 7 is already a top follower
        let following_ids: Vec<_> = widget.top_following.iter().map(|u| u.fid).collect();
        assert_eq!(following_ids, vec![50]);

        // core + 5 followers + 1 following
        assert_eq!(widget.graph_nodes.len(), 7);
        assert_eq!(widget.graph_edges.len(), 6);
        assert_eq!(widget.graph_nodes[0].id, "fid-100");

        assert_eq!(widget.trend_keywords[0].term, "frames");
        assert_eq!(widget.trend_keywords[0].mentions, 4);

        let json = serde_json::to_value(&widget).unwrap();
        assert_eq!(json["profile"]["fid"], 100);
        assert_eq!(json["profile"]["followerCount"], 5000);
        assert_eq!(json["graphNodes"][0]["tier"], "core");
        assert!(json.get("generatedAt").is_some());
    }
}
