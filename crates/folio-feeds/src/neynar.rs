//! Neynar client and Farcaster widget pipeline

use folio_core::farcaster::FarcasterPayloads;
use folio_core::raw::{FollowResponse, UserByUsernameResponse, UserFeedResponse};
use folio_core::{assemble_farcaster_widget, FarcasterWidgetData};

use crate::config::{FarcasterConfig, HttpConfig};
use crate::error::{DataSource, FeedError, Result};
use crate::gateway::{credential_header, HttpGateway};

const API_KEY_HEADER: &str = "api_key";
const PROFILE_ENDPOINT: &str = "/user/by_username";

/// HTTP client for the Neynar Farcaster API
pub struct NeynarClient {
    gateway: HttpGateway,
    config: FarcasterConfig,
}

impl NeynarClient {
    /// Fails with [`FeedError::MissingCredential`] when no API key is
    /// configured; no request is attempted without one.
    pub fn new(config: &FarcasterConfig, http: &HttpConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                FeedError::MissingCredential(
                    "Neynar API key (set FOLIO__FARCASTER__API_KEY or NEYNAR_API_KEY)".to_string(),
                )
            })?;

        let headers = credential_header(API_KEY_HEADER, api_key)?;

        Ok(Self {
            gateway: HttpGateway::with_headers(DataSource::Neynar, &config.api_url, http, headers)?,
            config: config.clone(),
        })
    }

    pub async fn user_by_username(&self, username: &str) -> Result<UserByUsernameResponse> {
        self.gateway
            .get_json(
                PROFILE_ENDPOINT,
                &[
                    ("username", username.to_string()),
                    ("viewer_fid", self.config.viewer_fid.to_string()),
                ],
            )
            .await
    }

    pub async fn user_casts(&self, fid: u64) -> Result<UserFeedResponse> {
        self.gateway
            .get_json(
                "/feed/user/casts",
                &[
                    ("fid", fid.to_string()),
                    ("viewer_fid", self.config.viewer_fid.to_string()),
                    ("limit", self.config.cast_sample_limit.to_string()),
                ],
            )
            .await
    }

    pub async fn followers(&self, fid: u64) -> Result<FollowResponse> {
        self.follow_list("/followers", fid).await
    }

    pub async fn following(&self, fid: u64) -> Result<FollowResponse> {
        self.follow_list("/following", fid).await
    }

    async fn follow_list(&self, path: &str, fid: u64) -> Result<FollowResponse> {
        self.gateway
            .get_json(
                path,
                &[
                    ("fid", fid.to_string()),
                    ("limit", self.config.follower_sample_limit.to_string()),
                ],
            )
            .await
    }

    /// Resolve the profile first (its fid keys the other calls), then fetch
    /// casts, followers and following concurrently and assemble the widget.
    pub async fn widget(&self, username: Option<&str>) -> Result<FarcasterWidgetData> {
        let username = username
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.config.default_username.as_str());

        let profile = self.user_by_username(username).await?;
        // every follow-up call is keyed by the profile fid
        let fid = profile.user.fid.ok_or_else(|| FeedError::Decode {
            feed: DataSource::Neynar,
            endpoint: PROFILE_ENDPOINT.to_string(),
            message: format!("profile for {username} has no fid"),
        })?;

        let (casts, followers, following) =
            tokio::try_join!(self.user_casts(fid), self.followers(fid), self.following(fid))?;

        let snapshot = assemble_farcaster_widget(FarcasterPayloads {
            profile,
            casts,
            followers,
            following,
        });

        tracing::info!(
            username = %username,
            fid,
            graph_nodes = snapshot.graph_nodes.len(),
            trend_keywords = snapshot.trend_keywords.len(),
            "Farcaster widget assembled"
        );

        Ok(snapshot)
    }
}
