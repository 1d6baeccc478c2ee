//! Post hydration
//!
//! List endpoints return posts without cover image or tags. For every post
//! with an id, [`PostHydration`] issues both lookups concurrently and writes
//! each result into the shared list as it arrives. A failed lookup is logged
//! and dropped, it never affects another lookup or the list itself.
//!
//! The lookups run under a [`CancellationToken`] owned by the hydration.
//! Cancelling or dropping it stops pending lookups, and no result lands in the
//! list afterwards.

use std::fmt::{self, Debug};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::Stream;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::types::{BlogPost, PostImageFile, PostTag};

/// Post list shared between a view and its hydration
pub type SharedPosts = Arc<RwLock<Vec<BlogPost>>>;

/// Source of the secondary lookups
#[async_trait]
pub trait PostEnrichment: Send + Sync + Debug {
    /// Cover image reference of a post
    async fn cover_image(&self, post_id: &str) -> Result<PostImageFile>;

    /// Tags of a post
    async fn tags(&self, post_id: &str) -> Result<Vec<PostTag>>;
}

/// A lookup result applied to the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationEvent {
    /// `cover_image_url` was set
    CoverImage {
        /// Position in the list
        index: usize,
        /// Post id
        post_id: String,
        /// Resolved image URL
        url: String,
    },
    /// `tags` was set
    Tags {
        /// Position in the list
        index: usize,
        /// Post id
        post_id: String,
        /// Tags of the post
        tags: Vec<PostTag>,
    },
}

impl HydrationEvent {
    /// Position of the updated post
    pub fn index(&self) -> usize {
        match self {
            HydrationEvent::CoverImage { index, .. } | HydrationEvent::Tags { index, .. } => *index,
        }
    }
}

/// Counts reported once every lookup settled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrationSummary {
    /// Posts skipped for lack of an id
    pub skipped: usize,
    /// Lookups issued
    pub requested: usize,
    /// Lookups written into the list
    pub applied: usize,
    /// Lookups that failed
    pub failed: usize,
    /// Lookups cancelled, or whose post left the list
    pub discarded: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    CoverImage,
    Tags,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::CoverImage => write!(f, "cover image"),
            Lookup::Tags => write!(f, "tags"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Applied,
    Failed,
    Discarded,
}

enum Update {
    CoverImage(String),
    Tags(Vec<PostTag>),
}

#[derive(Clone)]
struct LookupTask {
    source: Arc<dyn PostEnrichment>,
    posts: SharedPosts,
    asset_base_url: Arc<str>,
    events: mpsc::UnboundedSender<HydrationEvent>,
    cancel: CancellationToken,
}

impl LookupTask {
    async fn fetch(&self, lookup: Lookup, post_id: &str) -> Result<Update> {
        match lookup {
            Lookup::CoverImage => {
                let file = self.source.cover_image(post_id).await?;
                Ok(Update::CoverImage(file.resolve(&self.asset_base_url)))
            }
            Lookup::Tags => Ok(Update::Tags(self.source.tags(post_id).await?)),
        }
    }

    async fn run(self, lookup: Lookup, index: usize, post_id: String) -> Outcome {
        let fetched = tokio::select! {
            _ = self.cancel.cancelled() => return Outcome::Discarded,
            result = self.fetch(lookup, &post_id) => result,
        };

        let update = match fetched {
            Ok(update) => update,
            Err(err) => {
                tracing::warn!("Could not fetch {} for post {}: {}", lookup, post_id, err);
                return Outcome::Failed;
            }
        };

        let mut posts = self.posts.write().await;
        // Checked under the lock so a cancelled view is never written to
        if self.cancel.is_cancelled() {
            return Outcome::Discarded;
        }

        let Some(post) = posts
            .get_mut(index)
            .filter(|post| post.id_segment().as_deref() == Some(post_id.as_str()))
        else {
            tracing::debug!("Post {} left the list before its {} arrived", post_id, lookup);
            return Outcome::Discarded;
        };

        let event = match update {
            Update::CoverImage(url) => {
                post.cover_image_url = Some(url.clone());
                HydrationEvent::CoverImage {
                    index,
                    post_id,
                    url,
                }
            }
            Update::Tags(tags) => {
                post.tags = Some(tags.clone());
                HydrationEvent::Tags {
                    index,
                    post_id,
                    tags,
                }
            }
        };
        drop(posts);

        // Nobody listening is fine, the list is the source of truth
        let _ = self.events.send(event);
        Outcome::Applied
    }
}

/// In-flight hydration of a post list
///
/// Yields a [`HydrationEvent`] for every applied lookup. Dropping it cancels
/// whatever is still pending.
#[derive(Debug)]
pub struct PostHydration {
    rx: mpsc::UnboundedReceiver<HydrationEvent>,
    cancel: CancellationToken,
    tasks: JoinSet<Outcome>,
    summary: HydrationSummary,
}

impl PostHydration {
    /// Start both lookups for every post of `posts` that has an id
    pub async fn spawn(
        source: Arc<dyn PostEnrichment>,
        posts: SharedPosts,
        asset_base_url: &str,
    ) -> Self {
        Self::start(source, posts, asset_base_url, CancellationToken::new()).await
    }

    /// Like [`PostHydration::spawn`], also cancelled together with `parent`
    pub async fn spawn_scoped(
        source: Arc<dyn PostEnrichment>,
        posts: SharedPosts,
        asset_base_url: &str,
        parent: &CancellationToken,
    ) -> Self {
        Self::start(source, posts, asset_base_url, parent.child_token()).await
    }

    async fn start(
        source: Arc<dyn PostEnrichment>,
        posts: SharedPosts,
        asset_base_url: &str,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut summary = HydrationSummary::default();

        let targets: Vec<(usize, String)> = {
            let posts = posts.read().await;
            let targets: Vec<(usize, String)> = posts
                .iter()
                .enumerate()
                .filter_map(|(index, post)| post.id_segment().map(|id| (index, id)))
                .collect();
            summary.skipped = posts.len() - targets.len();
            targets
        };

        let task = LookupTask {
            source,
            posts,
            asset_base_url: Arc::from(asset_base_url),
            events: tx,
            cancel: cancel.clone(),
        };

        let mut tasks = JoinSet::new();
        for (index, post_id) in targets {
            for lookup in [Lookup::CoverImage, Lookup::Tags] {
                tasks.spawn(task.clone().run(lookup, index, post_id.clone()));
                summary.requested += 1;
            }
        }

        tracing::debug!(
            "Hydrating posts: {} lookups, {} posts without id",
            summary.requested,
            summary.skipped
        );

        Self {
            rx,
            cancel,
            tasks,
            summary,
        }
    }

    /// Token cancelling this hydration
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop pending lookups, nothing is written to the list afterwards
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Next applied lookup, `None` once all lookups settled and were consumed
    pub async fn next_event(&mut self) -> Option<HydrationEvent> {
        self.rx.recv().await
    }

    /// Wait until every lookup settled
    ///
    /// Events already applied stay readable through [`PostHydration::next_event`].
    pub async fn wait(&mut self) -> HydrationSummary {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(Outcome::Applied) => self.summary.applied += 1,
                Ok(Outcome::Failed) => self.summary.failed += 1,
                Ok(Outcome::Discarded) => self.summary.discarded += 1,
                Err(err) if err.is_cancelled() => self.summary.discarded += 1,
                Err(err) => {
                    tracing::error!("Hydration task panicked: {}", err);
                    self.summary.failed += 1;
                }
            }
        }
        self.summary
    }
}

impl Stream for PostHydration {
    type Item = HydrationEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for PostHydration {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Hydrate `posts` and wait for every lookup
pub async fn hydrate(
    source: Arc<dyn PostEnrichment>,
    posts: SharedPosts,
    asset_base_url: &str,
) -> HydrationSummary {
    PostHydration::spawn(source, posts, asset_base_url)
        .await
        .wait()
        .await
}
