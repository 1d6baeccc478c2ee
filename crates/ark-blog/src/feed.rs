//! Home feed, tagged view and tag catalog

use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::api::{BlogService, TagService};
use crate::error::Result;
use crate::hydrate::{HydrationSummary, PostEnrichment, PostHydration, SharedPosts};
use crate::types::{BlogPost, PostTag};

/// Posts per home section
pub const HOME_SECTION_SIZE: u32 = 10;

/// Home page sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSection {
    /// Most read
    Top,
    /// Picked by editors
    EditorPicks,
    /// Most recent
    Latest,
}

impl FeedSection {
    /// Every section in display order
    pub const ALL: [FeedSection; 3] = [
        FeedSection::Top,
        FeedSection::EditorPicks,
        FeedSection::Latest,
    ];

    /// Section heading
    pub fn title(&self) -> &'static str {
        match self {
            FeedSection::Top => "Top posts",
            FeedSection::EditorPicks => "Editor's picks",
            FeedSection::Latest => "Latest",
        }
    }
}

/// A primary list together with its running hydration
#[derive(Debug)]
pub struct PostList {
    posts: SharedPosts,
    hydration: PostHydration,
}

impl PostList {
    /// Shared list, updated in place while hydration runs
    pub fn posts(&self) -> &SharedPosts {
        &self.posts
    }

    /// Copy of the list as it is now
    pub async fn snapshot(&self) -> Vec<BlogPost> {
        self.posts.read().await.clone()
    }

    /// Running hydration, also a stream of applied updates
    pub fn hydration(&mut self) -> &mut PostHydration {
        &mut self.hydration
    }

    /// Wait for the hydration to settle
    pub async fn settle(&mut self) -> HydrationSummary {
        self.hydration.wait().await
    }
}

/// The three home sections
#[derive(Debug)]
pub struct HomeFeed {
    /// Most read posts
    pub top: PostList,
    /// Editor's picks
    pub editor_picks: PostList,
    /// Latest posts
    pub latest: PostList,
}

impl HomeFeed {
    /// Section by kind
    pub fn section(&self, section: FeedSection) -> &PostList {
        match section {
            FeedSection::Top => &self.top,
            FeedSection::EditorPicks => &self.editor_picks,
            FeedSection::Latest => &self.latest,
        }
    }

    /// Wait for every section's hydration
    pub async fn settle(&mut self) -> HydrationSummary {
        let (top, picks, latest) = tokio::join!(
            self.top.settle(),
            self.editor_picks.settle(),
            self.latest.settle()
        );

        [top, picks, latest]
            .into_iter()
            .fold(HydrationSummary::default(), |mut total, s| {
                total.skipped += s.skipped;
                total.requested += s.requested;
                total.applied += s.applied;
                total.failed += s.failed;
                total.discarded += s.discarded;
                total
            })
    }
}

/// Post views sharing one cancellation scope
///
/// Closing the feed, or dropping it, cancels the hydration of every list it
/// produced.
#[derive(Debug)]
pub struct Feed {
    blog: Arc<BlogService>,
    asset_base_url: String,
    scope: CancellationToken,
}

impl Feed {
    /// Create a new feed
    pub fn new(blog: BlogService, asset_base_url: impl Into<String>) -> Self {
        Self {
            blog: Arc::new(blog),
            asset_base_url: asset_base_url.into(),
            scope: CancellationToken::new(),
        }
    }

    async fn hydrated(&self, posts: Vec<BlogPost>) -> PostList {
        let posts: SharedPosts = Arc::new(RwLock::new(posts));
        let source: Arc<dyn PostEnrichment> = self.blog.clone();
        let hydration =
            PostHydration::spawn_scoped(source, posts.clone(), &self.asset_base_url, &self.scope)
                .await;
        PostList { posts, hydration }
    }

    async fn section(&self, section: FeedSection, fetched: Result<Vec<BlogPost>>) -> PostList {
        let posts = fetched.unwrap_or_else(|err| {
            tracing::warn!("Could not load {}: {}", section.title(), err);
            Vec::new()
        });
        self.hydrated(posts).await
    }

    /// Fetch the three home sections concurrently
    ///
    /// Each section starts hydrating as soon as its own list arrives. A section
    /// that fails is logged and left empty.
    #[instrument(skip(self))]
    pub async fn home(&self) -> HomeFeed {
        let (top, editor_picks, latest) = tokio::join!(
            async {
                let fetched = self.blog.get_top_posts(HOME_SECTION_SIZE).await;
                self.section(FeedSection::Top, fetched).await
            },
            async {
                let fetched = self.blog.get_editor_picks(HOME_SECTION_SIZE).await;
                self.section(FeedSection::EditorPicks, fetched).await
            },
            async {
                let fetched = self.blog.get_latest_posts(HOME_SECTION_SIZE).await;
                self.section(FeedSection::Latest, fetched).await
            }
        );

        HomeFeed {
            top,
            editor_picks,
            latest,
        }
    }

    /// Posts carrying `tag`, hydrated
    #[instrument(skip(self))]
    pub async fn tagged(&self, tag: &str) -> Result<PostList> {
        let posts = self.blog.get_posts_by_tag(tag).await?;
        Ok(self.hydrated(posts).await)
    }

    /// One page of published posts, hydrated
    #[instrument(skip(self))]
    pub async fn published(&self, page: u32, limit: u32) -> Result<PostList> {
        let posts = self.blog.get_published_posts(page, limit).await?;
        Ok(self.hydrated(posts).await)
    }

    /// Cancel the hydration of every list of this feed
    pub fn close(&self) {
        self.scope.cancel();
    }

    /// True once [`Feed::close`] was called
    pub fn is_closed(&self) -> bool {
        self.scope.is_cancelled()
    }
}

impl Drop for Feed {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

/// Tag list fetched once and kept
#[derive(Debug)]
pub struct TagCatalog {
    service: TagService,
    tags: OnceCell<Vec<PostTag>>,
}

impl TagCatalog {
    /// Create a new catalog
    pub fn new(service: TagService) -> Self {
        Self {
            service,
            tags: OnceCell::new(),
        }
    }

    /// Every tag, fetched on first use
    ///
    /// A failed fetch is not cached, the next call tries again.
    pub async fn tags(&self) -> Result<&[PostTag]> {
        let tags = self
            .tags
            .get_or_try_init(|| self.service.get_tags())
            .await?;
        Ok(tags.as_slice())
    }
}
