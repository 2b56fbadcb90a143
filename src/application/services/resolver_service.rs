//! Slug resolution and lazy link creation.

use std::sync::Arc;

use crate::domain::entities::{AffiliateLink, LinkTarget, NewAffiliateLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::slug::{is_reserved_slug, slug_candidate, slug_for_url, validate_slug};
use crate::utils::url_normalizer::normalize_url;
use serde_json::json;
use tracing::{debug, info, warn};

/// Slug attempts (base plus `-2` .. `-10`) before giving up.
const MAX_SLUG_ATTEMPTS: u32 = 10;

/// Service mapping slugs and external URLs to affiliate links.
///
/// Slug lookups go through the cache first; any cache failure falls back to
/// the database.
pub struct ResolverService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    cache: Arc<dyn CacheService>,
}

impl<L: LinkRepository + ?Sized> ResolverService<L> {
    /// Creates a new resolver.
    pub fn new(link_repository: Arc<L>, cache: Arc<dyn CacheService>) -> Self {
        Self {
            link_repository,
            cache,
        }
    }

    /// Resolves an existing slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this slug.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn resolve_slug(&self, slug: &str) -> Result<LinkTarget, AppError> {
        match self.cache.get_link(slug).await {
            Ok(Some(target)) => {
                debug!(slug, "Cache hit");
                return Ok(target);
            }
            Ok(None) => {}
            Err(e) => warn!(slug, "Cache lookup failed, using database: {}", e),
        }

        let link = self
            .link_repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Affiliate link not found", json!({ "slug": slug }))
            })?;

        let target = LinkTarget::from(&link);
        self.remember(&target).await;

        Ok(target)
    }

    /// Resolves an arbitrary external URL, creating a link on first use.
    ///
    /// The URL is normalized first, so differently spelled URLs for the same
    /// destination share one link. New links get a slug derived from host and
    /// path; on collision `-2`, `-3`, ... are tried.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is malformed or not
    /// http/https. Nothing is written in that case.
    /// Returns [`AppError::Internal`] if no free slug is found or on database
    /// errors.
    pub async fn resolve_or_create(&self, raw_url: &str) -> Result<LinkTarget, AppError> {
        let target_url = normalize_url(raw_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if let Some(existing) = self.link_repository.find_by_target_url(&target_url).await? {
            return Ok(LinkTarget::from(&existing));
        }

        let base = slug_for_url(&target_url);

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let slug = slug_candidate(&base, attempt);

            if is_reserved_slug(&slug) || self.link_repository.find_by_slug(&slug).await?.is_some()
            {
                continue;
            }

            let new_link = NewAffiliateLink {
                slug: slug.clone(),
                target_url: target_url.clone(),
                is_manual: false,
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    if link.slug == slug {
                        info!(slug = %link.slug, link_id = link.id, "Created affiliate link");
                    } else {
                        debug!(slug = %link.slug, "Link for this URL was created concurrently");
                    }
                    let target = LinkTarget::from(&link);
                    self.remember(&target).await;
                    return Ok(target);
                }
                Err(AppError::Conflict { .. }) => {
                    // Slug taken by another destination, or by a manual link for this one.
                    if let Some(existing) =
                        self.link_repository.find_by_target_url(&target_url).await?
                    {
                        return Ok(LinkTarget::from(&existing));
                    }
                    debug!(slug, "Slug taken concurrently, trying next suffix");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to allocate slug",
            json!({ "base": base, "attempts": MAX_SLUG_ATTEMPTS }),
        ))
    }

    /// Creates a manual link for an operator.
    ///
    /// When `slug` is `None` it is derived from the URL like an auto-created
    /// link, but without suffix retries.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid URL or slug.
    /// Returns [`AppError::Conflict`] if the slug is taken.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create_manual(
        &self,
        slug: Option<&str>,
        raw_url: &str,
    ) -> Result<AffiliateLink, AppError> {
        let target_url = normalize_url(raw_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let slug = match slug {
            Some(s) => s.to_string(),
            None => slug_for_url(&target_url),
        };
        validate_slug(&slug)?;

        if self.link_repository.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::conflict(
                "Slug already exists",
                json!({ "slug": slug }),
            ));
        }

        let link = self
            .link_repository
            .create(NewAffiliateLink {
                slug,
                target_url,
                is_manual: true,
            })
            .await?;

        self.cache.invalidate(&link.slug).await.ok();

        Ok(link)
    }

    async fn remember(&self, target: &LinkTarget) {
        if let Err(e) = self.cache.set_link(target, None).await {
            warn!(slug = %target.slug, "Failed to cache link: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::NullCache;
    use chrono::Utc;

    fn create_test_link(id: i64, slug: &str, url: &str) -> AffiliateLink {
        AffiliateLink::new(id, slug.to_string(), url.to_string(), 0, false, Utc::now())
    }

    fn service(repo: MockLinkRepository) -> ResolverService<MockLinkRepository> {
        ResolverService::new(Arc::new(repo), Arc::new(NullCache::new()))
    }

    #[tokio::test]
    async fn test_resolve_slug_found() {
        let mut repo = MockLinkRepository::new();
        let link = create_test_link(7, "deal", "https://shop.example.com/deal");
        repo.expect_find_by_slug()
            .withf(|slug| slug == "deal")
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let target = service(repo).resolve_slug("deal").await.unwrap();

        assert_eq!(target.id, 7);
        assert_eq!(target.target_url, "https://shop.example.com/deal");
    }

    #[tokio::test]
    async fn test_resolve_slug_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_slug().times(1).returning(|_| Ok(None));

        let result = service(repo).resolve_slug("missing").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_or_create_rejects_invalid_url() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create().times(0);
        repo.expect_find_by_target_url().times(0);

        let svc = service(repo);

        for input in ["not-a-url", "ftp://example.com/x", "javascript:alert(1)"] {
            let result = svc.resolve_or_create(input).await;
            assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
        }
    }

    #[tokio::test]
    async fn test_resolve_or_create_reuses_existing_target() {
        let mut repo = MockLinkRepository::new();
        let existing = create_test_link(3, "example.com-path", "https://example.com/path");
        repo.expect_find_by_target_url()
            .withf(|url| url == "https://example.com/path")
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_create().times(0);

        let target = service(repo)
            .resolve_or_create("HTTPS://EXAMPLE.COM:443/path#top")
            .await
            .unwrap();

        assert_eq!(target.id, 3);
        assert_eq!(target.slug, "example.com-path");
    }

    #[tokio::test]
    async fn test_resolve_or_create_derives_slug() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_target_url().times(1).returning(|_| Ok(None));
        repo.expect_find_by_slug()
            .withf(|slug| slug == "example.com-path")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|new_link| {
                new_link.slug == "example.com-path"
                    && new_link.target_url == "https://example.com/path"
                    && !new_link.is_manual
            })
            .times(1)
            .returning(|new_link| {
                Ok(create_test_link(1, &new_link.slug, &new_link.target_url))
            });

        let target = service(repo)
            .resolve_or_create("https://example.com/path")
            .await
            .unwrap();

        assert_eq!(target.slug, "example.com-path");
        assert_eq!(target.id, 1);
    }

    #[tokio::test]
    async fn test_resolve_or_create_suffixes_on_collision() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_target_url().times(1).returning(|_| Ok(None));
        repo.expect_find_by_slug()
            .withf(|slug| slug == "example.com-path")
            .times(1)
            .returning(|slug| {
                Ok(Some(create_test_link(9, slug, "https://example.com/path?other=1")))
            });
        repo.expect_find_by_slug()
            .withf(|slug| slug == "example.com-path-2")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|new_link| new_link.slug == "example.com-path-2")
            .times(1)
            .returning(|new_link| {
                Ok(create_test_link(10, &new_link.slug, &new_link.target_url))
            });

        let target = service(repo)
            .resolve_or_create("https://example.com/path")
            .await
            .unwrap();

        assert_eq!(target.slug, "example.com-path-2");
    }

    #[tokio::test]
    async fn test_resolve_or_create_treats_conflict_as_collision() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_target_url().times(2).returning(|_| Ok(None));
        repo.expect_find_by_slug().times(2).returning(|_| Ok(None));
        repo.expect_create()
            .withf(|new_link| new_link.slug == "example.com")
            .times(1)
            .returning(|_| Err(AppError::conflict("Resource already exists", json!({}))));
        repo.expect_create()
            .withf(|new_link| new_link.slug == "example.com-2")
            .times(1)
            .returning(|new_link| {
                Ok(create_test_link(4, &new_link.slug, &new_link.target_url))
            });

        let target = service(repo)
            .resolve_or_create("https://example.com")
            .await
            .unwrap();

        assert_eq!(target.slug, "example.com-2");
    }

    #[tokio::test]
    async fn test_resolve_or_create_gives_up_after_attempts() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_target_url().times(1).returning(|_| Ok(None));
        repo.expect_find_by_slug()
            .times(MAX_SLUG_ATTEMPTS as usize)
            .returning(|slug| Ok(Some(create_test_link(1, slug, "https://elsewhere.test/"))));
        repo.expect_create().times(0);

        let result = service(repo).resolve_or_create("https://example.com/x").await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_create_manual_conflict() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_slug()
            .times(1)
            .returning(|slug| Ok(Some(create_test_link(2, slug, "https://a.test/"))));
        repo.expect_create().times(0);

        let result = service(repo)
            .create_manual(Some("summer-sale"), "https://shop.example.com/sale")
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_manual_sets_flag() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_slug().times(1).returning(|_| Ok(None));
        repo.expect_create()
            .withf(|new_link| new_link.is_manual && new_link.slug == "summer-sale")
            .times(1)
            .returning(|new_link| {
                let mut link = create_test_link(5, &new_link.slug, &new_link.target_url);
                link.is_manual = true;
                Ok(link)
            });

        let link = service(repo)
            .create_manual(Some("summer-sale"), "https://shop.example.com/sale")
            .await
            .unwrap();

        assert!(link.is_manual);
    }

    #[tokio::test]
    async fn test_create_manual_rejects_bad_slug() {
        let repo = MockLinkRepository::new();

        let result = service(repo)
            .create_manual(Some("Bad Slug"), "https://shop.example.com/sale")
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }
}
