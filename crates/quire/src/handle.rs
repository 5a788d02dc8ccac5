use crate::context::Site;
use crate::error::Result;
use arc_swap::ArcSwap;
use std::sync::Arc;

pub struct SiteHandle {
    current: ArcSwap<Site>,
}

impl SiteHandle {
    pub fn new(site: Site) -> Self {
        Self {
            current: ArcSwap::from_pointee(site),
        }
    }

    #[inline]
    pub fn load(&self) -> Arc<Site> {
        self.current.load_full()
    }

    pub fn replace(&self, site: Site) {
        self.current.store(Arc::new(site));
    }

    pub fn reload<F>(&self, build: F) -> Result<()>
    where
        F: FnOnce() -> Result<Site>,
    {
        match build() {
            Ok(site) => {
                self.replace(site);
                tracing::info!("site reloaded");
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "reload failed, keeping previous site");
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuireError;
    use crate::test_support::{numbered_posts, page};
    use crate::types::SiteConfig;

    fn site(count: usize) -> Site {
        Site::new(SiteConfig::new("Blog", "https://example.com"), numbered_posts(count)).unwrap()
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let handle = SiteHandle::new(site(2));
        let before = handle.load();

        handle.reload(|| Ok(site(5))).unwrap();

        assert_eq!(before.repository().len(), 2);
        assert_eq!(handle.load().repository().len(), 5);
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let handle = SiteHandle::new(site(3));
        let result = handle.reload(|| {
            Site::new(
                SiteConfig::new("Blog", "https://example.com"),
                vec![page("x"), page("x")],
            )
        });

        assert!(matches!(result, Err(QuireError::DuplicateSlug { .. })));
        assert_eq!(handle.load().repository().len(), 3);
    }
}
