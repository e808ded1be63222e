//! # Advertisements
//!
//! Classified ads authored by users. Ads reference a Content record like
//! messages do, but posting or editing an ad never touches the author's rating.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Advertisement, AdvertisementUpdate, NewAdvertisement};
use crate::traits::{AdRepo, UserRepo};

/// Listings return at most this many ads, newest first.
pub const ADS_PAGE_SIZE: i64 = 100;

pub struct AdBoard {
    ads: Arc<dyn AdRepo>,
    users: Arc<dyn UserRepo>,
}

impl AdBoard {
    pub fn new(ads: Arc<dyn AdRepo>, users: Arc<dyn UserRepo>) -> Self {
        Self { ads, users }
    }

    pub async fn create(&self, author_id: Uuid, ad: NewAdvertisement) -> Result<Advertisement> {
        let ad = NewAdvertisement {
            title: ad.title.trim().to_string(),
            price: ad.price,
            content: ad.content,
        };
        if ad.title.is_empty() {
            return Err(AppError::ValidationError("title is required".into()));
        }
        if ad.content.is_empty() {
            return Err(AppError::ValidationError("content is required".into()));
        }
        validate_price(ad.price)?;

        self.ads.create_ad(author_id, ad).await
    }

    /// Only the author may edit. Title, price and body are written together; a
    /// body edit rewrites the existing Content record, so its id survives.
    pub async fn edit(
        &self,
        actor_id: Uuid,
        ad_id: Uuid,
        update: AdvertisementUpdate,
    ) -> Result<Advertisement> {
        if update.is_empty() {
            return Err(AppError::ValidationError("nothing to update".into()));
        }
        self.owned(actor_id, ad_id).await?;

        let title = update.title.map(|t| t.trim().to_string());
        if title.as_deref() == Some("") {
            return Err(AppError::ValidationError("title cannot be blank".into()));
        }
        if let Some(price) = update.price {
            validate_price(price)?;
        }
        if update.content.as_deref() == Some("") {
            return Err(AppError::ValidationError("content cannot be blank".into()));
        }

        let update = AdvertisementUpdate {
            title,
            price: update.price,
            content: update.content,
        };
        self.ads.update_ad(ad_id, update).await
    }

    pub async fn delete(&self, actor_id: Uuid, ad_id: Uuid) -> Result<()> {
        self.owned(actor_id, ad_id).await?;
        self.ads.delete_ad(ad_id).await
    }

    pub async fn recent(&self) -> Result<Vec<Advertisement>> {
        self.ads.list_recent_ads(None, ADS_PAGE_SIZE).await
    }

    pub async fn by_author(&self, author_id: Uuid) -> Result<Vec<Advertisement>> {
        if self.users.get_user(author_id).await?.is_none() {
            return Err(AppError::not_found("User", author_id));
        }
        self.ads.list_recent_ads(Some(author_id), ADS_PAGE_SIZE).await
    }

    async fn owned(&self, actor_id: Uuid, ad_id: Uuid) -> Result<Advertisement> {
        let ad = self
            .ads
            .get_ad(ad_id)
            .await?
            .ok_or_else(|| AppError::not_found("Advertisement", ad_id))?;
        if ad.author_id != actor_id {
            return Err(AppError::Forbidden("only the author may change this ad".into()));
        }
        Ok(ad)
    }
}

fn validate_price(price: i64) -> Result<()> {
    if price < 0 {
        return Err(AppError::ValidationError("price cannot be negative".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Content;
    use crate::traits::{MockAdRepo, MockUserRepo};
    use chrono::Utc;

    fn ad(author_id: Uuid) -> Advertisement {
        Advertisement {
            id: Uuid::now_v7(),
            author_id,
            title: "Bike".into(),
            price: 120,
            content: Content {
                id: Uuid::now_v7(),
                body: "Red, barely used".into(),
            },
            created_at: Utc::now(),
        }
    }

    fn board(ads: MockAdRepo) -> AdBoard {
        AdBoard::new(Arc::new(ads), Arc::new(MockUserRepo::new()))
    }

    #[tokio::test]
    async fn create_validates_fields() {
        let mut ads = MockAdRepo::new();
        ads.expect_create_ad().never();
        let board = board(ads);
        let author = Uuid::now_v7();

        for (title, price, content) in [(" ", 1, "x"), ("t", -1, "x"), ("t", 1, "")] {
            let err = board
                .create(
                    author,
                    NewAdvertisement {
                        title: title.into(),
                        price,
                        content: content.into(),
                    },
                )
                .await
                .unwrap_err();
            assert_eq!(err.kind(), "validation");
        }
    }

    #[tokio::test]
    async fn edit_by_stranger_is_forbidden() {
        let existing = ad(Uuid::now_v7());
        let id = existing.id;
        let mut ads = MockAdRepo::new();
        ads.expect_get_ad().returning(move |_| Ok(Some(existing.clone())));
        ads.expect_update_ad().never();

        let board = board(ads);
        let update = AdvertisementUpdate {
            price: Some(5),
            ..AdvertisementUpdate::default()
        };
        let err = board.edit(Uuid::now_v7(), id, update).await.unwrap_err();
        assert_eq!(err.kind(), "forbidden");
    }

    #[tokio::test]
    async fn edit_sends_every_field_in_one_write() {
        let author = Uuid::now_v7();
        let existing = ad(author);
        let id = existing.id;
        let content_id = existing.content.id;
        let mut after = existing.clone();
        after.title = "Blue bike".into();
        after.content.body = "Blue now".into();

        let mut ads = MockAdRepo::new();
        ads.expect_get_ad().returning(move |_| Ok(Some(existing.clone())));
        ads.expect_update_ad()
            .withf(move |ad_id, update| {
                *ad_id == id
                    && update.title.as_deref() == Some("Blue bike")
                    && update.price.is_none()
                    && update.content.as_deref() == Some("Blue now")
            })
            .times(1)
            .returning(move |_, _| Ok(after.clone()));

        let update = AdvertisementUpdate {
            title: Some("  Blue bike ".into()),
            content: Some("Blue now".into()),
            ..AdvertisementUpdate::default()
        };
        let updated = board(ads).edit(author, id, update).await.unwrap();
        assert_eq!(updated.content.id, content_id);
        assert_eq!(updated.title, "Blue bike");
    }

    #[tokio::test]
    async fn delete_missing_ad_is_not_found() {
        let mut ads = MockAdRepo::new();
        ads.expect_get_ad().returning(|_| Ok(None));
        ads.expect_delete_ad().never();

        let board = board(ads);
        let err = board.delete(Uuid::now_v7(), Uuid::now_v7()).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn by_author_requires_existing_user() {
        let mut users = MockUserRepo::new();
        users.expect_get_user().returning(|_| Ok(None));
        let mut ads = MockAdRepo::new();
        ads.expect_list_recent_ads().never();

        let board = AdBoard::new(Arc::new(ads), Arc::new(users));
        let err = board.by_author(Uuid::now_v7()).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
