use crate::common::{PageRequest, PageableDefault, Sort};
use crate::domain::StatusToken;
use crate::dto::{
    ItemCategoryGetResponseDto, ItemCreateRequestDto, ItemCreateResponseDto, ItemGetResponseDto,
    ItemResponseDto, ItemSearchQuery, ItemUpdateRequestDto, ItemUpdateResponseDto,
};
use crate::error::Result;
use crate::security::UserAuthentication;
use crate::service::ItemService;
use crate::service::item_service::SEARCH_PAGE_SIZE;
use axum::Json;
use axum::response::{IntoResponse, Response};
use puppymarket_macro::{controller, routes};
use std::sync::Arc;

const LIST_DEFAULT: PageableDefault = PageableDefault::new(12, Sort::id_desc());

#[controller(path = "/item")]
pub struct ItemController {
    item_service: Arc<ItemService>,
}

#[routes]
impl ItemController {
    #[get("")]
    pub async fn list(&self, pageable: PageRequest) -> Result<Json<Vec<ItemResponseDto>>> {
        let pageable = pageable.resolve(LIST_DEFAULT)?;
        Ok(Json(self.item_service.get_items(pageable).await?))
    }

    #[get("/{id}")]
    pub async fn detail(&self, #[param] id: i64) -> Result<Json<ItemGetResponseDto>> {
        Ok(Json(self.item_service.get_item(id).await?))
    }

    #[post("")]
    #[status(CREATED)]
    #[pre_authorize("USER")]
    pub async fn create(
        &self,
        auth: UserAuthentication,
        #[body] dto: ItemCreateRequestDto,
    ) -> Result<Json<ItemCreateResponseDto>> {
        Ok(Json(self.item_service.create_item(dto, &auth).await?))
    }

    #[put("/{id}")]
    #[pre_authorize("USER")]
    pub async fn update(
        &self,
        #[param] id: i64,
        auth: UserAuthentication,
        #[body] dto: ItemUpdateRequestDto,
    ) -> Result<Json<ItemUpdateResponseDto>> {
        Ok(Json(self.item_service.update_item(id, dto, &auth).await?))
    }

    /// `SALE`/`RESERVED`/`SOLD_OUT` change the item, `WISH`/`UNWISH` the
    /// caller's wish list
    #[put("/{id}/{status}")]
    #[pre_authorize("USER")]
    pub async fn update_status(
        &self,
        #[param] (id, token): (i64, String),
        auth: UserAuthentication,
    ) -> Result<Response> {
        let response = match StatusToken::parse(&token)? {
            StatusToken::Item(status) => Json(
                self.item_service
                    .update_item_status(id, status, &auth)
                    .await?,
            )
            .into_response(),
            StatusToken::Wish(status) => Json(
                self.item_service
                    .update_wish_status(id, status, &auth)
                    .await?,
            )
            .into_response(),
        };
        Ok(response)
    }

    #[delete("/{id}")]
    #[status(NO_CONTENT)]
    #[pre_authorize("USER", "ADMIN")]
    pub async fn delete(&self, #[param] id: i64, auth: UserAuthentication) -> Result<()> {
        self.item_service.delete_item(id, &auth).await.map(|_| ())
    }

    #[get("/categories/{id}/{name}")]
    pub async fn get_item_in_category(
        &self,
        #[param] (id, name): (i64, String),
    ) -> Result<Json<Vec<ItemCategoryGetResponseDto>>> {
        Ok(Json(self.item_service.get_category_item(id, &name).await?))
    }

    #[get("/search")]
    pub async fn search_items(
        &self,
        #[query] query: ItemSearchQuery,
    ) -> Result<Json<Vec<ItemCategoryGetResponseDto>>> {
        let condition = query.condition()?;
        Ok(Json(
            self.item_service
                .search(&condition, query.page(), SEARCH_PAGE_SIZE)
                .await?,
        ))
    }
}
