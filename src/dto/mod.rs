pub mod item;
pub mod user;

pub use item::{
    ItemCategoryGetResponseDto, ItemCreateRequestDto, ItemCreateResponseDto,
    ItemDeleteResponseDto, ItemGetResponseDto, ItemResponseDto, ItemSearchQuery,
    ItemUpdateRequestDto, ItemUpdateResponseDto, SellerDto, WishResponseDto,
};
pub use user::{UserRequestDto, UserResponseDto};
