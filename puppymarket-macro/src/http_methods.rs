use proc_macro::TokenStream;
use syn::{parse_macro_input, spanned::Spanned};

/// Route attributes are consumed by `#[routes]`; reaching this expansion means
/// the method sits outside a routes block, which would silently drop the route.
pub fn http_method_attribute(method: &str, _attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as syn::ImplItemFn);
    let message = format!(
        "#[{}] only takes effect on methods inside a #[routes] impl block",
        method.to_lowercase()
    );
    syn::Error::new(input.sig.span(), message)
        .to_compile_error()
        .into()
}
