use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, Attribute,
    FnArg, ImplItem, ImplItemFn, ItemImpl, ItemStruct, LitStr, Token,
};

use crate::injectable::arc_inner_type;

const HTTP_METHODS: [&str; 4] = ["get", "post", "put", "delete"];
const PARAM_ATTRS: [&str; 3] = ["body", "param", "query"];
const ROUTE_MODIFIERS: [&str; 2] = ["pre_authorize", "status"];

struct ControllerArgs {
    path: String,
}

impl Parse for ControllerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut path = None;
        while !input.is_empty() {
            let name: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            if name == "path" {
                let lit: LitStr = input.parse()?;
                path = Some(lit.value());
            } else {
                return Err(syn::Error::new(name.span(), "unknown controller argument"));
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(ControllerArgs {
            path: path.unwrap_or_default(),
        })
    }
}

pub fn controller_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ControllerArgs);
    let input = parse_macro_input!(item as ItemStruct);
    generate_controller_impl(&args, &input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn generate_controller_impl(args: &ControllerArgs, input: &ItemStruct) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let base_path = &args.path;
    let injectable_impl = generate_injectable_for_controller(input)?;
    Ok(quote! {
        #input
        #injectable_impl
        impl #struct_name {
            pub fn base_path() -> &'static str { #base_path }
        }
    })
}

fn generate_injectable_for_controller(input: &ItemStruct) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let syn::Fields::Named(fields) = &input.fields else {
        return Err(syn::Error::new_spanned(
            struct_name,
            "#[controller] only supports structs with named fields",
        ));
    };
    let field_injections = fields
        .named
        .iter()
        .map(|field| {
            let field_name = &field.ident;
            let field_type = arc_inner_type(&field.ty).ok_or_else(|| {
                syn::Error::new_spanned(&field.ty, "controller dependencies must be Arc<T>")
            })?;
            Ok(quote! { #field_name: container.resolve::<#field_type>()? })
        })
        .collect::<syn::Result<Vec<_>>>()?;
    Ok(quote! {
        impl ::puppymarket::Injectable for #struct_name {
            fn inject(container: &::puppymarket::Container) -> ::puppymarket::Result<Self> {
                Ok(Self { #(#field_injections),* })
            }
        }
    })
}

#[derive(Clone, Copy, PartialEq)]
enum ParamKind {
    Body,
    Param,
    Query,
    Raw,
}

struct ParamInfo {
    ty: syn::Type,
    kind: ParamKind,
}

struct RouteInfo {
    method: String,
    path: String,
    fn_name: syn::Ident,
    params: Vec<ParamInfo>,
    authorities: Vec<LitStr>,
    status: Option<syn::Ident>,
}

pub fn routes_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemImpl);
    generate_routes_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn generate_routes_impl(input: ItemImpl) -> syn::Result<TokenStream2> {
    let mut routes: Vec<RouteInfo> = Vec::new();
    let mut clean_items: Vec<ImplItem> = Vec::new();

    for item in input.items.iter() {
        let ImplItem::Fn(method) = item else {
            clean_items.push(item.clone());
            continue;
        };
        match extract_route_info(method)? {
            Some(route_info) => {
                routes.push(route_info);
                clean_items.push(ImplItem::Fn(strip_route_attrs(method)));
            }
            None => clean_items.push(item.clone()),
        }
    }

    let route_registrations = routes.iter().map(route_registration);

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #self_ty #where_clause {
            #(#clean_items)*

            pub fn router<S>(controller: ::std::sync::Arc<Self>) -> ::axum::Router<S>
            where
                S: Clone + Send + Sync + 'static,
            {
                ::axum::Router::new() #(#route_registrations)*
            }
        }
    })
}

fn route_registration(route: &RouteInfo) -> TokenStream2 {
    let method_fn = match route.method.as_str() {
        "POST" => quote! { ::axum::routing::post },
        "PUT" => quote! { ::axum::routing::put },
        "DELETE" => quote! { ::axum::routing::delete },
        _ => quote! { ::axum::routing::get },
    };

    let path = &route.path;
    let fn_name = &route.fn_name;

    // The JSON body consumes the request, so it has to be the last extractor;
    // the call below still passes arguments in declaration order.
    let mut ordered: Vec<(usize, &ParamInfo)> = route.params.iter().enumerate().collect();
    ordered.sort_by_key(|(_, p)| p.kind == ParamKind::Body);

    let extractor_patterns = ordered.iter().map(|(i, p)| {
        let temp_ident = format_ident!("__p_{}", i);
        let ty = &p.ty;
        match p.kind {
            ParamKind::Body => quote! { ::axum::Json(#temp_ident): ::axum::Json<#ty> },
            ParamKind::Param => {
                quote! { ::axum::extract::Path(#temp_ident): ::axum::extract::Path<#ty> }
            }
            ParamKind::Query => {
                quote! { ::axum::extract::Query(#temp_ident): ::axum::extract::Query<#ty> }
            }
            ParamKind::Raw => quote! { #temp_ident: #ty },
        }
    });

    let call_args = (0..route.params.len()).map(|i| format_ident!("__p_{}", i));

    let status_override = route.status.as_ref().map(|status| {
        quote! {
            if __response.status().is_success() {
                *__response.status_mut() = ::axum::http::StatusCode::#status;
            }
        }
    });

    let guarded = if route.authorities.is_empty() {
        quote! { __route }
    } else {
        let authorities = &route.authorities;
        quote! {
            __route.route_layer(::puppymarket::guard::GuardLayer::new(
                ::puppymarket::guard::AuthorityGuard::any_of(&[#(#authorities),*]),
            ))
        }
    };

    quote! {
        .route(
            &::puppymarket::controller::join_path(Self::base_path(), #path),
            {
                let __route = #method_fn({
                    let controller = ::std::sync::Arc::clone(&controller);
                    move |#(#extractor_patterns),*| {
                        let controller = ::std::sync::Arc::clone(&controller);
                        async move {
                            use ::axum::response::IntoResponse;
                            #[allow(unused_mut)]
                            let mut __response = controller.#fn_name(#(#call_args),*).await.into_response();
                            #status_override
                            __response
                        }
                    }
                });
                #guarded
            }
        )
    }
}

fn extract_route_info(method: &ImplItemFn) -> syn::Result<Option<RouteInfo>> {
    let mut http_method = None;
    let mut path = String::new();
    let mut authorities = Vec::new();
    let mut status = None;

    for attr in &method.attrs {
        let Some(ident) = attr.path().get_ident() else {
            continue;
        };
        let name = ident.to_string();
        if HTTP_METHODS.contains(&name.as_str()) {
            http_method = Some(name.to_uppercase());
            if let syn::Meta::List(_) = &attr.meta {
                path = attr.parse_args::<LitStr>()?.value();
            }
        } else if name == "pre_authorize" {
            let lits = attr.parse_args_with(Punctuated::<LitStr, Token![,]>::parse_terminated)?;
            if lits.is_empty() {
                return Err(syn::Error::new_spanned(attr, "#[pre_authorize] needs at least one authority"));
            }
            authorities.extend(lits);
        } else if name == "status" {
            status = Some(attr.parse_args::<syn::Ident>()?);
        }
    }
    let Some(http_method) = http_method else {
        return Ok(None);
    };

    let mut params = Vec::new();
    for input in method.sig.inputs.iter() {
        if let FnArg::Typed(pat_type) = input {
            params.push(ParamInfo {
                ty: (*pat_type.ty).clone(),
                kind: get_param_kind(&pat_type.attrs),
            });
        }
    }
    if params.iter().filter(|p| p.kind == ParamKind::Body).count() > 1 {
        return Err(syn::Error::new_spanned(
            &method.sig,
            "a route can only take one #[body] parameter",
        ));
    }

    Ok(Some(RouteInfo {
        method: http_method,
        path,
        fn_name: method.sig.ident.clone(),
        params,
        authorities,
        status,
    }))
}

fn strip_route_attrs(method: &ImplItemFn) -> ImplItemFn {
    let mut clean_method = method.clone();
    clean_method
        .attrs
        .retain(|attr| !has_ident_in(attr, &HTTP_METHODS) && !has_ident_in(attr, &ROUTE_MODIFIERS));
    for input in clean_method.sig.inputs.iter_mut() {
        if let FnArg::Typed(pat_type) = input {
            pat_type.attrs.retain(|attr| !has_ident_in(attr, &PARAM_ATTRS));
        }
    }
    clean_method
}

fn get_param_kind(attrs: &[Attribute]) -> ParamKind {
    for attr in attrs {
        if let Some(ident) = attr.path().get_ident() {
            match ident.to_string().as_str() {
                "body" => return ParamKind::Body,
                "param" => return ParamKind::Param,
                "query" => return ParamKind::Query,
                _ => {}
            }
        }
    }
    ParamKind::Raw
}

fn has_ident_in(attr: &Attribute, names: &[&str]) -> bool {
    attr.path()
        .get_ident()
        .is_some_and(|ident| names.contains(&ident.to_string().as_str()))
}
