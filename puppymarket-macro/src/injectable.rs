use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Type};

pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    generate_injectable_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn generate_injectable_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => {
                return Ok(quote! {
                    impl #impl_generics ::puppymarket::Injectable for #struct_name #ty_generics #where_clause {
                        fn inject(_container: &::puppymarket::Container) -> ::puppymarket::Result<Self> {
                            Ok(Self)
                        }
                    }
                });
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "#[derive(Injectable)] only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "#[derive(Injectable)] can only be applied to structs",
            ));
        }
    };

    let field_injections = fields
        .iter()
        .map(|field| {
            let field_name = &field.ident;
            let field_type = arc_inner_type(&field.ty).ok_or_else(|| {
                syn::Error::new_spanned(&field.ty, "injectable fields must be Arc<T> or Arc<dyn Trait>")
            })?;

            // `dyn Trait` goes through the binding table, concrete types by TypeId
            let resolve_method = match field_type {
                Type::TraitObject(_) => quote!(resolve_trait),
                _ => quote!(resolve),
            };

            Ok(quote! {
                #field_name: container.#resolve_method::<#field_type>()?
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        impl #impl_generics ::puppymarket::Injectable for #struct_name #ty_generics #where_clause {
            fn inject(
                container: &::puppymarket::Container
            ) -> ::puppymarket::Result<Self> {
                Ok(Self {
                    #(#field_injections),*
                })
            }
        }
    })
}

/// Extract `T` from `Arc<T>` (or `Arc<dyn Trait>`)
pub(crate) fn arc_inner_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => match args.args.first()? {
            syn::GenericArgument::Type(inner_type) => Some(inner_type),
            _ => None,
        },
        _ => None,
    }
}
