use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemStruct, parse_macro_input};

/// Turns a plain struct into a protocol block.
///
/// Derives `Debug` and `Clone` and adds an empty `Protocol` impl, so the struct
/// gets the default (no-op) warm-up. `Protocol` must be in scope at the call site.
/// Implement `Protocol` by hand instead when the block needs a warm-up.
#[proc_macro_attribute]
pub fn protocol(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(item as ItemStruct);
    let protocol_struct = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let expanded = quote! {
        #[derive(
            std::fmt::Debug,
            std::clone::Clone
        )]
        #ast

        impl #impl_generics Protocol for #protocol_struct #ty_generics #where_clause {}
    };

    TokenStream::from(expanded)
}
