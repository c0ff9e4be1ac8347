mod bean_attribute;
mod item_struct_gen;
mod property_attribute;
mod utils;

use proc_macro::TokenStream;
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput};

/// Derives `sprout::BeanType`, see the `sprout` crate for the supported attributes.
#[proc_macro_derive(Bean, attributes(bean))]
pub fn derive_bean(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let result = match &input.data {
        Data::Struct(data_struct) => item_struct_gen::generate(&input, data_struct),
        Data::Enum(data_enum) => Err(syn::Error::new(
            data_enum.enum_token.span(),
            "`Bean` can only be derived for structs with named fields",
        )),
        Data::Union(data_union) => Err(syn::Error::new(
            data_union.union_token.span(),
            "`Bean` can only be derived for structs with named fields",
        )),
    };

    result.unwrap_or_else(|e| e.to_compile_error()).into()
}
