use proc_macro2::TokenStream;
use quote::quote;
use syn::{ext::IdentExt, DataStruct, DeriveInput, Fields, LitStr};

use crate::{
    bean_attribute::{BeanAttribute, SimpleBeanAttribute},
    property_attribute::PropertyAttribute,
    utils,
};

pub(crate) fn generate(input: &DeriveInput, data_struct: &DataStruct) -> syn::Result<TokenStream> {
    let SimpleBeanAttribute {
        name,
        constructor,
        init,
        destroy,
        auto_register,
        crate_path,
    } = BeanAttribute::from_attrs(&input.attrs)?.simplify();

    #[cfg(feature = "auto-register")]
    utils::check_auto_register_with_generics(auto_register, &input.generics)?;

    let fields = match &data_struct.fields {
        Fields::Named(fields_named) => fields_named.named.iter().collect::<Vec<_>>(),
        Fields::Unit => Vec::new(),
        fields @ Fields::Unnamed(_) => return Err(utils::unnamed_fields_error(fields)),
    };

    let mut property_names = Vec::with_capacity(fields.len());
    let mut field_idents = Vec::with_capacity(fields.len());
    let mut field_types = Vec::with_capacity(fields.len());
    let mut errors = Vec::new();

    for field in fields {
        let attribute = match PropertyAttribute::from_attrs(&field.attrs) {
            Ok(attribute) => attribute,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };

        if attribute.is_skipped() {
            continue;
        }

        let Some(ident) = &field.ident else {
            continue;
        };

        let property_name = match attribute.rename() {
            Some(rename) => rename.clone(),
            None => LitStr::new(&ident.unraw().to_string(), ident.span()),
        };

        property_names.push(property_name);
        field_idents.push(ident);
        field_types.push(&field.ty);
    }

    utils::combine_errors(errors)?;

    let struct_ident = &input.ident;

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let class_name = name.unwrap_or_else(|| {
        quote! {
            ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#struct_ident))
        }
    });

    let init = if init {
        quote! {
            .initializing()
        }
    } else {
        quote! {}
    };

    let destroy = if destroy {
        quote! {
            .disposable()
        }
    } else {
        quote! {}
    };

    let auto_register = if auto_register {
        #[cfg(feature = "auto-register")]
        quote! {
            #crate_path::register_class!(<#struct_ident as #crate_path::BeanType>::bean_class());
        }
        #[cfg(not(feature = "auto-register"))]
        quote! {}
    } else {
        quote! {}
    };

    let expand = quote! {
        impl #impl_generics #crate_path::BeanType for #struct_ident #ty_generics #where_clause {
            fn bean_class() -> #crate_path::BeanClass {
                #crate_path::BeanClass::builder_with_name::<Self>(#class_name)
                    .constructor(#constructor)
                    #(
                        .property(#property_names, |bean: &mut Self, value: #field_types| {
                            bean.#field_idents = value;
                        })
                    )*
                    #init
                    #destroy
                    .build()
            }
        }

        #auto_register
    };

    Ok(expand)
}
