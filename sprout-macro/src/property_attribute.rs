use proc_macro2::Span;
use syn::{meta::ParseNestedMeta, spanned::Spanned, Attribute, LitStr};

use crate::utils;

// #[bean(skip)] or #[bean(rename = "...")]
#[derive(Default)]
pub(crate) struct PropertyAttribute {
    skip: Option<Span>,
    rename: Option<(Span, LitStr)>,
}

impl PropertyAttribute {
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut attribute = PropertyAttribute::default();
        let mut errors = Vec::new();

        for attr in attrs {
            if !attr.path().is_ident("bean") {
                continue;
            }

            if let Err(err) = attr.parse_nested_meta(|meta| attribute.parse(meta)) {
                errors.push(err);
            }
        }

        if let (Some(skip), Some(_)) = (attribute.skip, &attribute.rename) {
            errors.push(syn::Error::new(
                skip,
                "`skip` and `rename` cannot be used together",
            ));
        }

        utils::combine_errors(errors)?;

        Ok(attribute)
    }

    fn parse(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let meta_path = &meta.path;
        let meta_path_span = meta_path.span();

        if meta_path.is_ident("skip") {
            if self.skip.is_some() {
                return Err(meta.error("duplicate `skip` argument"));
            }

            self.skip = Some(meta_path_span);
            return Ok(());
        }

        if meta_path.is_ident("rename") {
            if self.rename.is_some() {
                return Err(meta.error("duplicate `rename` argument"));
            }

            let rename = meta.value()?.parse::<LitStr>()?;
            if rename.value().is_empty() {
                return Err(syn::Error::new(
                    rename.span(),
                    "the property name must not be empty",
                ));
            }

            self.rename = Some((meta_path_span, rename));
            return Ok(());
        }

        Err(meta.error("the argument must be one of: `skip`, `rename`"))
    }

    pub(crate) fn is_skipped(&self) -> bool {
        self.skip.is_some()
    }

    pub(crate) fn rename(&self) -> Option<&LitStr> {
        self.rename.as_ref().map(|(_, rename)| rename)
    }
}
