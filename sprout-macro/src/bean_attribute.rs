use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{meta::ParseNestedMeta, parse_quote, spanned::Spanned, Attribute, LitBool, LitStr, Path, Token};

use crate::utils;

// #[bean(name = "...", constructor = path, init, destroy, auto_register = false, crate = path)]
#[derive(Default)]
pub(crate) struct BeanAttribute {
    name: Option<(Span, LitStr)>,
    constructor: Option<(Span, Path)>,
    init: Option<(Span, bool)>,
    destroy: Option<(Span, bool)>,
    auto_register: Option<(Span, bool)>,
    crate_path: Option<(Span, Path)>,
}

impl BeanAttribute {
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut attribute = BeanAttribute::default();
        let mut errors = Vec::new();

        for attr in attrs {
            if !attr.path().is_ident("bean") {
                continue;
            }

            if let Err(err) = attr.parse_nested_meta(|meta| attribute.parse(meta)) {
                errors.push(err);
            }
        }

        utils::combine_errors(errors)?;

        Ok(attribute)
    }

    fn parse(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let meta_path = &meta.path;
        let meta_path_span = meta_path.span();

        macro_rules! check_duplicate {
            ($argument:tt, $variable:tt) => {
                if self.$variable.is_some() {
                    return Err(meta.error(concat!(
                        "duplicate `",
                        stringify!($argument),
                        "` argument"
                    )));
                }
            };
        }

        macro_rules! boolean_arg {
            ($argument:tt, $variable:tt) => {
                if meta_path.is_ident(stringify!($argument)) {
                    check_duplicate!($argument, $variable);

                    self.$variable = Some((
                        meta_path_span,
                        if meta.input.is_empty() || meta.input.peek(Token![,]) {
                            true
                        } else {
                            meta.value()?.parse::<LitBool>()?.value
                        },
                    ));
                    return Ok(());
                }
            };
        }

        if meta_path.is_ident("name") {
            check_duplicate!(name, name);

            let name = meta.value()?.parse::<LitStr>()?;
            if name.value().is_empty() {
                return Err(syn::Error::new(name.span(), "the class name must not be empty"));
            }

            self.name = Some((meta_path_span, name));
            return Ok(());
        }

        if meta_path.is_ident("constructor") {
            check_duplicate!(constructor, constructor);
            self.constructor = Some((meta_path_span, meta.value()?.parse()?));
            return Ok(());
        }

        if meta_path.is_ident("crate") {
            check_duplicate!(crate, crate_path);
            self.crate_path = Some((meta_path_span, meta.value()?.call(Path::parse_mod_style)?));
            return Ok(());
        }

        boolean_arg!(init, init);
        boolean_arg!(destroy, destroy);
        boolean_arg!(auto_register, auto_register);

        Err(meta.error(
            "the argument must be one of: `name`, `constructor`, `init`, `destroy`, `auto_register`, `crate`",
        ))
    }

    pub(crate) fn simplify(&self) -> SimpleBeanAttribute {
        let BeanAttribute {
            name,
            constructor,
            init,
            destroy,
            auto_register,
            crate_path,
        } = self;

        SimpleBeanAttribute {
            name: name.as_ref().map(|(_, name)| {
                quote! {
                    #name
                }
            }),
            constructor: constructor
                .as_ref()
                .map(|(_, constructor)| {
                    quote! {
                        #constructor
                    }
                })
                .unwrap_or_else(|| {
                    quote! {
                        <Self as ::core::default::Default>::default
                    }
                }),
            init: init.map(|(_, init)| init).unwrap_or(false),
            destroy: destroy.map(|(_, destroy)| destroy).unwrap_or(false),
            auto_register: auto_register
                .map(|(_, auto_register)| auto_register)
                .unwrap_or(true),
            crate_path: crate_path
                .as_ref()
                .map(|(_, path)| path.clone())
                .unwrap_or_else(|| parse_quote!(::sprout)),
        }
    }
}

pub(crate) struct SimpleBeanAttribute {
    pub(crate) name: Option<TokenStream>,
    pub(crate) constructor: TokenStream,
    pub(crate) init: bool,
    pub(crate) destroy: bool,
    pub(crate) auto_register: bool,
    pub(crate) crate_path: Path,
}
