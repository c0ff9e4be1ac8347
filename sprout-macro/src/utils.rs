use syn::spanned::Spanned;

#[cfg(feature = "auto-register")]
pub(crate) fn check_auto_register_with_generics(
    auto_register: bool,
    generics: &syn::Generics,
) -> syn::Result<()> {
    if auto_register && !generics.params.is_empty() {
        return Err(syn::Error::new(
            generics.span(),
            "not support auto register generic struct, \
            please remove generics, or use `#[bean(auto_register = false)]` to disable auto register",
        ));
    }

    Ok(())
}

pub(crate) fn combine_errors(errors: Vec<syn::Error>) -> syn::Result<()> {
    match errors.into_iter().reduce(|mut a, b| {
        a.combine(b);
        a
    }) {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

pub(crate) fn unnamed_fields_error(fields: &syn::Fields) -> syn::Error {
    syn::Error::new(
        fields.span(),
        "`Bean` can only be derived for structs with named fields",
    )
}
