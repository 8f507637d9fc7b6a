/// What the derive can tell about a field type from its tokens.
#[derive(Debug)]
pub(crate) struct StorageTy {
    /// Last path segment of the type, `Option` peeled off
    pub(crate) ident: String,

    /// True when the field is an `Option<_>`
    pub(crate) nullable: bool,
}

impl StorageTy {
    pub(crate) fn from_ast(ty: &syn::Type) -> StorageTy {
        match option_inner(ty) {
            Some(inner) => StorageTy {
                ident: last_ident(inner),
                nullable: true,
            },
            None => StorageTy {
                ident: last_ident(ty),
                nullable: false,
            },
        }
    }
}

fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    let syn::Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

fn last_ident(ty: &syn::Type) -> String {
    match ty {
        syn::Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_default(),
        syn::Type::Group(group) => last_ident(&group.elem),
        syn::Type::Paren(paren) => last_ident(&paren.elem),
        _ => String::new(),
    }
}
