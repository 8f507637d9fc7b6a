use super::{ErrorSet, StorageTy};

#[derive(Debug)]
pub(crate) struct Field {
    /// Field identifier
    pub(crate) ident: syn::Ident,

    /// Field type as written
    pub(crate) ty: syn::Type,

    /// Field attributes
    pub(crate) attrs: FieldAttr,

    pub(crate) kind: FieldKind,

    /// True if the field is `pub`
    pub(crate) exported: bool,
}

#[derive(Debug, Default)]
pub(crate) struct FieldAttr {
    /// `column = "..."`; `"-"` excludes the field
    pub(crate) column: Option<syn::LitStr>,

    /// `rename = "..."`; `"-"` hides the field from untyped input
    pub(crate) rename: Option<syn::LitStr>,

    /// `document = "..."`
    pub(crate) document: Option<syn::LitStr>,

    /// `data_type = "..."`
    pub(crate) data_type: Option<syn::LitStr>,

    /// `skip`
    pub(crate) skip: bool,

    /// `flatten`
    pub(crate) flatten: bool,
}

#[derive(Debug)]
pub(crate) enum FieldKind {
    /// Maps to one column or one document key
    Column(StorageTy),

    /// Splices the fields of another record in place
    Flatten,
}

impl Field {
    pub(super) fn from_ast(field: &syn::Field) -> syn::Result<Self> {
        let Some(ident) = &field.ident else {
            return Err(syn::Error::new_spanned(field, "record fields must be named"));
        };

        let attrs = FieldAttr::from_ast(&field.attrs)?;

        let kind = if attrs.flatten {
            FieldKind::Flatten
        } else {
            FieldKind::Column(StorageTy::from_ast(&field.ty))
        };

        Ok(Field {
            ident: ident.clone(),
            ty: field.ty.clone(),
            attrs,
            kind,
            exported: matches!(field.vis, syn::Visibility::Public(_)),
        })
    }

    /// Whether the field takes part in the schema at all.
    ///
    /// Private fields are only mapped when they name their column.
    pub(crate) fn is_mapped(&self) -> bool {
        if self.attrs.skip {
            return false;
        }

        if self.attrs.flatten {
            return true;
        }

        match &self.attrs.column {
            Some(column) => column.value() != "-",
            None => self.exported,
        }
    }
}

impl FieldAttr {
    fn from_ast(attrs: &[syn::Attribute]) -> syn::Result<FieldAttr> {
        let mut errs = ErrorSet::new();
        let mut ret = FieldAttr::default();

        for attr in attrs {
            if !attr.path().is_ident("docket") {
                continue;
            }

            let res = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    ret.skip = true;
                    return Ok(());
                }

                if meta.path.is_ident("flatten") {
                    ret.flatten = true;
                    return Ok(());
                }

                let slot = if meta.path.is_ident("column") {
                    &mut ret.column
                } else if meta.path.is_ident("rename") {
                    &mut ret.rename
                } else if meta.path.is_ident("document") {
                    &mut ret.document
                } else if meta.path.is_ident("data_type") {
                    &mut ret.data_type
                } else {
                    return Err(meta.error(
                        "expected `column`, `rename`, `document`, `data_type`, `skip` or `flatten`",
                    ));
                };

                if slot.is_some() {
                    return Err(meta.error("duplicate attribute"));
                }

                *slot = Some(meta.value()?.parse()?);
                Ok(())
            });

            if let Err(err) = res {
                errs.push(err);
            }
        }

        if ret.flatten {
            let conflicting = [&ret.column, &ret.rename, &ret.document, &ret.data_type]
                .into_iter()
                .flatten()
                .next();

            if let Some(lit) = conflicting {
                errs.push(syn::Error::new_spanned(
                    lit,
                    "`flatten` cannot be combined with column options",
                ));
            }
        }

        match errs.collect() {
            Some(err) => Err(err),
            None => Ok(ret),
        }
    }
}
