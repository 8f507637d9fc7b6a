use super::ErrorSet;

/// Struct-level `#[docket(...)]` options.
#[derive(Debug, Default)]
pub(crate) struct RecordAttr {
    /// Table name overriding the pluralized type name
    pub(crate) table: Option<syn::LitStr>,

    /// SQL emitted before `CREATE TABLE`
    pub(crate) before_schema: Option<syn::LitStr>,

    /// SQL emitted after `CREATE TABLE`
    pub(crate) after_schema: Option<syn::LitStr>,
}

impl RecordAttr {
    pub(super) fn populate_from_ast(&mut self, attrs: &[syn::Attribute]) -> syn::Result<()> {
        let mut errs = ErrorSet::new();

        for attr in attrs {
            if !attr.path().is_ident("docket") {
                continue;
            }

            let res = attr.parse_nested_meta(|meta| {
                let slot = if meta.path.is_ident("table") {
                    &mut self.table
                } else if meta.path.is_ident("before_schema") {
                    &mut self.before_schema
                } else if meta.path.is_ident("after_schema") {
                    &mut self.after_schema
                } else {
                    return Err(meta.error(
                        "expected `table`, `before_schema` or `after_schema`",
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

        match errs.collect() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
