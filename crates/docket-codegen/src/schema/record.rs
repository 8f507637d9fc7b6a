use super::{ErrorSet, Field, RecordAttr};

#[derive(Debug)]
pub(crate) struct Record {
    /// Type identifier
    pub(crate) ident: syn::Ident,

    /// Mapped fields, in declaration order
    pub(crate) fields: Vec<Field>,

    pub(crate) attrs: RecordAttr,
}

impl Record {
    pub(crate) fn from_ast(ast: &syn::ItemStruct) -> syn::Result<Self> {
        let syn::Fields::Named(node) = &ast.fields else {
            return Err(syn::Error::new_spanned(
                &ast.fields,
                "record fields must be named",
            ));
        };

        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &ast.generics,
                "record generics are not supported",
            ));
        }

        let mut attrs = RecordAttr::default();
        let mut fields = vec![];
        let mut errs = ErrorSet::new();

        if let Err(err) = attrs.populate_from_ast(&ast.attrs) {
            errs.push(err);
        }

        for node in node.named.iter() {
            match Field::from_ast(node) {
                Ok(field) if field.is_mapped() => fields.push(field),
                Ok(_) => {}
                Err(err) => errs.push(err),
            }
        }

        if let Some(err) = errs.collect() {
            return Err(err);
        }

        Ok(Record {
            ident: ast.ident.clone(),
            fields,
            attrs,
        })
    }
}
