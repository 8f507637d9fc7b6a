use super::Expand;
use crate::schema::{Field, FieldKind};

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    pub(super) fn expand_schema(&self) -> TokenStream {
        let docket = &self.docket;
        let type_name = self.record.ident.to_string();
        let attrs = &self.record.attrs;

        let table = attrs.table.as_ref().map(|lit| quote!(.table_name(#lit)));
        let before = attrs
            .before_schema
            .as_ref()
            .map(|lit| quote!(.before_schema(#lit)));
        let after = attrs
            .after_schema
            .as_ref()
            .map(|lit| quote!(.after_schema(#lit)));

        let fields = self.record.fields.iter().map(|field| self.expand_field_def(field));

        quote! {
            fn schema() -> &'static #docket::RecordSchema {
                static SCHEMA: std::sync::OnceLock<#docket::RecordSchema> = std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    #docket::SchemaBuilder::new(#type_name)
                        #table
                        #before
                        #after
                        #( #fields )*
                        .build()
                })
            }
        }
    }

    fn expand_field_def(&self, field: &Field) -> TokenStream {
        let docket = &self.docket;

        let storage = match &field.kind {
            FieldKind::Flatten => {
                let ty = &field.ty;
                return quote!(.flatten(<#ty as #docket::Record>::schema()));
            }
            FieldKind::Column(storage) => storage,
        };

        let name = field.ident.to_string();
        let column = option_lit(field.attrs.column.as_ref());
        let rename = option_lit(field.attrs.rename.as_ref());
        let document = option_lit(field.attrs.document.as_ref());
        let data_type = option_lit(field.attrs.data_type.as_ref());
        let ty_ident = &storage.ident;
        let nullable = storage.nullable;
        let exported = field.exported;

        quote! {
            .field(#docket::FieldDef {
                name: #name,
                column: #column,
                rename: #rename,
                document: #document,
                data_type: #data_type,
                ty: #docket::Type::from_ident(#ty_ident),
                nullable: #nullable,
                exported: #exported,
            })
        }
    }
}

fn option_lit(lit: Option<&syn::LitStr>) -> TokenStream {
    match lit {
        Some(lit) => quote!(Some(#lit)),
        None => quote!(None),
    }
}
