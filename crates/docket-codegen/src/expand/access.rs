use super::Expand;
use crate::schema::FieldKind;

use proc_macro2::TokenStream;
use quote::quote;

/// Field accessors are keyed by position. Each mapped field takes one slot and
/// a flattened member takes as many slots as its own schema has fields, so
/// the generated code walks the fields while advancing `offset`.
impl Expand<'_> {
    pub(super) fn expand_get(&self) -> TokenStream {
        let docket = &self.docket;

        let arms = self.record.fields.iter().map(|field| {
            let ident = &field.ident;
            let ty = &field.ty;

            match field.kind {
                FieldKind::Column(_) => quote! {
                    if id.0 == offset {
                        return Some(#docket::to_value(&self.#ident, Self::schema().field(id).ty));
                    }
                    offset += 1;
                },
                FieldKind::Flatten => quote! {
                    let len = <#ty as #docket::Record>::schema().fields.len();
                    if id.0 < offset + len {
                        return <#ty as #docket::Record>::get(&self.#ident, #docket::FieldId(id.0 - offset));
                    }
                    offset += len;
                },
            }
        });

        quote! {
            #[allow(unused_mut, unused_variables)]
            fn get(&self, id: #docket::FieldId) -> Option<#docket::Value> {
                let mut offset = 0usize;
                #( #arms )*
                let _ = offset;
                None
            }
        }
    }

    pub(super) fn expand_set(&self) -> TokenStream {
        let docket = &self.docket;

        let arms = self.record.fields.iter().map(|field| {
            let ident = &field.ident;
            let ty = &field.ty;

            match field.kind {
                FieldKind::Column(_) => quote! {
                    if id.0 == offset {
                        self.#ident = #docket::from_json(value, Self::schema().field(id).ty)?;
                        return Ok(());
                    }
                    offset += 1;
                },
                FieldKind::Flatten => quote! {
                    let len = <#ty as #docket::Record>::schema().fields.len();
                    if id.0 < offset + len {
                        return <#ty as #docket::Record>::set(&mut self.#ident, #docket::FieldId(id.0 - offset), value);
                    }
                    offset += len;
                },
            }
        });

        quote! {
            #[allow(unused_mut, unused_variables)]
            fn set(&mut self, id: #docket::FieldId, value: #docket::Json) -> #docket::Result<()> {
                let mut offset = 0usize;
                #( #arms )*
                let _ = offset;
                Err(#docket::unknown_field::<Self>(id))
            }
        }
    }

    pub(super) fn expand_coerce(&self) -> TokenStream {
        let docket = &self.docket;

        let arms = self.record.fields.iter().map(|field| {
            let ty = &field.ty;

            match field.kind {
                FieldKind::Column(_) => quote! {
                    if id.0 == offset {
                        return #docket::coerce::<#ty>(value, Self::schema().field(id).ty);
                    }
                    offset += 1;
                },
                FieldKind::Flatten => quote! {
                    let len = <#ty as #docket::Record>::schema().fields.len();
                    if id.0 < offset + len {
                        return <#ty as #docket::Record>::coerce(#docket::FieldId(id.0 - offset), value);
                    }
                    offset += len;
                },
            }
        });

        quote! {
            #[allow(unused_mut, unused_variables)]
            fn coerce(id: #docket::FieldId, value: #docket::Json) -> Option<#docket::Value> {
                let mut offset = 0usize;
                #( #arms )*
                let _ = offset;
                None
            }
        }
    }
}
